use std::format;

/// Configuration for a sequential log store.
///
/// Optional parameters are `Option<T>` in this struct, and default values is
/// evaluated when a getter method is called.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Directory holding the index file, the data file and the lock file.
    pub dir: String,

    /// Size of the read buffer in bytes, used when scanning the store.
    pub read_buffer_size: Option<usize>,

    /// Whether to `fsync` the data file before the index record of an
    /// append is written.
    pub sync_on_append: Option<bool>,

    /// Whether to drop a trailing index record that was not completely
    /// written, or that points beyond the data file.
    ///
    /// If truncate, the store is considered successfully opened.
    /// Otherwise, an error will be returned.
    pub truncate_incomplete_record: Option<bool>,
}

impl Config {
    pub const INDEX_FILE_NAME: &'static str = "store.idx";
    pub const DATA_FILE_NAME: &'static str = "store.data";

    /// Creates a new Config with the specified directory and default values for
    /// other fields
    pub fn new(dir: impl ToString) -> Self {
        Self {
            dir: dir.to_string(),
            ..Default::default()
        }
    }

    /// Returns the size of read buffer in bytes (defaults to 64KB)
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size.unwrap_or(64 * 1024)
    }

    /// Returns whether every append syncs the data file (defaults to false)
    pub fn sync_on_append(&self) -> bool {
        self.sync_on_append.unwrap_or(false)
    }

    /// Returns whether to truncate incomplete records (defaults to true)
    pub fn truncate_incomplete_record(&self) -> bool {
        self.truncate_incomplete_record.unwrap_or(true)
    }

    pub fn index_path(&self) -> String {
        format!("{}/{}", self.dir, Self::INDEX_FILE_NAME)
    }

    pub fn data_path(&self) -> String {
        format!("{}/{}", self.dir, Self::DATA_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn test_config_defaults() {
        let c = Config::new("/tmp/foo");

        assert_eq!("/tmp/foo/store.idx", c.index_path());
        assert_eq!("/tmp/foo/store.data", c.data_path());
        assert_eq!(64 * 1024, c.read_buffer_size());
        assert!(!c.sync_on_append());
        assert!(c.truncate_incomplete_record());

        let c = Config {
            sync_on_append: Some(true),
            truncate_incomplete_record: Some(false),
            ..Config::new("x")
        };
        assert!(c.sync_on_append());
        assert!(!c.truncate_incomplete_record());
    }
}
