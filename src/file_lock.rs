use std::fs::File;
use std::fs::OpenOptions;
use std::io;

use fs2::FileExt;
use log::info;

use crate::Config;

/// Exclusive advisory lock on a store directory.
///
/// Held for as long as a store is open, so that only one store instance owns
/// the index file and the data file.
#[derive(Debug)]
pub(crate) struct DirLock {
    path: String,
    f: File,
}

impl DirLock {
    pub const LOCK_FILE_NAME: &'static str = "LOCK";

    pub(crate) fn acquire(config: &Config) -> Result<Self, io::Error> {
        let path = Self::lock_path(config);

        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        f.try_lock_exclusive().map_err(|e| {
            io::Error::new(
                io::ErrorKind::WouldBlock,
                format!(
                    "Log store '{}' is already opened by another owner; \
                    error:({})",
                    config.dir, e
                ),
            )
        })?;

        info!("Log store lock acquired: {}", path);

        Ok(Self { path, f })
    }

    pub(crate) fn lock_path(config: &Config) -> String {
        format!("{}/{}", config.dir, Self::LOCK_FILE_NAME)
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = self.f.unlock();
        info!("Log store lock released: {}", self.path);
    }
}
