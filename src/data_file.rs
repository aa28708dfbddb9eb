use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::Write;

use codeq::error_context_ext::ErrorContextExt;

use crate::num::format_pad9_u64;
use crate::Config;

/// Append-only container of encoded entries.
///
/// It knows nothing about entry boundaries, these are kept by the index
/// table.
#[derive(Debug)]
pub(crate) struct DataFile {
    path: String,
    f: File,

    /// Current size of the file in bytes.
    size: u64,
}

impl DataFile {
    pub(crate) fn open(config: &Config) -> Result<Self, io::Error> {
        let path = config.data_path();
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .context(|| format!("open {}", path))?;

        let size = f.metadata()?.len();

        Ok(Self { path, f, size })
    }

    /// Write `buf` at the end of the file, return the offset it starts at.
    pub(crate) fn append(&mut self, buf: &[u8]) -> Result<u64, io::Error> {
        let offset = self.size;

        self.f.seek(io::SeekFrom::Start(offset))?;
        self.f.write_all(buf).context(|| {
            format!("append {} bytes to {}", buf.len(), self.path)
        })?;

        self.size += buf.len() as u64;
        Ok(offset)
    }

    pub(crate) fn read(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<u8>, io::Error> {
        let in_range =
            matches!(offset.checked_add(size), Some(end) if end <= self.size);
        if !in_range {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "read [{}, +{}) beyond size {} of {}",
                    format_pad9_u64(offset),
                    size,
                    format_pad9_u64(self.size),
                    self.path
                ),
            ));
        }

        let mut f = &self.f;
        f.seek(io::SeekFrom::Start(offset))?;

        let mut buf = vec![0; size as usize];
        f.read_exact(&mut buf).context(|| {
            format!("read [{}, +{}) of {}", offset, size, self.path)
        })?;

        Ok(buf)
    }

    /// Discard every byte from `offset` on.
    pub(crate) fn truncate(&mut self, offset: u64) -> Result<(), io::Error> {
        if offset >= self.size {
            return Ok(());
        }

        self.f
            .set_len(offset)
            .context(|| format!("truncate {} to {}", self.path, offset))?;
        self.size = offset;
        Ok(())
    }

    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn sync(&self) -> Result<(), io::Error> {
        self.f.sync_data()
    }
}
