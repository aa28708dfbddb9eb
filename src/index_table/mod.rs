//! The on-disk array mapping a 1-based log position to the location of its
//! encoded entry in the data file.
//!
//! The index file is a plain sequence of fixed size [`IndexRecord`]s: the
//! record of position `i` is stored at byte `(i - 1) * 24`. All records are
//! also kept in memory, so a lookup never touches the disk.
//!
//! Records are always contiguous in the data file: the record at position
//! `i + 1` starts where the record at position `i` ends.

pub(crate) mod index_record;

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::io::Write;

use codeq::error_context_ext::ErrorContextExt;
use codeq::Decode;
use codeq::Encode;
use index_record::IndexRecord;
use index_record::RecordFault;
use log::error;
use log::warn;

use crate::errors::CorruptRecord;
use crate::errors::IndexOutOfRange;
use crate::Config;

#[derive(Debug)]
pub(crate) struct IndexTable {
    f: File,

    /// `records[i]` is the record of log position `i + 1`.
    records: Vec<IndexRecord>,

    /// Records the original file size if an incomplete tail was dropped when
    /// opening.
    ///
    /// This field is primarily used for testing and debugging purposes.
    #[allow(dead_code)]
    pub(crate) truncated: Option<u64>,
}

impl IndexTable {
    /// Opens or creates the index file and loads every durable record.
    ///
    /// `data_size` is the current size of the data file. A record that
    /// points beyond it was written before its data became durable and is
    /// discarded together with everything after it.
    pub(crate) fn open(
        config: &Config,
        data_size: u64,
    ) -> Result<Self, io::Error> {
        let path = config.index_path();
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .context(|| format!("open {}", path))?;

        let file_size = f.metadata()?.len();

        let (records, fault) =
            Self::load_records(config, &f, file_size, data_size)?;

        let valid_size = records.len() as u64 * IndexRecord::SIZE;
        let mut truncated = None;

        if valid_size < file_size {
            let reason = match fault {
                None => format!(
                    "incomplete index record: {} trailing bytes",
                    file_size - valid_size
                ),
                Some(RecordFault::OutrunsData(reason)) => reason,
                Some(RecordFault::Damaged(reason)) => {
                    if !Self::verify_trailing_zeros(&f, valid_size, file_size)?
                    {
                        error!(
                            "Found damaged index record at position {}: {}",
                            records.len() + 1,
                            reason
                        );
                        return Err(CorruptRecord::new(format!(
                            "damaged index record at position {}: {}",
                            records.len() + 1,
                            reason
                        ))
                        .into());
                    }
                    format!(
                        "trailing zeros from offset {} in {}",
                        valid_size, path
                    )
                }
            };

            if !config.truncate_incomplete_record() {
                return Err(CorruptRecord::new(format!(
                    "unfinished index write: {}",
                    reason
                ))
                .into());
            }

            warn!(
                "Drop index tail [{}, {}) in {}, keep {} records: {}",
                valid_size,
                file_size,
                path,
                records.len(),
                reason
            );

            f.set_len(valid_size)?;
            f.sync_all()?;
            truncated = Some(file_size);
        }

        Ok(Self {
            f,
            records,
            truncated,
        })
    }

    /// Read all complete records, stop at the first one that is not valid.
    fn load_records(
        config: &Config,
        f: &File,
        file_size: u64,
        data_size: u64,
    ) -> Result<(Vec<IndexRecord>, Option<RecordFault>), io::Error> {
        let n = file_size / IndexRecord::SIZE;

        let mut br = BufReader::with_capacity(config.read_buffer_size(), f);
        let mut records = Vec::with_capacity(n as usize);

        let mut buf = [0u8; IndexRecord::SIZE as usize];

        for _ in 0..n {
            br.read_exact(&mut buf)?;

            let rec = match IndexRecord::decode(&buf[..]) {
                Ok(rec) => rec,
                Err(e) => {
                    let fault = RecordFault::Damaged(e.to_string());
                    return Ok((records, Some(fault)));
                }
            };

            let prev_end = records.last().map(IndexRecord::end).unwrap_or(0);
            if let Err(fault) = rec.check(prev_end, data_size) {
                return Ok((records, Some(fault)));
            }

            records.push(rec);
        }

        Ok((records, None))
    }

    /// Checks if the file contains only zero bytes from `start` to the end.
    ///
    /// Trailing zeros can happen if the file system persists the file length
    /// before the data, e.g. EXT4 mounted with `data=writeback`.
    fn verify_trailing_zeros(
        mut f: &File,
        start: u64,
        file_size: u64,
    ) -> Result<bool, io::Error> {
        f.seek(io::SeekFrom::Start(start))?;

        let mut r = f.take(file_size - start);
        let mut buf = [0u8; 1024];

        loop {
            let n = r.read(&mut buf)?;
            if n == 0 {
                return Ok(true);
            }
            if buf[..n].iter().any(|b| *b != 0) {
                return Ok(false);
            }
        }
    }

    /// Persist a new record and return the position it is assigned.
    pub(crate) fn append(
        &mut self,
        offset: u64,
        size: u64,
    ) -> Result<u64, io::Error> {
        debug_assert_eq!(offset, self.data_end());

        let rec = IndexRecord::new(offset, size);
        let mut buf = Vec::with_capacity(IndexRecord::SIZE as usize);
        rec.encode(&mut buf)?;

        self.f.seek(io::SeekFrom::Start(self.file_size()))?;
        self.f.write_all(&buf)?;

        self.records.push(rec);
        Ok(self.count())
    }

    pub(crate) fn lookup(
        &self,
        position: u64,
    ) -> Result<IndexRecord, IndexOutOfRange> {
        if position == 0 || position > self.count() {
            return Err(IndexOutOfRange::new(position, self.count() + 1));
        }
        Ok(self.records[(position - 1) as usize])
    }

    /// Returns the records of positions in `[start, end)`.
    ///
    /// The caller guarantees `1 <= start <= end <= count + 1`.
    pub(crate) fn range(&self, start: u64, end: u64) -> &[IndexRecord] {
        &self.records[(start - 1) as usize..(end - 1) as usize]
    }

    /// Discard every record after the first `keep` ones.
    pub(crate) fn truncate(&mut self, keep: u64) -> Result<(), io::Error> {
        if keep >= self.count() {
            return Ok(());
        }

        self.f.set_len(keep * IndexRecord::SIZE)?;
        self.records.truncate(keep as usize);
        Ok(())
    }

    pub(crate) fn last(&self) -> Option<IndexRecord> {
        self.records.last().copied()
    }

    pub(crate) fn count(&self) -> u64 {
        self.records.len() as u64
    }

    /// Returns the data file offset where the next entry starts.
    pub(crate) fn data_end(&self) -> u64 {
        self.records.last().map(IndexRecord::end).unwrap_or(0)
    }

    pub(crate) fn file_size(&self) -> u64 {
        self.count() * IndexRecord::SIZE
    }

    pub(crate) fn sync(&self) -> Result<(), io::Error> {
        self.f.sync_data()
    }
}
