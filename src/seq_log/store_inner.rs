use std::io;
use std::sync::Arc;

use codeq::Encode;
use log::debug;
use log::error;
use log::info;
use log::warn;

use crate::data_file::DataFile;
use crate::errors::CorruptRecord;
use crate::errors::IndexOutOfRange;
use crate::errors::LogStoreError;
use crate::file_lock::DirLock;
use crate::index_table::IndexTable;
use crate::log_pack;
use crate::seq_log::stat::Stat;
use crate::Config;
use crate::LogEntry;

/// The state of an open store: the files and what is known about them.
///
/// It is not synchronized; [`SeqLogStore`](crate::SeqLogStore) owns it behind
/// a lock.
#[derive(Debug)]
pub(crate) struct StoreInner {
    config: Arc<Config>,

    pub(crate) index: IndexTable,

    pub(crate) data: DataFile,

    /// Dropped last, after both files are closed.
    _dir_lock: DirLock,
}

impl StoreInner {
    /// Opens the files in `config.dir`, creating them if absent, and
    /// restores the state left by the last close or crash.
    pub(crate) fn open(config: Arc<Config>) -> Result<Self, io::Error> {
        std::fs::create_dir_all(&config.dir)?;

        let dir_lock = DirLock::acquire(&config)?;

        let mut data = DataFile::open(&config)?;
        let mut index = IndexTable::open(&config, data.size())?;

        Self::drop_unwritten_tail(&config, &mut index, &data)?;

        // Data written by an append whose index record never made it.
        let data_end = index.data_end();
        if data.size() > data_end {
            warn!(
                "Drop orphaned data [{}, {}) in {}",
                data_end,
                data.size(),
                config.data_path()
            );
            data.truncate(data_end)?;
            data.sync()?;
        }

        info!(
            "Log store opened: {}, entries: {}, data size: {}",
            config.dir,
            index.count(),
            data.size()
        );

        Ok(Self {
            config,
            index,
            data,
            _dir_lock: dir_lock,
        })
    }

    /// Drop the tail entries whose data does not decode.
    ///
    /// The index record of an append can become durable while its data does
    /// not: the data file then has the right length but holds zeros or
    /// stale bytes. Walk back from the last entry until one decodes.
    fn drop_unwritten_tail(
        config: &Config,
        index: &mut IndexTable,
        data: &DataFile,
    ) -> Result<(), io::Error> {
        let count = index.count();

        while let Some(rec) = index.last() {
            let buf = data.read(rec.offset, rec.size)?;

            let Err(e) = LogEntry::decode_exact(&buf) else {
                break;
            };

            if !config.truncate_incomplete_record() {
                return Err(CorruptRecord::new(format!(
                    "unfinished data write at position {}: {}",
                    index.count(),
                    e
                ))
                .into());
            }

            warn!(
                "Drop entry {} in {}: data {} does not decode: {}",
                index.count(),
                config.dir,
                rec,
                e
            );
            index.truncate(index.count() - 1)?;
        }

        if index.count() < count {
            index.sync()?;
        }

        Ok(())
    }

    pub(crate) fn first_available_index(&self) -> u64 {
        self.index.count() + 1
    }

    /// Append an entry, the data is written before the index record.
    pub(crate) fn append(
        &mut self,
        entry: &LogEntry,
    ) -> Result<u64, LogStoreError> {
        let mut buf = Vec::with_capacity(entry.encoded_size());
        entry.encode(&mut buf)?;

        let offset = self.data.append(&buf)?;

        let res = if self.config.sync_on_append() {
            self.data.sync()
        } else {
            Ok(())
        };

        let res = res.and_then(|_| self.index.append(offset, buf.len() as u64));

        let position = match res {
            Ok(position) => position,
            Err(e) => {
                // Keep the data file contiguous with the index.
                if let Err(te) = self.data.truncate(offset) {
                    error!(
                        "Failed to roll back data to {} after: {}; error: {}",
                        offset, e, te
                    );
                }
                return Err(e.into());
            }
        };

        debug!("Appended log entry at {}: {}", position, entry);
        Ok(position)
    }

    /// Read and decode the entry at `position`.
    pub(crate) fn read_entry(
        &self,
        position: u64,
    ) -> Result<LogEntry, LogStoreError> {
        let rec = self.index.lookup(position)?;
        let buf = self.data.read(rec.offset, rec.size)?;
        Ok(LogEntry::decode_exact(&buf)?)
    }

    /// Read the entries in `[start, end)` with a single data file read.
    ///
    /// The caller guarantees `1 <= start <= end <= first_available`.
    pub(crate) fn read_entries(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<LogEntry>, LogStoreError> {
        self.with_encoded(start, end, |encoded| {
            let mut entries = Vec::with_capacity(encoded.len());
            for buf in encoded {
                entries.push(LogEntry::decode_exact(buf)?);
            }
            Ok(entries)
        })
    }

    /// Pack the entries in `[start, end)` without decoding them.
    pub(crate) fn pack(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<u8>, LogStoreError> {
        self.with_encoded(start, end, |encoded| {
            let total: usize = encoded.iter().map(|b| 4 + b.len()).sum();
            let mut buf = Vec::with_capacity(4 + total);
            log_pack::write_encoded(&mut buf, encoded.iter().copied())?;
            Ok(buf)
        })
    }

    /// Call `f` with the encoded bytes of every entry in `[start, end)`.
    fn with_encoded<R>(
        &self,
        start: u64,
        end: u64,
        f: impl FnOnce(&[&[u8]]) -> Result<R, io::Error>,
    ) -> Result<R, LogStoreError> {
        let records = self.index.range(start, end);

        let (Some(first), Some(last)) = (records.first(), records.last())
        else {
            return Ok(f(&[])?);
        };

        let base = first.offset;
        let buf = self.data.read(base, last.end() - base)?;

        let encoded = records
            .iter()
            .map(|r| {
                let s = (r.offset - base) as usize;
                &buf[s..s + r.size as usize]
            })
            .collect::<Vec<_>>();

        Ok(f(&encoded)?)
    }

    /// Keep the first `keep` entries, discard the rest.
    ///
    /// The index is truncated before the data, so that no index record ever
    /// points past the end of the data file.
    pub(crate) fn truncate(&mut self, keep: u64) -> Result<(), LogStoreError> {
        let count = self.index.count();
        if keep >= count {
            return Ok(());
        }

        let data_end = if keep == 0 {
            0
        } else {
            self.index.lookup(keep)?.end()
        };

        self.index.truncate(keep)?;
        self.data.truncate(data_end)?;

        info!(
            "Log store truncated: {}, keep entries: {}, discarded: {}",
            self.config.dir,
            keep,
            count - keep
        );
        Ok(())
    }

    /// Check that the log can be overwritten starting at `index`, and
    /// return the number of entries to keep.
    ///
    /// Index 0 resets the log, same as 1.
    pub(crate) fn overwrite_keep(
        &self,
        index: u64,
    ) -> Result<u64, IndexOutOfRange> {
        let first_available = self.first_available_index();
        let index = index.max(1);

        if index > first_available {
            return Err(IndexOutOfRange::new(index, first_available));
        }

        Ok(index - 1)
    }

    pub(crate) fn sync(&self) -> Result<(), io::Error> {
        self.data.sync()?;
        self.index.sync()?;
        Ok(())
    }

    pub(crate) fn stat(&self) -> Stat {
        Stat {
            entries_count: self.index.count(),
            first_available_index: self.first_available_index(),
            data_size: self.data.size(),
            index_size: self.index.file_size(),
        }
    }
}
