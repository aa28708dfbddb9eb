use std::io;
use std::sync::Arc;
use std::sync::Mutex;

use codeq::error_context_ext::ErrorContextExt;
use log::error;
use log::info;

use crate::api::sequential_log_store::SequentialLogStore;
use crate::errors::IndexOutOfRange;
use crate::errors::InvalidEntry;
use crate::errors::LogStoreError;
use crate::errors::StoreClosed;
use crate::log_pack::LogPack;
use crate::seq_log::dump::Dump;
use crate::seq_log::stat::Stat;
use crate::seq_log::store_inner::StoreInner;
use crate::Config;
use crate::LogEntry;

/// A durable, 1-based, gap-free sequence of [`LogEntry`]s stored in a
/// directory.
///
/// The directory holds two files:
/// - `store.data`: encoded entries, back to back.
/// - `store.idx`: one fixed size record per entry, pointing into the data
///   file.
///
/// All operations are serialized by one internal lock, so the store can be
/// shared between threads with an `Arc`. Once [`close`](Self::close)d, every
/// operation fails with [`StoreClosed`].
#[derive(Debug)]
pub struct SeqLogStore {
    config: Arc<Config>,

    /// `None` once closed.
    inner: Mutex<Option<StoreInner>>,
}

impl SeqLogStore {
    /// Opens the store in `config.dir`, creating an empty one if absent.
    ///
    /// This operation:
    /// 1. Acquires an exclusive lock on the directory
    /// 2. Loads the index, dropping a tail that was not completely written
    /// 3. Drops data bytes no index record refers to
    ///
    /// # Errors
    /// Returns an error if:
    /// - The directory is already opened by another store
    /// - The index file contains a damaged record
    /// - Any file operation fails
    pub fn open(config: Arc<Config>) -> Result<Self, LogStoreError> {
        let inner = StoreInner::open(config.clone())?;

        Ok(Self {
            config,
            inner: Mutex::new(Some(inner)),
        })
    }

    /// Get a reference to the store configuration.
    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    /// Dump the on-disk content for debugging purposes.
    pub fn dump(&self) -> Dump {
        Dump::new(self.config.clone())
    }

    /// Append `entry` at [`Self::get_first_available_index`] and return the
    /// index it is stored at.
    ///
    /// # Errors
    /// Returns [`InvalidEntry`] if the entry has the reserved term 0.
    pub fn append(&self, entry: &LogEntry) -> Result<u64, LogStoreError> {
        self.with_inner("append", |inner| {
            Self::check_entry(entry)?;
            inner.append(entry)
        })
    }

    /// Returns the entry at `index`, or `None` if no such entry exists.
    pub fn get_log_entry_at(
        &self,
        index: u64,
    ) -> Result<Option<LogEntry>, LogStoreError> {
        self.with_inner("get_log_entry_at", |inner| {
            if index == 0 || index >= inner.first_available_index() {
                return Ok(None);
            }
            inner.read_entry(index).map(Some)
        })
    }

    /// Returns the entries in `[start, end)`, in index order.
    ///
    /// `end` is clamped to the first available index; an empty vector is
    /// returned if `end <= start`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfRange`] if `start` is 0 or beyond the first
    /// available index.
    pub fn get_log_entries(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<LogEntry>, LogStoreError> {
        self.with_inner("get_log_entries", |inner| {
            let end = Self::check_range(inner, start, end)?;
            inner.read_entries(start, end)
        })
    }

    /// Returns the last entry, or [`LogEntry::empty`] if the store is empty.
    pub fn get_last_log_entry(&self) -> Result<LogEntry, LogStoreError> {
        self.with_inner("get_last_log_entry", |inner| {
            let last = inner.first_available_index() - 1;
            if last == 0 {
                return Ok(LogEntry::empty());
            }
            inner.read_entry(last)
        })
    }

    /// Returns the index the next appended entry will be stored at.
    pub fn get_first_available_index(&self) -> Result<u64, LogStoreError> {
        self.with_inner("get_first_available_index", |inner| {
            Ok(inner.first_available_index())
        })
    }

    /// Store `entry` at `index` and discard every entry at or after it.
    ///
    /// Entries before `index` are kept. Index 0 is treated as 1: the log is
    /// reset to contain only `entry`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfRange`] if `index` is beyond the first available
    /// index, since that would leave a gap, and [`InvalidEntry`] if the entry
    /// has the reserved term 0.
    pub fn write_at(
        &self,
        index: u64,
        entry: &LogEntry,
    ) -> Result<(), LogStoreError> {
        self.with_inner("write_at", |inner| {
            Self::check_entry(entry)?;
            let keep = inner.overwrite_keep(index)?;
            inner.truncate(keep)?;
            inner.append(entry)?;
            Ok(())
        })
    }

    /// Serialize up to `count` entries starting at `start` into a pack.
    ///
    /// Fewer entries are packed if the log ends before `start + count`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfRange`] if `start` is 0 or beyond the first
    /// available index.
    pub fn pack_log(
        &self,
        start: u64,
        count: u64,
    ) -> Result<Vec<u8>, LogStoreError> {
        self.with_inner("pack_log", |inner| {
            let end =
                Self::check_range(inner, start, start.saturating_add(count))?;
            inner.pack(start, end)
        })
    }

    /// Replace the log from `start` on with the entries in `pack`.
    ///
    /// Same as calling [`Self::write_at`] with the first packed entry and
    /// then appending the others. The pack is decoded before the store is
    /// touched: a corrupt pack, or one holding an entry of term 0, changes
    /// nothing. An empty pack only discards entries from `start` on.
    pub fn apply_log_pack(
        &self,
        start: u64,
        pack: &[u8],
    ) -> Result<(), LogStoreError> {
        self.with_inner("apply_log_pack", |inner| {
            let pack = LogPack::decode_exact(pack)?;
            for entry in pack.entries() {
                Self::check_entry(entry)?;
            }

            let keep = inner.overwrite_keep(start)?;
            inner.truncate(keep)?;

            for entry in pack.entries() {
                inner.append(entry)?;
            }
            Ok(())
        })
    }

    /// Flush both files to durable storage.
    pub fn sync(&self) -> Result<(), LogStoreError> {
        self.with_inner("sync", |inner| Ok(inner.sync()?))
    }

    /// Returns statistics about the store.
    pub fn stat(&self) -> Result<Stat, LogStoreError> {
        self.with_inner("stat", |inner| Ok(inner.stat()))
    }

    /// Flush all data to durable storage and release the files and the
    /// directory lock.
    ///
    /// The files are released even if flushing fails.
    pub fn close(&self) -> Result<(), LogStoreError> {
        let inner = {
            let mut guard = self.lock()?;
            guard.take()
        };

        let Some(inner) = inner else {
            return Err(StoreClosed::new(&self.config.dir, "close").into());
        };

        let res = inner.sync();
        drop(inner);

        res.context(|| format!("close log store in '{}'", self.config.dir))?;

        info!("Log store closed: {}", self.config.dir);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        match self.inner.lock() {
            Ok(guard) => guard.is_none(),
            Err(_) => true,
        }
    }

    /// Term 0 is reserved for [`LogEntry::empty`], the "no entry" result of
    /// an empty store, and is never persisted.
    fn check_entry(entry: &LogEntry) -> Result<(), InvalidEntry> {
        if entry.term() == 0 {
            return Err(InvalidEntry::new(format!(
                "term 0 is reserved for the empty entry: {}",
                entry
            )));
        }
        Ok(())
    }

    /// Clamp `end` to the first available index, and check `start` is a
    /// position a range may begin at.
    fn check_range(
        inner: &StoreInner,
        start: u64,
        end: u64,
    ) -> Result<u64, IndexOutOfRange> {
        let first_available = inner.first_available_index();

        if start == 0 || start > first_available {
            return Err(IndexOutOfRange::new(start, first_available));
        }

        Ok(end.clamp(start, first_available))
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Option<StoreInner>>, io::Error> {
        self.inner.lock().map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("log store lock poisoned: {}", e),
            )
        })
    }

    fn with_inner<R>(
        &self,
        when: &'static str,
        f: impl FnOnce(&mut StoreInner) -> Result<R, LogStoreError>,
    ) -> Result<R, LogStoreError> {
        let mut guard = self.lock()?;
        let inner = guard
            .as_mut()
            .ok_or_else(|| StoreClosed::new(&self.config.dir, when))?;
        f(inner)
    }
}

impl Drop for SeqLogStore {
    fn drop(&mut self) {
        let Ok(inner) = self.inner.get_mut() else {
            return;
        };

        if let Some(inner) = inner.take() {
            if let Err(e) = inner.sync() {
                error!(
                    "Failed to sync log store in '{}' on drop: {}",
                    self.config.dir, e
                );
            }
        }
    }
}

impl SequentialLogStore for SeqLogStore {
    fn append(&self, entry: &LogEntry) -> Result<u64, LogStoreError> {
        SeqLogStore::append(self, entry)
    }

    fn get_log_entry_at(
        &self,
        index: u64,
    ) -> Result<Option<LogEntry>, LogStoreError> {
        SeqLogStore::get_log_entry_at(self, index)
    }

    fn get_log_entries(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<LogEntry>, LogStoreError> {
        SeqLogStore::get_log_entries(self, start, end)
    }

    fn get_last_log_entry(&self) -> Result<LogEntry, LogStoreError> {
        SeqLogStore::get_last_log_entry(self)
    }

    fn get_first_available_index(&self) -> Result<u64, LogStoreError> {
        SeqLogStore::get_first_available_index(self)
    }

    fn write_at(
        &self,
        index: u64,
        entry: &LogEntry,
    ) -> Result<(), LogStoreError> {
        SeqLogStore::write_at(self, index, entry)
    }

    fn pack_log(
        &self,
        start: u64,
        count: u64,
    ) -> Result<Vec<u8>, LogStoreError> {
        SeqLogStore::pack_log(self, start, count)
    }

    fn apply_log_pack(
        &self,
        start: u64,
        pack: &[u8],
    ) -> Result<(), LogStoreError> {
        SeqLogStore::apply_log_pack(self, start, pack)
    }

    fn close(&self) -> Result<(), LogStoreError> {
        SeqLogStore::close(self)
    }
}
