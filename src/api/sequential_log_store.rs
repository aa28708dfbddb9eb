//! Define the interface the consensus engine uses to persist its log.
//!
//! The log is a 1-based, gap-free sequence of entries. Besides plain append
//! and reads, it provides:
//! - `write_at`: overwrite the tail of the log, used when a follower's log
//!   conflicts with its leader's.
//! - `pack_log` and `apply_log_pack`: move a range of entries between stores
//!   in one blob, used to fast-forward a lagging replica.
//!
//! An implementation must serialize all calls internally, and every error
//! must be returned to the caller: a storage failure silently ignored breaks
//! the consensus guarantees.

use log::debug;

use crate::errors::LogStoreError;
use crate::LogEntry;

/// The storage primitive a Raft node keeps its log in.
pub trait SequentialLogStore {
    /// Append an entry and return the index it is stored at.
    fn append(&self, entry: &LogEntry) -> Result<u64, LogStoreError>;

    /// Returns the entry at `index`, `None` if no such entry.
    fn get_log_entry_at(
        &self,
        index: u64,
    ) -> Result<Option<LogEntry>, LogStoreError>;

    /// Returns the entries in `[start, end)`, `end` clamped to the first
    /// available index.
    fn get_log_entries(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<LogEntry>, LogStoreError>;

    /// Returns the last entry, or [`LogEntry::empty`] if there is none.
    fn get_last_log_entry(&self) -> Result<LogEntry, LogStoreError>;

    /// Returns the index the next appended entry will be stored at.
    fn get_first_available_index(&self) -> Result<u64, LogStoreError>;

    /// Store `entry` at `index`, discarding every entry at or after it.
    fn write_at(&self, index: u64, entry: &LogEntry)
        -> Result<(), LogStoreError>;

    /// Serialize up to `count` entries starting at `start`.
    fn pack_log(&self, start: u64, count: u64)
        -> Result<Vec<u8>, LogStoreError>;

    /// Replace the log from `start` on with the entries in `pack`.
    fn apply_log_pack(&self, start: u64, pack: &[u8])
        -> Result<(), LogStoreError>;

    /// Flush everything and release the underlying resources.
    fn close(&self) -> Result<(), LogStoreError>;
}

/// Copy the log of `source` from index `start` on into `target`, `chunk_size`
/// entries per pack.
///
/// Entries of `target` before `start` are kept, those at or after it are
/// replaced; `start` must not be beyond the first available index of either
/// store. Returns the first available index both stores end up with.
pub fn catch_up(
    source: &dyn SequentialLogStore,
    target: &dyn SequentialLogStore,
    start: u64,
    chunk_size: u64,
) -> Result<u64, LogStoreError> {
    let chunk_size = chunk_size.max(1);
    let end = source.get_first_available_index()?;
    let mut index = start.max(1);

    loop {
        let pack = source.pack_log(index, chunk_size)?;
        target.apply_log_pack(index, &pack)?;

        debug!("catch up: applied pack at {}, {} bytes", index, pack.len());

        index = index.saturating_add(chunk_size).min(end);
        if index >= end {
            break;
        }
    }

    target.get_first_available_index()
}
