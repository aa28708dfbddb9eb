//! Sequential log store for raft:
//! A durable, local disk-based log of consensus entries, addressed by a
//! 1-based, gap-free index.
//!
//! ## Features
//!
//! - Append, random read and range read of log entries
//! - Truncate-and-write to resolve conflicts with a leader's log
//! - Pack a range of entries into one blob and apply it to another store, to
//!   fast-forward a lagging replica
//! - Crash recovery: a partially written tail is detected and dropped on open
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use raft_seq_log::{Config, LogEntry, LogValueType, SeqLogStore};
//!
//! let temp_dir = tempfile::tempdir().unwrap();
//! let config = Arc::new(Config::new(temp_dir.path().to_str().unwrap()));
//!
//! let store = SeqLogStore::open(config.clone()).unwrap();
//! assert_eq!(1, store.get_first_available_index().unwrap());
//!
//! let index = store
//!     .append(&LogEntry::new(1, LogValueType::Application, "set x=1"))
//!     .unwrap();
//! assert_eq!(1, index);
//!
//! // A leader overwrites the conflicting tail
//! store
//!     .write_at(1, &LogEntry::new(2, LogValueType::Application, "set x=2"))
//!     .unwrap();
//!
//! store.close().unwrap();
//!
//! let store = SeqLogStore::open(config).unwrap();
//! let entry = store.get_log_entry_at(1).unwrap().unwrap();
//! assert_eq!(2, entry.term());
//! assert_eq!(Some(b"set x=2".as_slice()), entry.value());
//! ```

mod config;
mod data_file;
mod entry;
mod index_table;
mod log_pack;
mod seq_log;

pub(crate) mod file_lock;
pub(crate) mod num;

#[cfg(test)]
pub(crate) mod testing;

pub use codeq;

pub mod api;
pub mod dump_writer;
pub mod errors;

pub use api::sequential_log_store::SequentialLogStore;
pub use config::Config;
pub use entry::log_entry::LogEntry;
pub use entry::value_type::LogValueType;
pub use errors::LogStoreError;
pub use index_table::index_record::IndexRecord;
pub use log_pack::LogPack;

pub use self::seq_log::dump::Dump;
pub use self::seq_log::seq_log_store::SeqLogStore;
pub use self::seq_log::stat::Stat;
