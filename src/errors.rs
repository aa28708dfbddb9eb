mod store_errors;

use std::io;

pub use store_errors::CorruptRecord;
pub use store_errors::IndexOutOfRange;
pub use store_errors::InvalidEntry;
pub use store_errors::StoreClosed;

/// Errors surfaced by [`SeqLogStore`](crate::SeqLogStore).
///
/// None of them is retried inside the store.
#[derive(Debug)]
#[derive(thiserror::Error)]
pub enum LogStoreError {
    #[error(transparent)]
    CorruptRecord(#[from] CorruptRecord),

    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),

    #[error(transparent)]
    StoreClosed(#[from] StoreClosed),

    #[error(transparent)]
    InvalidEntry(#[from] InvalidEntry),

    #[error("IoFailure: {0}")]
    Io(io::Error),
}

impl LogStoreError {
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, LogStoreError::CorruptRecord(_))
    }

    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, LogStoreError::IndexOutOfRange(_))
    }

    pub fn is_store_closed(&self) -> bool {
        matches!(self, LogStoreError::StoreClosed(_))
    }

    pub fn is_invalid_entry(&self) -> bool {
        matches!(self, LogStoreError::InvalidEntry(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, LogStoreError::Io(_))
    }
}

/// Codec and file level code speaks `io::Error`.
///
/// Structural decode failures are reported as `InvalidData` or
/// `UnexpectedEof`, these become [`CorruptRecord`] at the store boundary.
impl From<io::Error> for LogStoreError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                let reason = match e.get_ref() {
                    Some(inner) => match inner.downcast_ref::<CorruptRecord>()
                    {
                        Some(c) => c.reason.clone(),
                        None => e.to_string(),
                    },
                    None => e.to_string(),
                };
                LogStoreError::CorruptRecord(CorruptRecord::new(reason))
            }
            _ => LogStoreError::Io(e),
        }
    }
}

impl From<CorruptRecord> for io::Error {
    fn from(value: CorruptRecord) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, value)
    }
}

impl From<LogStoreError> for io::Error {
    fn from(value: LogStoreError) -> Self {
        match value {
            LogStoreError::Io(e) => e,
            LogStoreError::CorruptRecord(e) => e.into(),
            LogStoreError::IndexOutOfRange(e) => {
                io::Error::new(io::ErrorKind::InvalidInput, e)
            }
            LogStoreError::StoreClosed(e) => {
                io::Error::new(io::ErrorKind::Other, e)
            }
            LogStoreError::InvalidEntry(e) => {
                io::Error::new(io::ErrorKind::InvalidInput, e)
            }
        }
    }
}
