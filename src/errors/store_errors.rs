/// A persisted record or a pack does not have the expected structure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(thiserror::Error)]
#[error("CorruptRecord: {reason}")]
pub struct CorruptRecord {
    pub reason: String,
}

impl CorruptRecord {
    pub fn new(reason: impl ToString) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// A position was requested that the store never held.
///
/// `first_available` is one past the last stored position at the time of
/// the request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(thiserror::Error)]
#[error(
    "IndexOutOfRange: index {index}, first available index {first_available}"
)]
pub struct IndexOutOfRange {
    pub index: u64,
    pub first_available: u64,
}

impl IndexOutOfRange {
    pub fn new(index: u64, first_available: u64) -> Self {
        Self {
            index,
            first_available,
        }
    }
}

/// An operation was attempted after the store was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(thiserror::Error)]
#[error("StoreClosed: {dir} is closed when:({when})")]
pub struct StoreClosed {
    pub dir: String,
    pub when: &'static str,
}

impl StoreClosed {
    pub fn new(dir: impl ToString, when: &'static str) -> Self {
        Self {
            dir: dir.to_string(),
            when,
        }
    }
}

/// An entry that can not be stored, e.g., one with the reserved term 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(thiserror::Error)]
#[error("InvalidEntry: {reason}")]
pub struct InvalidEntry {
    pub reason: String,
}

impl InvalidEntry {
    pub fn new(reason: impl ToString) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}
