//! A single consensus log record and its fixed-layout binary form.

pub(crate) mod log_entry;
pub(crate) mod value_type;
