pub mod dump;
pub(crate) mod seq_log_store;
pub mod stat;
pub(crate) mod store_inner;
