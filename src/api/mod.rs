//! Core API interfaces for the sequential log store.

pub mod sequential_log_store;
