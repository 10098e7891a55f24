//! Use-case services over the store.
//!
//! # Responsibility
//! - Pair the in-memory store with snapshot persistence.
//! - Keep FFI callers away from SQL and JSON details.

pub mod store_service;
