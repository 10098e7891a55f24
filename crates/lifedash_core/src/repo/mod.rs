//! Persistence contracts for the store snapshot.
//!
//! # Responsibility
//! - Hide SQL behind a small key/value style trait.
//!
//! # Invariants
//! - Repositories move opaque JSON payloads; they never parse them.
//!
//! # See also
//! - `crate::service::store_service` for serialization.

pub mod snapshot_repo;
