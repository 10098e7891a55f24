//! Domain model for the life dashboard store.
//!
//! # Responsibility
//! - Define canonical entity shapes shared by store, analytics and snapshots.
//! - Define typed creation requests and partial-update patches per entity.
//!
//! # Invariants
//! - Every entity carries a `pillar` label that must name an existing pillar.
//! - Deletion is a hard delete; there are no tombstones.
//! - Wire field names are camelCase to match the persisted snapshot schema.

pub mod achievement;
pub mod goal;
pub mod journal;
pub mod time_log;
pub mod user;
pub mod validation;
pub mod vision;

/// Process-unique, monotonically increasing, timestamp-derived identifier.
pub type EntityId = u64;
