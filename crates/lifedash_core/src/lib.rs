//! Core domain logic for the lifedash personal dashboard.
//! This crate owns every business invariant; UI shells go through the FFI
//! crate.

pub mod analytics;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use analytics::insights::{Insights, VisionSummary};
pub use analytics::Analytics;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AnalyticsConfig, ConfigError, StoreConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::goal::Period;
pub use model::validation::ValidationError;
pub use model::EntityId;
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRecord, SnapshotRepository, SqliteSnapshotRepository,
};
pub use service::store_service::{ServiceError, ServiceResult, StoreService};
pub use store::{LifeStore, NotFound, StoreError, StoreResult, StoreState, StreakOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
