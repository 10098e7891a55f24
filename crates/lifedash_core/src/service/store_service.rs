//! Persistent store service.
//!
//! # Responsibility
//! - Rehydrate the store from its snapshot on open.
//! - Write a fresh snapshot after every successful mutation.
//!
//! # Invariants
//! - A failed mutation writes nothing.
//! - A failed write keeps the mutation in memory and reports the error; the
//!   next successful write catches the snapshot up.

use crate::clock::Clock;
use crate::config::{ConfigError, StoreConfig};
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository};
use crate::store::{LifeStore, StoreError, StoreResult, StoreState};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Config(ConfigError),
    Repo(RepoError),
    /// Snapshot payload could not be encoded or decoded.
    Snapshot(serde_json::Error),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "invalid config: {err}"),
            Self::Repo(err) => write!(f, "snapshot storage failed: {err}"),
            Self::Snapshot(err) => write!(f, "snapshot payload is invalid: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ConfigError> for ServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Snapshot(value)
    }
}

/// Store plus the repository its snapshot lives in.
pub struct StoreService<R: SnapshotRepository> {
    repo: R,
    store: LifeStore,
}

impl<R: SnapshotRepository> StoreService<R> {
    /// Loads the snapshot stored under `config.storage_key`, or starts an
    /// empty store when there is none.
    pub fn open(
        repo: R,
        config: StoreConfig,
        clock: impl Clock + Send + Sync + 'static,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let store = match repo.load_snapshot(&config.storage_key)? {
            Some(record) => {
                let state: StoreState = serde_json::from_str(&record.payload).map_err(|err| {
                    error!("event=snapshot_load module=service status=error error_code=decode_failed");
                    ServiceError::Snapshot(err)
                })?;
                info!(
                    "event=snapshot_load module=service status=ok bytes={}",
                    record.payload.len()
                );
                LifeStore::from_state(state, config, clock)?
            }
            None => {
                info!("event=snapshot_load module=service status=empty");
                LifeStore::new(config, clock)?
            }
        };
        Ok(Self { repo, store })
    }

    pub fn store(&self) -> &LifeStore {
        &self.store
    }

    /// Runs one mutation and persists the result when it succeeds.
    pub fn apply<T>(
        &mut self,
        mutation: impl FnOnce(&mut LifeStore) -> StoreResult<T>,
    ) -> ServiceResult<T> {
        let value = mutation(&mut self.store)?;
        self.persist()?;
        Ok(value)
    }

    /// Writes the current state under the configured storage key.
    pub fn persist(&self) -> ServiceResult<()> {
        let payload = serde_json::to_string(self.store.state())?;
        let updated_at = self.store.now().and_utc().timestamp_millis();
        if let Err(err) =
            self.repo
                .save_snapshot(&self.store.config().storage_key, &payload, updated_at)
        {
            error!("event=snapshot_save module=service status=error error={err}");
            return Err(err.into());
        }
        Ok(())
    }

    /// Deletes the stored snapshot and empties the in-memory store.
    pub fn reset(&mut self) -> ServiceResult<()> {
        let removed = self.repo.delete_snapshot(&self.store.config().storage_key)?;
        self.store.clear();
        info!("event=snapshot_reset module=service status=ok removed={removed}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceError, StoreService};
    use crate::clock::FixedClock;
    use crate::config::StoreConfig;
    use crate::db::open_db_in_memory;
    use crate::model::goal::{NewGoal, Period};
    use crate::model::validation::ValidationError;
    use crate::repo::snapshot_repo::{SnapshotRepository, SqliteSnapshotRepository};
    use crate::store::StoreError;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap())
    }

    #[test]
    fn failed_mutation_writes_nothing() {
        let conn = open_db_in_memory().unwrap();
        let mut service = StoreService::open(
            SqliteSnapshotRepository::new(&conn),
            StoreConfig::default(),
            clock(),
        )
        .unwrap();

        let err = service
            .apply(|store| store.add_goal(Period::Today, NewGoal::new("Run", "Nope")))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Store(StoreError::Validation(ValidationError::UnknownPillar(_)))
        ));
        let repo = SqliteSnapshotRepository::new(&conn);
        assert!(repo.load_snapshot("lifedash-store").unwrap().is_none());
    }

    #[test]
    fn reset_clears_memory_and_storage() {
        let conn = open_db_in_memory().unwrap();
        let mut service = StoreService::open(
            SqliteSnapshotRepository::new(&conn),
            StoreConfig::default(),
            clock(),
        )
        .unwrap();
        service.apply(|store| store.add_pillar("Career")).unwrap();
        service.reset().unwrap();

        assert_eq!(service.store().pillars().len(), 4);
        let repo = SqliteSnapshotRepository::new(&conn);
        assert!(repo.load_snapshot("lifedash-store").unwrap().is_none());
    }
}
