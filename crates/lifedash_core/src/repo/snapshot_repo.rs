//! Snapshot repository contract and SQLite implementation.
//!
//! # Invariants
//! - At most one row per storage key; saves replace the previous payload.
//! - A missing row is `Ok(None)`, never an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Storage keys must be non-blank.
    EmptyKey,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyKey => write!(f, "snapshot storage key must not be empty"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptyKey => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One stored snapshot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub storage_key: String,
    /// Serialized store state.
    pub payload: String,
    /// Epoch milliseconds of the last save.
    pub updated_at: i64,
}

pub trait SnapshotRepository {
    fn load_snapshot(&self, storage_key: &str) -> RepoResult<Option<SnapshotRecord>>;
    fn save_snapshot(&self, storage_key: &str, payload: &str, updated_at: i64) -> RepoResult<()>;
    /// Returns whether a row was removed.
    fn delete_snapshot(&self, storage_key: &str) -> RepoResult<bool>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_snapshot(&self, storage_key: &str) -> RepoResult<Option<SnapshotRecord>> {
        let key = checked_key(storage_key)?;
        let record = self
            .conn
            .query_row(
                "SELECT storage_key, payload, updated_at FROM snapshots WHERE storage_key = ?1",
                params![key],
                |row| {
                    Ok(SnapshotRecord {
                        storage_key: row.get(0)?,
                        payload: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn save_snapshot(&self, storage_key: &str, payload: &str, updated_at: i64) -> RepoResult<()> {
        let key = checked_key(storage_key)?;
        self.conn.execute(
            "INSERT INTO snapshots (storage_key, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            params![key, payload, updated_at],
        )?;
        Ok(())
    }

    fn delete_snapshot(&self, storage_key: &str) -> RepoResult<bool> {
        let key = checked_key(storage_key)?;
        let removed = self
            .conn
            .execute("DELETE FROM snapshots WHERE storage_key = ?1", params![key])?;
        Ok(removed > 0)
    }
}

fn checked_key(storage_key: &str) -> RepoResult<&str> {
    let key = storage_key.trim();
    if key.is_empty() {
        Err(RepoError::EmptyKey)
    } else {
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::{RepoError, SnapshotRepository, SqliteSnapshotRepository};
    use crate::db::open_db_in_memory;

    #[test]
    fn save_replaces_previous_payload() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSnapshotRepository::new(&conn);

        assert!(repo.load_snapshot("lifedash-store").unwrap().is_none());
        repo.save_snapshot("lifedash-store", "{\"a\":1}", 10).unwrap();
        repo.save_snapshot("lifedash-store", "{\"a\":2}", 20).unwrap();

        let record = repo.load_snapshot("lifedash-store").unwrap().unwrap();
        assert_eq!(record.payload, "{\"a\":2}");
        assert_eq!(record.updated_at, 20);

        assert!(repo.delete_snapshot("lifedash-store").unwrap());
        assert!(!repo.delete_snapshot("lifedash-store").unwrap());
    }

    #[test]
    fn blank_key_is_rejected() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSnapshotRepository::new(&conn);
        assert!(matches!(
            repo.save_snapshot("  ", "{}", 0),
            Err(RepoError::EmptyKey)
        ));
    }
}
