//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable key-value blob contract (`BlobStore`).
//! - Define the whole-collection task snapshot contract (`TaskRepository`).
//! - Isolate SQLite and encoding details from store orchestration.
//!
//! # Invariants
//! - Task snapshots are always written as a full overwrite of one key.
//! - Repository APIs surface transport and decode errors; absorbing them
//!   is the store's decision, not the repository's.

pub mod blob_store;
pub mod task_repo;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for blob and task snapshot operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// Blob table was stamped by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// Blob store reached through a lock that a panicking writer poisoned.
    Unavailable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "task snapshot encoding failed: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "blob schema version {found} is newer than supported {supported}"
            ),
            Self::Unavailable(store) => write!(f, "blob store unavailable: {store}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Unavailable(_) => None,
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

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
