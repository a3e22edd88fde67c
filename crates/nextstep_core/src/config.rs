//! Store bootstrap configuration.
//!
//! # Responsibility
//! - Describe where the task snapshot lives and how first launch behaves.
//! - Build a ready-to-use SQLite-backed task store from that description.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::repo::blob_store::SqliteBlobStore;
use crate::repo::task_repo::{BlobTaskRepository, DEFAULT_TASKS_KEY};
use crate::repo::RepoResult;
use crate::service::task_store::TaskStore;
use log::info;
use std::path::PathBuf;

/// Task store type produced by [`open_task_store`].
pub type SqliteTaskStore = TaskStore<BlobTaskRepository<SqliteBlobStore>>;

/// Configuration for opening a task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file path. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// Blob key holding the serialized task list.
    pub storage_key: String,
    /// Seed sample tasks when the loaded collection is empty.
    pub seed_samples: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            storage_key: DEFAULT_TASKS_KEY.to_string(),
            seed_samples: true,
        }
    }
}

impl StoreConfig {
    /// File-backed configuration with default key and seeding.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Opens the database, wires the blob repository and loads the store.
///
/// # Errors
/// - Returns database and blob schema errors; a corrupt task snapshot is not an
///   error and yields an empty (or seeded) store.
pub fn open_task_store(config: &StoreConfig) -> RepoResult<SqliteTaskStore> {
    let conn = open_connection(config)?;
    let repo = BlobTaskRepository::with_key(
        SqliteBlobStore::try_new(conn)?,
        config.storage_key.as_str(),
    );
    let store = if config.seed_samples {
        TaskStore::open(repo)
    } else {
        TaskStore::open_without_seed(repo)
    };
    info!(
        "event=store_open module=config status=ok persistent={} seed_samples={} count={}",
        config.db_path.is_some(),
        config.seed_samples,
        store.len()
    );
    Ok(store)
}

fn open_connection(config: &StoreConfig) -> DbResult<rusqlite::Connection> {
    match &config.db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
}
