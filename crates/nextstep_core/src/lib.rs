//! Core domain logic for NextStep.
//! This crate owns the task model, the organizer heuristic and persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod organizer;
pub mod repo;
pub mod service;

pub use config::{open_task_store, SqliteTaskStore, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    now_epoch_ms, Category, NewTask, Priority, RepeatCycle, Task, TaskId, TaskValidationError,
};
pub use organizer::{compare_tasks, organize_tasks};
pub use repo::blob_store::{BlobStore, MemoryBlobStore, SqliteBlobStore, BLOB_SCHEMA_VERSION};
pub use repo::task_repo::{BlobTaskRepository, TaskRepository, DEFAULT_TASKS_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::task_store::TaskStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
