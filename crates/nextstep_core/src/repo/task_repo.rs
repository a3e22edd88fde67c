//! Task snapshot repository.
//!
//! # Responsibility
//! - Load and save the whole ordered task collection as one blob.
//! - Own the wire encoding (JSON array of camelCase task records).
//!
//! # Invariants
//! - `save` always writes the full collection; there are no partial writes.
//! - `load` returns `Ok(None)` only when the key has never been written.
//! - Anything `save` wrote, `load` reads back unchanged. Records that break
//!   a task invariant are reported, not dropped.

use crate::model::task::Task;
use crate::repo::blob_store::BlobStore;
use crate::repo::RepoResult;
use log::warn;
use std::collections::HashSet;

/// Blob key used for the task collection unless configured otherwise.
pub const DEFAULT_TASKS_KEY: &str = "todos";

/// Whole-collection persistence boundary for the task store.
pub trait TaskRepository {
    /// Reads the persisted collection. `Ok(None)` means nothing stored yet.
    fn load(&self) -> RepoResult<Option<Vec<Task>>>;
    /// Overwrites the persisted collection.
    fn save(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// Task repository that stores the collection as JSON in a blob store.
pub struct BlobTaskRepository<B: BlobStore> {
    blobs: B,
    key: String,
}

impl<B: BlobStore> BlobTaskRepository<B> {
    /// Creates a repository using [`DEFAULT_TASKS_KEY`].
    pub fn new(blobs: B) -> Self {
        Self::with_key(blobs, DEFAULT_TASKS_KEY)
    }

    /// Creates a repository writing to a custom blob key.
    pub fn with_key(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn blob_store(&self) -> &B {
        &self.blobs
    }
}

impl<B: BlobStore> TaskRepository for BlobTaskRepository<B> {
    fn load(&self) -> RepoResult<Option<Vec<Task>>> {
        match self.blobs.get(&self.key)? {
            Some(bytes) => decode_tasks(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let bytes = encode_tasks(tasks)?;
        self.blobs.put(&self.key, &bytes)
    }
}

/// Encodes a task collection into its persisted byte form.
pub fn encode_tasks(tasks: &[Task]) -> RepoResult<Vec<u8>> {
    Ok(serde_json::to_vec(tasks)?)
}

/// Decodes a persisted task collection.
///
/// Invalid records and repeated ids are kept as stored and logged at `warn`,
/// so a snapshot the store was able to write always reads back.
///
/// # Errors
/// - `Serialization` for malformed JSON or unknown enum values.
pub fn decode_tasks(bytes: &[u8]) -> RepoResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_slice(bytes)?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        if let Err(err) = task.validate() {
            warn!(
                "event=tasks_decode module=repo status=degraded index={} task_id={} error={}",
                index, task.id, err
            );
        }
        if !seen.insert(task.id) {
            warn!(
                "event=tasks_decode module=repo status=degraded index={} task_id={} error=duplicate_id",
                index, task.id
            );
        }
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks};
    use crate::model::task::Task;
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn decode_keeps_duplicate_ids_in_order() {
        let task = Task::new("twice");
        let bytes = encode_tasks(&[task.clone(), task.clone()]).unwrap();

        assert_eq!(decode_tasks(&bytes).unwrap(), vec![task.clone(), task]);
    }

    #[test]
    fn decode_keeps_records_that_fail_validation() {
        let mut blank = Task::new("placeholder");
        blank.title = "   ".to_string();
        let mut off_week = Task::new("off week");
        off_week.repeat_cycle.selected_days.insert(9);
        let nil = Task::with_id(Uuid::nil(), "nil id", 1);
        let tasks = vec![blank, off_week, nil];

        let bytes = encode_tasks(&tasks).unwrap();
        assert_eq!(decode_tasks(&bytes).unwrap(), tasks);
    }

    #[test]
    fn decode_reports_malformed_json_as_serialization_error() {
        assert!(matches!(
            decode_tasks(b"{not json"),
            Err(RepoError::Serialization(_))
        ));
    }
}
