//! Task store use-case service.
//!
//! # Responsibility
//! - Own the authoritative, ordered task collection and the view flag.
//! - Apply create/update/delete/toggle mutations and persist after each.
//! - Expose derived incomplete/completed/category projections.
//!
//! # Invariants
//! - Every successful mutation is followed by a full-collection save.
//! - Persistence failures never fail or roll back a mutation; they are
//!   logged and dropped.
//! - Projections are recomputed on each call and borrow from the store.
//! - `unorganize` does not restore insertion order.

use crate::model::task::{now_epoch_ms, Category, NewTask, Task, TaskId, TaskValidationError};
use crate::organizer;
use crate::repo::task_repo::TaskRepository;
use crate::service::seed::sample_tasks;
use log::{debug, info, warn};

/// Single-writer task store over a persistence repository.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    is_organized: bool,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Loads persisted tasks and seeds sample data when the result is empty.
    pub fn open(repo: R) -> Self {
        let mut store = Self::open_without_seed(repo);
        store.seed_if_empty();
        store
    }

    /// Loads persisted tasks without seeding.
    ///
    /// Any load failure degrades to an empty collection.
    pub fn open_without_seed(repo: R) -> Self {
        let tasks = match repo.load() {
            Ok(Some(tasks)) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Ok(None) => {
                info!("event=store_load module=store status=empty reason=missing_key");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback error_code=load_failed error={}",
                    err
                );
                Vec::new()
            }
        };

        Self {
            repo,
            tasks,
            is_organized: false,
        }
    }

    /// Seeds the sample tasks if the collection is empty, then persists.
    ///
    /// Returns `true` when seeding happened.
    pub fn seed_if_empty(&mut self) -> bool {
        if !self.tasks.is_empty() {
            return false;
        }
        self.tasks = sample_tasks(now_epoch_ms());
        info!(
            "event=store_seed module=store status=ok count={}",
            self.tasks.len()
        );
        self.persist("seed");
        true
    }

    /// Appends a constructed task and persists.
    pub fn add(&mut self, task: Task) {
        debug!("event=task_add module=store task_id={}", task.id);
        self.tasks.push(task);
        self.persist("add");
    }

    /// Builds a task from the creation contract, appends it and persists.
    ///
    /// # Errors
    /// - Propagates `TaskValidationError` (e.g. blank title); nothing is
    ///   added in that case.
    pub fn create(&mut self, request: NewTask) -> Result<TaskId, TaskValidationError> {
        let task = request.into_task()?;
        let id = task.id;
        self.add(task);
        Ok(id)
    }

    /// Replaces the task with the same id in place and persists.
    ///
    /// Returns `false` (and writes nothing) when the id is unknown.
    pub fn update(&mut self, task: Task) -> bool {
        let Some(slot) = self.tasks.iter_mut().find(|existing| existing.id == task.id) else {
            debug!(
                "event=task_update module=store status=skipped reason=not_found task_id={}",
                task.id
            );
            return false;
        };
        *slot = task;
        self.persist("update");
        true
    }

    /// Removes every task with `id` and persists. Returns the removed count.
    pub fn delete(&mut self, id: TaskId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = before - self.tasks.len();
        debug!("event=task_delete module=store task_id={id} removed={removed}");
        self.persist("delete");
        removed
    }

    /// Flips completion of the task with `id` and persists.
    ///
    /// Returns `false` (and writes nothing) when the id is unknown.
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(
                "event=task_toggle module=store status=skipped reason=not_found task_id={id}"
            );
            return false;
        };
        task.is_completed = !task.is_completed;
        self.persist("toggle");
        true
    }

    /// Sorts the collection into organized order as of now and persists.
    pub fn organize(&mut self) {
        self.organize_at(now_epoch_ms());
    }

    /// Same as [`TaskStore::organize`] with an explicit clock reading.
    pub fn organize_at(&mut self, now_ms: i64) {
        organizer::organize_tasks(&mut self.tasks, now_ms);
        self.is_organized = true;
        info!(
            "event=store_organize module=store status=ok count={}",
            self.tasks.len()
        );
        self.persist("organize");
    }

    /// Switches back to the floating view. Order is left as is.
    pub fn unorganize(&mut self) {
        self.is_organized = false;
    }

    pub fn is_organized(&self) -> bool {
        self.is_organized
    }

    /// Current authoritative sequence.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Incomplete tasks in current collection order.
    pub fn incomplete_todos(&self) -> Vec<&Task> {
        organizer::incomplete(&self.tasks)
    }

    /// Completed tasks in current collection order.
    pub fn completed_todos(&self) -> Vec<&Task> {
        organizer::completed(&self.tasks)
    }

    /// Incomplete tasks in `category`, in current collection order.
    pub fn todos_by_category(&self, category: Category) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.category == category && !task.is_completed)
            .collect()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn persist(&self, reason: &str) {
        if let Err(err) = self.repo.save(&self.tasks) {
            warn!(
                "event=store_save module=store status=dropped reason={} count={} error={}",
                reason,
                self.tasks.len(),
                err
            );
        }
    }
}
