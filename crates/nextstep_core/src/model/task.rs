//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted by the task store.
//! - Own the closed priority/category sets and the repeat metadata.
//! - Provide the creation contract used by "add" callers.
//!
//! # Invariants
//! - `id` is stable, non-nil and never reused for another task.
//! - `repeat_cycle.selected_days` holds unique values; `validate()` checks
//!   they fall in `0..=6`.
//! - `estimated_minutes` is non-negative (enforced by `u32`).
//! - Wire field names are camelCase and must not change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every task.
pub type TaskId = Uuid;

/// Default effort estimate for new tasks, in minutes.
pub const DEFAULT_ESTIMATED_MINUTES: u32 = 30;

/// Width of the urgency band before a due date, in seconds.
pub const URGENCY_BAND_SECS: i64 = 86_400;

/// Highest valid weekday index (`0 = Sunday .. 6 = Saturday`).
pub const MAX_WEEKDAY: u8 = 6;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Task priority. Declared in rank order, most pressing first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

/// Fixed rank table used by the organizer.
const PRIORITY_ORDER: [Priority; 4] = [
    Priority::Urgent,
    Priority::High,
    Priority::Medium,
    Priority::Low,
];

impl Priority {
    /// All priorities in rank order.
    pub const ALL: [Priority; 4] = PRIORITY_ORDER;

    /// Rank used for ordering: `urgent=0 < high=1 < medium=2 < low=3`.
    ///
    /// A value missing from the rank table would rank after every known one.
    pub fn rank(self) -> usize {
        PRIORITY_ORDER
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(PRIORITY_ORDER.len())
    }

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Display grouping for tasks. Carries no ordering semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    #[default]
    Personal,
    Health,
    Social,
    Learning,
    Household,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Social,
        Category::Learning,
        Category::Household,
    ];

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Health => "health",
            Self::Social => "social",
            Self::Learning => "learning",
            Self::Household => "household",
        }
    }
}

/// Descriptive weekly repeat metadata. Never expanded into occurrences.
///
/// `selected_days` is ignored while `is_repeating` is `false`, but kept
/// so toggling repetition back on restores the previous selection.
///
/// Decoding collapses duplicate days but does not range-check them; stored
/// data is never rejected for a field the store itself accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatCycle {
    pub is_repeating: bool,
    pub selected_days: BTreeSet<u8>,
}

impl RepeatCycle {
    /// Builds a repeat cycle, collapsing duplicate days.
    ///
    /// # Errors
    /// - `InvalidWeekday` when any day is outside `0..=6`.
    pub fn new(
        is_repeating: bool,
        days: impl IntoIterator<Item = u8>,
    ) -> Result<Self, TaskValidationError> {
        let cycle = Self {
            is_repeating,
            selected_days: days.into_iter().collect(),
        };
        cycle.validate()?;
        Ok(cycle)
    }

    /// Non-repeating cycle with no selected days.
    pub fn none() -> Self {
        Self::default()
    }

    /// Validates the weekday range invariant.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        match self.selected_days.iter().find(|day| **day > MAX_WEEKDAY) {
            Some(day) => Err(TaskValidationError::InvalidWeekday(*day)),
            None => Ok(()),
        }
    }

    /// Selected days in ascending order (Sunday first).
    pub fn sorted_days(&self) -> Vec<u8> {
        self.selected_days.iter().copied().collect()
    }

    /// Short weekday labels for the selected days, Sunday first.
    pub fn weekday_labels(&self) -> Vec<&'static str> {
        self.selected_days
            .iter()
            .filter_map(|day| WEEKDAY_LABELS.get(usize::from(*day)).copied())
            .collect()
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
    pub category: Category,
    /// Total estimated effort in minutes.
    pub estimated_minutes: u32,
    /// Unix epoch milliseconds. `None` means no deadline.
    pub due_date: Option<i64>,
    pub repeat_cycle: RepeatCycle,
    pub is_completed: bool,
    /// Unix epoch milliseconds, fixed at creation. Final ordering tie-break.
    pub created_at: i64,
}

impl Task {
    /// Creates an incomplete task with default attributes and a fresh ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, now_epoch_ms())
    }

    /// Creates a task with caller-provided identity and creation time.
    ///
    /// Used by seed/import paths and tests that need deterministic values.
    pub fn with_id(id: TaskId, title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            title: title.into(),
            priority: Priority::default(),
            category: Category::default(),
            estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            due_date: None,
            repeat_cycle: RepeatCycle::none(),
            is_completed: false,
            created_at,
        }
    }

    /// Validates structural invariants.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - `EmptyTitle` when the title is blank after trimming.
    /// - `InvalidWeekday` when a repeat day is outside `0..=6`.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        self.repeat_cycle.validate()
    }

    /// Seconds from `now_ms` until the due date; negative when overdue.
    pub fn seconds_until_due(&self, now_ms: i64) -> Option<i64> {
        self.millis_until_due(now_ms)
            .map(|millis| millis.div_euclid(1000))
    }

    /// Whether the due date falls inside the 24h urgency band.
    ///
    /// Overdue tasks are inside the band.
    pub fn is_due_soon(&self, now_ms: i64) -> bool {
        self.millis_until_due(now_ms)
            .is_some_and(|millis| millis < URGENCY_BAND_SECS * 1000)
    }

    /// Milliseconds from `now_ms` until the due date; negative when overdue.
    pub fn millis_until_due(&self, now_ms: i64) -> Option<i64> {
        self.due_date.map(|due| due.saturating_sub(now_ms))
    }

    /// Splits the estimate into whole hours and remaining minutes.
    pub fn estimated_hours_minutes(&self) -> (u32, u32) {
        (self.estimated_minutes / 60, self.estimated_minutes % 60)
    }
}

/// Creation contract consumed from "add" callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Raw title; surrounding whitespace is trimmed.
    pub title: String,
    pub priority: Priority,
    pub category: Category,
    /// Effort as entered: `hours * 60 + minutes` is stored.
    pub estimated_hours: u32,
    pub estimated_minutes: u32,
    pub due_date: Option<i64>,
    pub repeat_cycle: RepeatCycle,
}

impl NewTask {
    /// Request with default attributes (`medium`, `personal`, 30 minutes).
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: Priority::default(),
            category: Category::default(),
            estimated_hours: 0,
            estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            due_date: None,
            repeat_cycle: RepeatCycle::none(),
        }
    }

    /// Total effort in minutes.
    pub fn total_minutes(&self) -> u32 {
        self.estimated_hours
            .saturating_mul(60)
            .saturating_add(self.estimated_minutes)
    }

    /// Builds a task with a fresh ID, `created_at = now`, not completed.
    pub fn into_task(self) -> Result<Task, TaskValidationError> {
        self.into_task_at(now_epoch_ms())
    }

    /// Same as [`NewTask::into_task`] with an explicit creation time.
    ///
    /// # Errors
    /// - `EmptyTitle` when the trimmed title is empty.
    /// - `InvalidWeekday` when repeat days are out of range.
    pub fn into_task_at(self, created_at: i64) -> Result<Task, TaskValidationError> {
        let estimated_minutes = self.total_minutes();
        let mut task = Task::with_id(Uuid::new_v4(), self.title.trim(), created_at);
        task.priority = self.priority;
        task.category = self.category;
        task.estimated_minutes = estimated_minutes;
        task.due_date = self.due_date;
        task.repeat_cycle = self.repeat_cycle;
        task.validate()?;
        Ok(task)
    }
}

/// Task invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    EmptyTitle,
    InvalidWeekday(u8),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::InvalidWeekday(day) => {
                write!(f, "weekday {day} is out of range 0..={MAX_WEEKDAY}")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Falls back to `0` if the system clock is before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
