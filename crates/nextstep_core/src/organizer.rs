//! Task ordering heuristic for the organized view.
//!
//! # Responsibility
//! - Define the multi-criterion comparator used to organize tasks.
//! - Split task sequences into incomplete/completed projections.
//!
//! # Invariants
//! - Sorting is stable: tasks equal under every criterion keep input order.
//! - One `now` is captured per organize call so the comparator stays a
//!   strict weak ordering for the whole sort.
//! - Organizing never mutates task fields, only sequence positions.

use crate::model::task::{Task, URGENCY_BAND_SECS};
use std::cmp::Ordering;

const URGENCY_BAND_MS: i64 = URGENCY_BAND_SECS * 1000;

/// Compares two tasks for the organized view.
///
/// Criteria, first discriminating one wins:
/// 1. incomplete before completed
/// 2. due inside the 24h band before due outside it (both must have a due date)
/// 3. sooner due date first (both have one, same band)
/// 4. having a due date before having none
/// 5. priority rank
/// 6. smaller effort estimate
/// 7. earlier creation time
pub fn compare_tasks(left: &Task, right: &Task, now_ms: i64) -> Ordering {
    left.is_completed
        .cmp(&right.is_completed)
        .then_with(|| compare_due_dates(left, right, now_ms))
        .then_with(|| left.priority.rank().cmp(&right.priority.rank()))
        .then_with(|| left.estimated_minutes.cmp(&right.estimated_minutes))
        .then_with(|| left.created_at.cmp(&right.created_at))
}

fn compare_due_dates(left: &Task, right: &Task, now_ms: i64) -> Ordering {
    match (left.millis_until_due(now_ms), right.millis_until_due(now_ms)) {
        (Some(left_until), Some(right_until)) => {
            let left_in_band = left_until < URGENCY_BAND_MS;
            let right_in_band = right_until < URGENCY_BAND_MS;
            if left_in_band && !right_in_band {
                return Ordering::Less;
            }
            if right_in_band && !left_in_band {
                return Ordering::Greater;
            }
            left_until.cmp(&right_until)
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts tasks in place into organized order as of `now_ms`.
pub fn organize_tasks(tasks: &mut [Task], now_ms: i64) {
    tasks.sort_by(|left, right| compare_tasks(left, right, now_ms));
}

/// Incomplete tasks in current sequence order.
pub fn incomplete(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| !task.is_completed).collect()
}

/// Completed tasks in current sequence order.
pub fn completed(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_completed).collect()
}

#[cfg(test)]
mod tests {
    use super::{compare_due_dates, compare_tasks, organize_tasks};
    use crate::model::task::{Priority, Task};
    use std::cmp::Ordering;
    use uuid::Uuid;

    const NOW: i64 = 1_800_000_000_000;
    const HOUR_MS: i64 = 3_600_000;

    fn task(title: &str, created_at: i64) -> Task {
        Task::with_id(Uuid::new_v4(), title, created_at)
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn band_membership_beats_raw_proximity_across_the_boundary() {
        let mut inside = task("inside", 1);
        inside.due_date = Some(NOW + 23 * HOUR_MS);
        let mut outside = task("outside", 2);
        outside.due_date = Some(NOW + 25 * HOUR_MS);

        assert_eq!(compare_due_dates(&inside, &outside, NOW), Ordering::Less);
        assert_eq!(compare_due_dates(&outside, &inside, NOW), Ordering::Greater);
    }

    #[test]
    fn exactly_24h_away_is_outside_the_band() {
        let mut boundary = task("boundary", 1);
        boundary.due_date = Some(NOW + 24 * HOUR_MS);
        let mut later = task("later", 2);
        later.due_date = Some(NOW + 48 * HOUR_MS);
        let mut sooner = task("sooner", 3);
        sooner.due_date = Some(NOW + 6 * HOUR_MS);

        assert!(!boundary.is_due_soon(NOW));
        assert_eq!(compare_due_dates(&sooner, &boundary, NOW), Ordering::Less);
        assert_eq!(compare_due_dates(&boundary, &later, NOW), Ordering::Less);
    }

    #[test]
    fn overdue_tasks_count_as_inside_the_band() {
        let mut overdue = task("overdue", 1);
        overdue.due_date = Some(NOW - 2 * HOUR_MS);
        let mut soon = task("soon", 2);
        soon.due_date = Some(NOW + HOUR_MS);

        assert_eq!(compare_due_dates(&overdue, &soon, NOW), Ordering::Less);
    }

    #[test]
    fn due_date_presence_only_decides_when_one_side_has_none() {
        let mut dated = task("dated", 2);
        dated.due_date = Some(NOW + 72 * HOUR_MS);
        dated.priority = Priority::Low;
        let mut undated = task("undated", 1);
        undated.priority = Priority::Urgent;

        assert_eq!(compare_tasks(&dated, &undated, NOW), Ordering::Less);
        assert_eq!(compare_due_dates(&undated, &undated, NOW), Ordering::Equal);
    }

    #[test]
    fn falls_through_priority_effort_and_creation_time() {
        let mut high = task("high", 5);
        high.priority = Priority::High;
        let mut quick = task("quick", 4);
        quick.estimated_minutes = 5;
        let older = task("older", 1);
        let newer = task("newer", 2);

        let mut tasks = vec![newer, older, quick, high];
        organize_tasks(&mut tasks, NOW);

        assert_eq!(titles(&tasks), vec!["high", "quick", "older", "newer"]);
    }

    #[test]
    fn completed_tasks_sink_below_everything() {
        let mut done = task("done", 1);
        done.is_completed = true;
        done.priority = Priority::Urgent;
        done.due_date = Some(NOW + HOUR_MS);
        let mut open = task("open", 2);
        open.priority = Priority::Low;

        let mut tasks = vec![done, open];
        organize_tasks(&mut tasks, NOW);

        assert_eq!(titles(&tasks), vec!["open", "done"]);
    }

    #[test]
    fn fully_equal_tasks_keep_input_order() {
        let first = Task::with_id(Uuid::new_v4(), "first", 7);
        let second = Task::with_id(Uuid::new_v4(), "second", 7);
        let third = Task::with_id(Uuid::new_v4(), "third", 7);

        let mut tasks = vec![second, first, third];
        organize_tasks(&mut tasks, NOW);

        assert_eq!(titles(&tasks), vec!["second", "first", "third"]);
    }
}
