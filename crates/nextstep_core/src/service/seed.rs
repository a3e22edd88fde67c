//! Bootstrap sample tasks for an empty store.
//!
//! # Invariants
//! - Exactly six tasks, in a fixed order, with due dates relative to `now`.
//! - Creation times increase strictly in list order (saturating at
//!   `i64::MAX`).

use crate::model::task::{Category, Priority, RepeatCycle, Task};
use uuid::Uuid;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Builds the sample task set as of `now_ms`.
pub fn sample_tasks(now_ms: i64) -> Vec<Task> {
    let specs: [(&str, Priority, Category, u32, Option<i64>, RepeatCycle); 6] = [
        (
            "병원 예약하기",
            Priority::High,
            Category::Health,
            15,
            Some(now_ms.saturating_add(DAY_MS)),
            RepeatCycle::none(),
        ),
        (
            "프로젝트 제안서 작성",
            Priority::Urgent,
            Category::Work,
            120,
            Some(now_ms.saturating_add(6 * HOUR_MS)),
            RepeatCycle::none(),
        ),
        (
            "운동하기",
            Priority::Medium,
            Category::Health,
            30,
            None,
            weekly([1, 3, 5]),
        ),
        (
            "책 읽기",
            Priority::Low,
            Category::Learning,
            45,
            None,
            RepeatCycle::none(),
        ),
        (
            "친구에게 연락하기",
            Priority::Medium,
            Category::Social,
            20,
            None,
            RepeatCycle::none(),
        ),
        (
            "청소하기",
            Priority::Medium,
            Category::Household,
            60,
            None,
            weekly([0, 6]),
        ),
    ];

    specs
        .into_iter()
        .enumerate()
        .map(
            |(index, (title, priority, category, minutes, due_date, repeat_cycle))| {
                let mut task = Task::with_id(Uuid::new_v4(), title, offset_ms(now_ms, index));
                task.priority = priority;
                task.category = category;
                task.estimated_minutes = minutes;
                task.due_date = due_date;
                task.repeat_cycle = repeat_cycle;
                task
            },
        )
        .collect()
}

fn offset_ms(now_ms: i64, index: usize) -> i64 {
    now_ms.saturating_add(i64::try_from(index).unwrap_or(i64::MAX))
}

fn weekly<const N: usize>(days: [u8; N]) -> RepeatCycle {
    RepeatCycle {
        is_repeating: true,
        selected_days: days.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::sample_tasks;
    use crate::model::task::Category;

    #[test]
    fn sample_tasks_are_valid_and_distinct() {
        let tasks = sample_tasks(1_800_000_000_000);

        assert_eq!(tasks.len(), 6);
        for task in &tasks {
            task.validate().unwrap();
            assert!(!task.is_completed);
        }
        let categories: Vec<Category> = tasks.iter().map(|task| task.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Health,
                Category::Work,
                Category::Health,
                Category::Learning,
                Category::Social,
                Category::Household,
            ]
        );
        assert!(tasks.windows(2).all(|pair| pair[0].created_at < pair[1].created_at));
    }

    #[test]
    fn sample_tasks_saturate_near_the_end_of_time() {
        let tasks = sample_tasks(i64::MAX - 2);

        let created: Vec<i64> = tasks.iter().map(|task| task.created_at).collect();
        assert_eq!(created[..3], [i64::MAX - 2, i64::MAX - 1, i64::MAX]);
        assert!(created[3..].iter().all(|&at| at == i64::MAX));
        assert_eq!(tasks[0].due_date, Some(i64::MAX));
    }
}
