use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::task::Task;
use crate::util::dates::parse_date;

/// Sort key of a task within its column.
///
/// Priority first (HIGH before LOW), then start date, then end date, then the
/// lowercased description. Unset or unparseable dates sort as the far future,
/// so an unscheduled task falls to the end of its priority band.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TaskSortKey {
    priority: u8,
    start: NaiveDate,
    end: NaiveDate,
    description: String,
}

impl TaskSortKey {
    pub fn of(task: &Task) -> Self {
        TaskSortKey {
            priority: task.priority.value(),
            start: parse_date(&task.start_date).unwrap_or(NaiveDate::MAX),
            end: parse_date(&task.end_date).unwrap_or(NaiveDate::MAX),
            description: task.description.to_lowercase(),
        }
    }
}

/// Compare two tasks by their column order.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    TaskSortKey::of(a).cmp(&TaskSortKey::of(b))
}

/// Sort a column in place. The sort is stable, so tasks with identical keys
/// keep their relative order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_cached_key(TaskSortKey::of);
}

/// Return a sorted copy of `tasks`.
pub fn ordered(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    sort_tasks(&mut out);
    out
}

/// Whether every adjacent pair is non-decreasing by the column order.
pub fn is_sorted(tasks: &[Task]) -> bool {
    tasks
        .windows(2)
        .all(|pair| compare_tasks(&pair[0], &pair[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use pretty_assertions::assert_eq;

    fn task(desc: &str, priority: Priority, start: &str, end: &str) -> Task {
        Task::new(
            "inbox",
            desc,
            priority,
            start,
            end,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn descriptions(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn priority_dominates() {
        let sorted = ordered(&[
            task("low", Priority::Low, "2020-01-01", ""),
            task("high", Priority::High, "", ""),
            task("medium", Priority::Medium, "", ""),
        ]);
        assert_eq!(descriptions(&sorted), vec!["high", "medium", "low"]);
    }

    #[test]
    fn unset_dates_sort_last_within_band() {
        let sorted = ordered(&[
            task("undated", Priority::High, "", ""),
            task("later", Priority::High, "2024-02-01", ""),
            task("sooner", Priority::High, "2024-01-10", ""),
            task("garbled", Priority::High, "soon", ""),
        ]);
        assert_eq!(
            descriptions(&sorted),
            vec!["sooner", "later", "garbled", "undated"]
        );
    }

    #[test]
    fn end_date_then_description_break_ties() {
        let sorted = ordered(&[
            task("b open", Priority::Medium, "2024-01-10", ""),
            task("Zeta", Priority::Medium, "2024-01-10", "2024-01-12"),
            task("alpha", Priority::Medium, "2024-01-10", "2024-01-12"),
            task("early end", Priority::Medium, "2024-01-10", "2024-01-11"),
            task("a open", Priority::Medium, "2024-01-10", ""),
        ]);
        assert_eq!(
            descriptions(&sorted),
            vec!["early end", "alpha", "Zeta", "a open", "b open"]
        );
    }

    #[test]
    fn ordering_is_idempotent_and_non_decreasing() {
        let tasks = vec![
            task("d", Priority::Low, "", "2024-03-01"),
            task("c", Priority::High, "2024-05-01", "2024-05-02"),
            task("B", Priority::High, "2024-05-01", "2024-05-02"),
            task("a", Priority::Medium, "", ""),
            task("e", Priority::High, "", ""),
        ];
        let once = ordered(&tasks);
        let twice = ordered(&once);
        assert_eq!(once, twice);
        assert!(is_sorted(&once));
        assert!(!is_sorted(&tasks));
    }
}
