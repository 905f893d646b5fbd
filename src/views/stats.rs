//! Aggregate counts over a task collection.

use super::dates::is_overdue;
use crate::types::{Priority, Task, TaskStats};
use chrono::{DateTime, FixedOffset};

/// Single pass over `tasks`. Overdue uses calendar days in `now`'s zone.
pub fn task_stats(tasks: &[Task], now: DateTime<FixedOffset>) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };

    for task in tasks {
        if task.completed {
            stats.completed += 1;
            continue;
        }
        if task.priority == Priority::Urgent {
            stats.urgent += 1;
        }
        if task.due_date.is_some_and(|due| is_overdue(due, now)) {
            stats.overdue += 1;
        }
    }

    stats.pending = stats.total - stats.completed;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{now, task};

    #[test]
    fn empty_collection() {
        assert_eq!(task_stats(&[], now()), TaskStats::default());
    }

    #[test]
    fn counts_each_field() {
        let tasks = vec![
            task("urgent overdue")
                .priority(Priority::Urgent)
                .due("2026-10-17T09:00:00+02:00")
                .build(),
            task("urgent done")
                .priority(Priority::Urgent)
                .due("2026-10-01T09:00:00+02:00")
                .completed()
                .build(),
            task("due today").due("2026-10-18T06:00:00+02:00").build(),
            task("no date").priority(Priority::Low).build(),
        ];
        let stats = task_stats(&tasks, now());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.completed + stats.pending, stats.total);
    }
}
