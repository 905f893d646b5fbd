//! Derived views over a user's tasks: filtering, ordering, statistics and
//! due-date classification.
//!
//! Everything here is a pure function of its inputs. The current time is
//! always passed in, usually from a [`Clock`].

pub mod dates;
pub mod filter;
pub mod palette;
pub mod sort;
pub mod stats;

pub use dates::{
    Clock, DueDateClassifier, FixedClock, SystemClock, due_date_status, format_relative_time,
};
pub use filter::{FilterCriteria, Selector, filter_tasks};
pub use palette::{PriorityPalette, category_color, priority_palette};
pub use sort::sort_tasks;
pub use stats::task_stats;

use crate::types::{DueDateStatus, Task};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A task annotated for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub due_status: DueDateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_relative: Option<String>,
    pub category_color: &'static str,
    pub priority_color: PriorityPalette,
}

impl TaskView {
    pub fn new(task: Task, classifier: &DueDateClassifier, now: DateTime<FixedOffset>) -> Self {
        let due_status = classifier.classify(task.due_date, now);
        let due_label = task.due_date.map(|due| dates::due_label(due, now));
        let due_relative = task.due_date.map(|due| format_relative_time(due, now));
        let category_color = category_color(task.category.as_str());
        let priority_color = priority_palette(task.priority);
        Self {
            task,
            due_status,
            due_label,
            due_relative,
            category_color,
            priority_color,
        }
    }
}

/// Filter, order and annotate in one go.
pub fn task_views(
    tasks: &[Task],
    criteria: &FilterCriteria,
    classifier: &DueDateClassifier,
    now: DateTime<FixedOffset>,
) -> Vec<TaskView> {
    sort_tasks(&filter_tasks(tasks, criteria))
        .into_iter()
        .map(|task| TaskView::new(task, classifier, now))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::{now, task};
    use super::*;
    use crate::types::Priority;

    #[test]
    fn overdue_urgent_task_shows_in_view_and_stats() {
        let tasks = vec![
            task("pay rent")
                .priority(Priority::Urgent)
                .due("2026-10-17T12:00:00+02:00")
                .build(),
        ];
        let views = task_views(&tasks, &FilterCriteria::default(), &DueDateClassifier::default(), now());
        assert_eq!(views[0].due_status, DueDateStatus::Overdue);
        assert_eq!(views[0].due_label.as_deref(), Some("Overdue"));

        let stats = task_stats(&tasks, now());
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.urgent, 1);
    }

    #[test]
    fn view_serializes_flat_camel_case() {
        let view = TaskView::new(task("x").build(), &DueDateClassifier::default(), now());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "x");
        assert_eq!(json["dueStatus"], "no-date");
        assert!(json.get("dueLabel").is_none());
        assert!(json["categoryColor"].as_str().unwrap().starts_with("bg-"));
        assert_eq!(json["createdAt"], "2026-10-01T00:00:00Z");
    }

    #[test]
    fn view_carries_priority_colours() {
        let view = TaskView::new(
            task("x").priority(Priority::Urgent).build(),
            &DueDateClassifier::default(),
            now(),
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["priorityColor"]["text"], "text-red-600");
        assert_eq!(json["priorityColor"]["bg"], "bg-red-100");
        assert_eq!(json["priorityColor"]["border"], "border-red-200");
    }
}
