//! Predicate filtering over task collections.

use crate::types::{Category, Priority, Task, TaskStatus};
use std::str::FromStr;

/// One filter field: everything, one value, or a value nothing can match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
    /// A value that names no known variant. Matches no task.
    Unrecognized(String),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T: FromStr> Selector<T> {
    /// `None`, empty and `"all"` select everything.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Selector::All,
            Some(s) if s.eq_ignore_ascii_case("all") => Selector::All,
            Some(s) => match s.parse() {
                Ok(value) => Selector::Only(value),
                Err(_) => Selector::Unrecognized(s.to_string()),
            },
        }
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
            Selector::Unrecognized(_) => false,
        }
    }
}

/// Criteria combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Selector<Category>,
    pub priority: Selector<Priority>,
    pub status: Selector<TaskStatus>,
    /// Case-insensitive substring of title or description. Empty matches all.
    pub search: String,
}

impl FilterCriteria {
    /// Build criteria from raw request values.
    pub fn from_params(
        category: Option<&str>,
        priority: Option<&str>,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        Self {
            category: Selector::parse(category),
            priority: Selector::parse(priority),
            status: Selector::parse(status),
            search: search.unwrap_or_default().to_string(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Selector::Only(category);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Selector::Only(priority);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Selector::Only(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// True when every field selects everything.
    pub fn is_unrestricted(&self) -> bool {
        *self == FilterCriteria::default()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.category.matches(&task.category)
            && self.priority.matches(&task.priority)
            && self.status.matches(&task.status())
            && matches_search(task, &self.search)
    }
}

fn matches_search(task: &Task, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

/// Tasks passing every criterion, in their original order.
pub fn filter_tasks(tasks: &[Task], criteria: &FilterCriteria) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| criteria.matches(task))
        .cloned()
        .collect()
}
