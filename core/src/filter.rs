//! Pure views over a todo collection: search/status filtering, grouping by
//! status, and the per-status counters shown above the list.
//!
//! Nothing here is cached. Callers re-run these on every render against the
//! current collection.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{Status, Todo};

/// Status half of the filter criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

/// `"all"` or one of the status wire strings.
impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

/// Search text plus status filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Criteria {
    pub search: String,
    pub status: StatusFilter,
}

impl Criteria {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// True when either half narrows the collection.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.status != StatusFilter::All
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.matches_folded(todo, &self.search.to_lowercase())
    }

    /// `matches` with the search text already lowercased.
    fn matches_folded(&self, todo: &Todo, needle: &str) -> bool {
        self.status.matches(todo.status)
            && (needle.is_empty()
                || todo.title.to_lowercase().contains(needle)
                || todo.description.to_lowercase().contains(needle))
    }
}

/// Items of `todos` that satisfy `criteria`, in their original order.
pub fn filter(todos: &[Todo], criteria: &Criteria) -> Vec<Todo> {
    let needle = criteria.search.to_lowercase();
    todos
        .iter()
        .filter(|todo| criteria.matches_folded(todo, &needle))
        .cloned()
        .collect()
}

/// A collection split into one bucket per status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedTodos {
    pub todo: Vec<Todo>,
    pub in_progress: Vec<Todo>,
    pub pending: Vec<Todo>,
    pub completed: Vec<Todo>,
}

impl GroupedTodos {
    pub fn bucket(&self, status: Status) -> &[Todo] {
        match status {
            Status::Todo => &self.todo,
            Status::InProgress => &self.in_progress,
            Status::Pending => &self.pending,
            Status::Completed => &self.completed,
        }
    }

    fn bucket_mut(&mut self, status: Status) -> &mut Vec<Todo> {
        match status {
            Status::Todo => &mut self.todo,
            Status::InProgress => &mut self.in_progress,
            Status::Pending => &mut self.pending,
            Status::Completed => &mut self.completed,
        }
    }
}

pub fn group_by_status(todos: &[Todo]) -> GroupedTodos {
    let mut grouped = GroupedTodos::default();
    for todo in todos {
        grouped.bucket_mut(todo.status).push(todo.clone());
    }
    grouped
}

/// Number of todos per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let mut counts = Self::default();
        for todo in todos {
            match todo.status {
                Status::Todo => counts.todo += 1,
                Status::InProgress => counts.in_progress += 1,
                Status::Pending => counts.pending += 1,
                Status::Completed => counts.completed += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Todo => self.todo,
            Status::InProgress => self.in_progress,
            Status::Pending => self.pending,
            Status::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.pending + self.completed
    }
}
