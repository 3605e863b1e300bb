//! Client-side application state.
//!
//! [`AppState`] owns the canonical task list plus the user's view choices.
//! The sync layer mutates it; presentation reads [`AppState::visible_tasks`].

use std::str::FromStr;

use mytasks_proto::{Priority, Task, TaskId, ValidationError};

/// Which priorities the task view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    /// Every task.
    #[default]
    All,
    /// Only tasks of one priority.
    Only(Priority),
}

impl PriorityFilter {
    /// Whether `task` passes the filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => task.priority == priority,
        }
    }
}

impl std::fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(priority) => write!(f, "{priority}"),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// The task list and how it is being viewed.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Canonical task list, in the order last received or appended.
    pub tasks: Vec<Task>,
    /// Task currently open for editing.
    pub editing: Option<TaskId>,
    /// Active priority filter.
    pub filter: PriorityFilter,
    /// Sort the view by priority weight, highest first.
    pub sort_by_priority: bool,
}

impl AppState {
    /// Empty state with the default view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a task by id.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The filtered, optionally priority-sorted view of `tasks`.
    ///
    /// The sort is stable, so tasks of equal priority keep their list order.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let mut visible: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect();
        if self.sort_by_priority {
            visible.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()));
        }
        visible
    }

    /// Mark `id` as being edited. Returns `false` (and changes nothing) if
    /// no such task is in the list.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.editing = Some(id);
        true
    }

    /// Leave edit mode without sending anything.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// The task currently being edited, if it is still in the list.
    #[must_use]
    pub fn editing_task(&self) -> Option<&Task> {
        self.editing.and_then(|id| self.find(id))
    }
}
