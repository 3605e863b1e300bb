//! Synchronous task table shared by every store backend.
//!
//! [`TaskTable`] holds the canonical records and applies the lifecycle
//! rules (id assignment, timestamps, validation). Backends wrap it in a lock
//! and decide how to make it durable.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use mytasks_proto::api::{NewTask, TaskPatch};
use mytasks_proto::{Task, TaskId, validate_title};

use crate::error::StoreError;

/// In-memory table of tasks keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TaskTable {
    tasks: HashMap<TaskId, Task>,
    /// Ids of deleted tasks; never handed out again.
    retired: HashSet<TaskId>,
}

impl TaskTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from previously persisted records.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|t| (t.id, t)).collect(),
            retired: HashSet::new(),
        }
    }

    /// Number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the table holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Inserts a new task stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the title is empty.
    pub fn insert(&mut self, new_task: NewTask, now: DateTime<Utc>) -> Result<Task, StoreError> {
        validate_title(&new_task.title)?;

        let mut id = TaskId::new();
        while self.tasks.contains_key(&id) || self.retired.contains(&id) {
            id = TaskId::new();
        }

        let task = Task {
            id,
            title: new_task.title,
            priority: new_task.priority,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    /// All tasks, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by(Task::cmp_newest_first);
        tasks
    }

    /// Looks up a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        self.tasks.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Applies the supplied fields of `patch` and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id, or
    /// [`StoreError::Validation`] for an invalid replacement title. The
    /// task is untouched on error.
    pub fn update(
        &mut self,
        id: TaskId,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Task, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task.updated_at = now;
        Ok(task.clone())
    }

    /// Flips `completed` and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn toggle(&mut self, id: TaskId, now: DateTime<Utc>) -> Result<Task, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        task.completed = !task.completed;
        task.updated_at = now;
        Ok(task.clone())
    }

    /// Permanently removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn remove(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let task = self.tasks.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.retired.insert(id);
        Ok(task)
    }
}
