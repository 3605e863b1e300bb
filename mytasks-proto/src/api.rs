//! HTTP wire contract shared by the task service and its clients.
//!
//! Request DTOs keep every field optional so that shape problems (a missing
//! title, an unknown priority) surface as [`ValidationError`]s with a
//! useful message instead of a generic deserialization failure.

use serde::{Deserialize, Serialize};

use crate::task::{Priority, TaskId, ValidationError, validate_title};

/// Base path every task route is nested under.
pub const BASE_PATH: &str = "/tasks";
/// `GET`: list all tasks, newest first.
pub const ALL_TASKS: &str = "/allTasks";
/// `POST`: create a task.
pub const CREATE_TASK: &str = "/createTask";
/// `PATCH`: update fields of a task.
pub const UPDATE_TASK: &str = "/updateTask";
/// `PUT`: flip a task's completion flag.
pub const TOGGLE_TASK: &str = "/toggle";
/// `DELETE`: remove a task permanently.
pub const DELETE_TASK: &str = "/deleteTasks";

/// Body returned by a successful delete.
pub const DELETED_MESSAGE: &str = "Task deleted successfully";
/// Error message returned for an unknown task id.
pub const NOT_FOUND_MESSAGE: &str = "Task not found";

/// Builds the relative path `<route>/<id>` for an id-scoped endpoint.
#[must_use]
pub fn id_path(route: &str, id: &TaskId) -> String {
    format!("{route}/{id}")
}

/// `POST /createTask` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Required, non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Required, one of `High | Medium | Low`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Validated title.
    pub title: String,
    /// Validated priority.
    pub priority: Priority,
}

impl NewTask {
    /// Validates a title and pairs it with a priority.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is empty.
    pub fn new(title: impl Into<String>, priority: Priority) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self { title, priority })
    }
}

impl CreateTaskRequest {
    /// Builds a fully populated request from typed values.
    #[must_use]
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: Some(title.into()),
            priority: Some(priority.to_string()),
        }
    }

    /// Validates the request into a [`NewTask`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when `title` or `priority`
    /// is absent, otherwise the title or priority validation error.
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        let title = self.title.ok_or(ValidationError::MissingField("title"))?;
        let priority = self
            .priority
            .ok_or(ValidationError::MissingField("priority"))?;
        NewTask::new(title, priority.parse::<Priority>()?)
    }
}

/// `PATCH /updateTask/:id` request body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// New priority, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Validated replacement title.
    pub title: Option<String>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
    /// Replacement priority.
    pub priority: Option<Priority>,
}

impl UpdateTaskRequest {
    /// Validates every supplied field.
    ///
    /// # Errors
    ///
    /// Returns the title or priority validation error of the first invalid
    /// supplied field.
    pub fn validate(self) -> Result<TaskPatch, ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        let priority = self
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?;
        Ok(TaskPatch {
            title: self.title,
            completed: self.completed,
            priority,
        })
    }
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message, never internal details.
    pub error: String,
}

impl ErrorBody {
    /// Wraps a message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// JSON acknowledgement body: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable message.
    pub message: String,
}
