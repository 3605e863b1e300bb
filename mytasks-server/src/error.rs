//! Error types for the task store and the HTTP layer.
//!
//! [`StoreError`] is what store backends return. [`ApiError`] is the only
//! failure type a handler can produce; its [`IntoResponse`] impl turns every
//! path into an explicit status code and an `{"error": ...}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mytasks_proto::api::{ErrorBody, NOT_FOUND_MESSAGE};
use mytasks_proto::{TaskId, ValidationError};

/// Errors produced by a [`crate::store::TaskStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input violated a task invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No task with this id exists.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The persistence layer failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<mytasks_proto::codec::CodecError> for StoreError {
    fn from(e: mytasks_proto::codec::CodecError) -> Self {
        Self::Storage(e.to_string())
    }
}

/// The store operation an HTTP request maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /allTasks`
    List,
    /// `POST /createTask`
    Create,
    /// `PATCH /updateTask/:id`
    Update,
    /// `PUT /toggle/:id`
    Toggle,
    /// `DELETE /deleteTasks/:id`
    Delete,
}

impl Operation {
    /// Operation name used in log records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "list_tasks",
            Self::Create => "create_task",
            Self::Update => "update_task",
            Self::Toggle => "toggle_task",
            Self::Delete => "delete_task",
        }
    }

    /// Generic message sent to clients when storage fails.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch tasks",
            Self::Create => "Failed to create task",
            Self::Update => "Failed to update task",
            Self::Toggle => "Failed to update complete/incomplete task",
            Self::Delete => "Failed to delete task",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of an HTTP request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or invalid request payload.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The referenced task does not exist (or the id is not a task id).
    #[error("Task not found")]
    NotFound,

    /// Infrastructure failure while running the operation.
    #[error("{} failed", .0.name())]
    Storage(Operation),
}

impl ApiError {
    /// Maps a store error for the given operation.
    #[must_use]
    pub fn from_store(op: Operation, err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Storage(_) => Self::Storage(op),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Storage failures only ever expose the per-operation message.
        let message = match &self {
            Self::Storage(op) => op.failure_message().to_string(),
            Self::NotFound => NOT_FOUND_MESSAGE.to_string(),
            Self::Validation(e) => e.to_string(),
        };
        (self.status_code(), Json(ErrorBody::new(message))).into_response()
    }
}
