//! Remote task service client.
//!
//! [`TaskApi`] is the seam the sync layer calls through; [`HttpTaskApi`]
//! implements it with `reqwest` against the `/tasks` endpoints.

use std::future::Future;
use std::time::Duration;

use mytasks_proto::api::{
    ALL_TASKS, CREATE_TASK, CreateTaskRequest, DELETE_TASK, ErrorBody, MessageBody, NewTask,
    TOGGLE_TASK, UPDATE_TASK, UpdateTaskRequest, id_path,
};
use mytasks_proto::{Task, TaskId};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::SyncError;

/// Operations the task service offers to the client.
pub trait TaskApi: Send + Sync {
    /// Fetch every task, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Task>, SyncError>> + Send;

    /// Create a task and return the server's record.
    fn create(&self, new_task: &NewTask) -> impl Future<Output = Result<Task, SyncError>> + Send;

    /// Apply a partial update and return the server's record.
    fn update(
        &self,
        id: TaskId,
        request: &UpdateTaskRequest,
    ) -> impl Future<Output = Result<Task, SyncError>> + Send;

    /// Flip the completion flag and return the server's record.
    fn toggle(&self, id: TaskId) -> impl Future<Output = Result<Task, SyncError>> + Send;

    /// Permanently delete a task.
    fn delete(&self, id: TaskId) -> impl Future<Output = Result<(), SyncError>> + Send;
}

/// [`TaskApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    /// Creates a client for the service rooted at `base_url`
    /// (e.g. `http://127.0.0.1:5000/tasks`). Every request is bounded by
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The service root every endpoint path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends `request` and decodes a success body as `T`, or the `{error}`
    /// body of a failure into the matching [`SyncError`].
    async fn send<T: DeserializeOwned + Send>(
        &self,
        op: &'static str,
        request: RequestBuilder,
    ) -> Result<T, SyncError> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(op, error = %e, "request failed");
            SyncError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| SyncError::Transport(format!("invalid response body: {e}")));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        tracing::debug!(op, status = status.as_u16(), %message, "request rejected");
        Err(error_for_status(status, message))
    }
}

impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, SyncError> {
        self.send("list_tasks", self.client.get(self.url(ALL_TASKS)))
            .await
    }

    async fn create(&self, new_task: &NewTask) -> Result<Task, SyncError> {
        let body = CreateTaskRequest::new(new_task.title.clone(), new_task.priority);
        self.send(
            "create_task",
            self.client.post(self.url(CREATE_TASK)).json(&body),
        )
        .await
    }

    async fn update(&self, id: TaskId, request: &UpdateTaskRequest) -> Result<Task, SyncError> {
        self.send(
            "update_task",
            self.client
                .patch(self.url(&id_path(UPDATE_TASK, &id)))
                .json(request),
        )
        .await
    }

    async fn toggle(&self, id: TaskId) -> Result<Task, SyncError> {
        self.send(
            "toggle_task",
            self.client.put(self.url(&id_path(TOGGLE_TASK, &id))),
        )
        .await
    }

    async fn delete(&self, id: TaskId) -> Result<(), SyncError> {
        let _: MessageBody = self
            .send(
                "delete_task",
                self.client.delete(self.url(&id_path(DELETE_TASK, &id))),
            )
            .await?;
        Ok(())
    }
}

fn error_for_status(status: StatusCode, message: String) -> SyncError {
    match status {
        StatusCode::BAD_REQUEST => SyncError::Validation(message),
        StatusCode::NOT_FOUND => SyncError::NotFound(message),
        _ => SyncError::Server {
            status: status.as_u16(),
            message,
        },
    }
}
