//! The sync layer: every task operation the client performs.
//!
//! Each operation calls the service first and changes [`AppState`] only
//! after the call succeeds, so a failure never leaves a half-applied edit
//! in the list. After a successful mutation the whole list is written to
//! the cache; a cache write failure is logged and otherwise ignored.

use mytasks_proto::api::{NewTask, UpdateTaskRequest};
use mytasks_proto::codec::decode_snapshot;
use mytasks_proto::{Priority, Task, TaskId, validate_title};

use super::{SyncError, TaskApi, TaskCache};
use crate::state::AppState;

/// Where [`SyncLayer::refresh`] took the task list from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSource {
    /// The service returned a non-empty list.
    Server,
    /// The service failed or had nothing; the cached snapshot was used.
    Cache,
    /// Neither source had anything usable; the list was left as it was.
    Unchanged,
}

/// Coordinates the remote service, the local cache, and [`AppState`].
pub struct SyncLayer<A, C> {
    api: A,
    cache: C,
}

impl<A: TaskApi, C: TaskCache> SyncLayer<A, C> {
    /// Creates a sync layer over `api` and `cache`.
    pub const fn new(api: A, cache: C) -> Self {
        Self { api, cache }
    }

    /// The remote service.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The local cache.
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Reload the task list.
    ///
    /// A non-empty server list replaces `state.tasks` and overwrites the
    /// cache. An empty list or a failed call falls back to the cached
    /// snapshot. With no usable cache the list is left unchanged.
    pub async fn refresh(&self, state: &mut AppState) -> RefreshSource {
        match self.api.list().await {
            Ok(tasks) if !tasks.is_empty() => {
                tracing::debug!(count = tasks.len(), "fetched tasks");
                self.write_cache(&tasks).await;
                state.tasks = tasks;
                return RefreshSource::Server;
            }
            Ok(_) => tracing::debug!("service has no tasks, trying cache"),
            Err(e) => tracing::warn!(op = "list_tasks", error = %e, "fetch failed, trying cache"),
        }

        match self.read_cache().await {
            Some(tasks) => {
                tracing::info!(count = tasks.len(), "loaded tasks from cache");
                state.tasks = tasks;
                RefreshSource::Cache
            }
            None => RefreshSource::Unchanged,
        }
    }

    /// Create a task and append the server's record to the list.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] without contacting the service if
    /// the title is empty, otherwise whatever the service call
    /// failed with.
    pub async fn add(
        &self,
        state: &mut AppState,
        title: &str,
        priority: Priority,
    ) -> Result<Task, SyncError> {
        let new_task = NewTask::new(title, priority)?;
        let task = self
            .api
            .create(&new_task)
            .await
            .inspect_err(|e| tracing::warn!(op = "create_task", error = %e, "create failed"))?;

        tracing::info!(task_id = %task.id, "task created");
        state.tasks.push(task.clone());
        self.write_cache(&state.tasks).await;
        Ok(task)
    }

    /// Delete a task and drop it from the list.
    ///
    /// # Errors
    ///
    /// Returns the service call's failure; the list is unchanged.
    pub async fn remove(&self, state: &mut AppState, id: TaskId) -> Result<(), SyncError> {
        self.api.delete(id).await.inspect_err(|e| {
            tracing::warn!(op = "delete_task", task_id = %id, error = %e, "delete failed");
        })?;

        tracing::info!(task_id = %id, "task deleted");
        state.tasks.retain(|t| t.id != id);
        self.write_cache(&state.tasks).await;
        Ok(())
    }

    /// Flip a task's completion flag; the list entry takes the server's
    /// returned record.
    ///
    /// # Errors
    ///
    /// Returns the service call's failure; the list is unchanged.
    pub async fn toggle(&self, state: &mut AppState, id: TaskId) -> Result<Task, SyncError> {
        let task = self.api.toggle(id).await.inspect_err(|e| {
            tracing::warn!(op = "toggle_task", task_id = %id, error = %e, "toggle failed");
        })?;

        tracing::info!(task_id = %id, completed = task.completed, "task toggled");
        replace(&mut state.tasks, &task);
        self.write_cache(&state.tasks).await;
        Ok(task)
    }

    /// Send `edited` (title, priority, and completion flag) as the new
    /// contents of that task. On success the list entry is replaced with
    /// the server's record. Edit mode is left whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] without contacting the service if
    /// the title is invalid, otherwise the service call's failure.
    pub async fn edit(&self, state: &mut AppState, edited: &Task) -> Result<Task, SyncError> {
        state.editing = None;
        validate_title(&edited.title)?;

        let request = UpdateTaskRequest {
            title: Some(edited.title.clone()),
            completed: Some(edited.completed),
            priority: Some(edited.priority.to_string()),
        };
        let task = self.api.update(edited.id, &request).await.inspect_err(|e| {
            tracing::warn!(op = "update_task", task_id = %edited.id, error = %e, "update failed");
        })?;

        tracing::info!(task_id = %task.id, "task updated");
        replace(&mut state.tasks, &task);
        self.write_cache(&state.tasks).await;
        Ok(task)
    }

    async fn write_cache(&self, tasks: &[Task]) {
        if let Err(e) = self.cache.store(tasks).await {
            tracing::warn!(error = %e, count = tasks.len(), "failed to write task cache");
        }
    }

    async fn read_cache(&self) -> Option<Vec<Task>> {
        let snapshot = match self.cache.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read task cache");
                return None;
            }
        };
        decode_snapshot(&snapshot)
            .inspect_err(|e| tracing::warn!(error = %e, "task cache is unreadable"))
            .ok()
    }
}

fn replace(tasks: &mut [Task], updated: &Task) {
    if let Some(slot) = tasks.iter_mut().find(|t| t.id == updated.id) {
        slot.clone_from(updated);
    }
}
