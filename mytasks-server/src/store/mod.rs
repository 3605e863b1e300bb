//! Durable task storage.
//!
//! [`TaskStore`] is the contract the HTTP layer depends on. Two backends
//! implement it:
//! - [`MemoryTaskStore`] -- process-lifetime storage, used in tests and for
//!   throwaway instances.
//! - [`FileTaskStore`] -- a JSON snapshot on disk, rewritten atomically after
//!   every mutation.
//!
//! Both share the lifecycle rules in [`TaskTable`] and take timestamps from
//! an injectable [`Clock`].

pub mod file;
pub mod memory;
pub mod table;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mytasks_proto::api::{NewTask, TaskPatch};
use mytasks_proto::{Task, TaskId};

pub use file::FileTaskStore;
pub use memory::MemoryTaskStore;
pub use table::TaskTable;

use crate::error::StoreError;

/// Source of "now" for `createdAt`/`updatedAt`.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The wall clock.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Persistent owner of task records.
///
/// Implementations serialize writes so that a single record's fields are
/// never torn by concurrent requests.
pub trait TaskStore: Send + Sync {
    /// Creates a task with a fresh id, `completed = false`, and both
    /// timestamps set to now.
    fn create(&self, new_task: NewTask) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// All tasks ordered by `createdAt` descending.
    fn list(&self) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// A single task by id.
    fn get(&self, id: TaskId) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Applies the supplied fields and refreshes `updatedAt`.
    fn update(
        &self,
        id: TaskId,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Flips `completed`, refreshes `updatedAt`, and returns the full record.
    fn toggle_completed(&self, id: TaskId)
    -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Permanently removes a task.
    fn delete(&self, id: TaskId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Storage selected by a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// `memory` or `memory://`
    Memory,
    /// `file://<path>` or a bare filesystem path.
    File(PathBuf),
}

impl StorageBackend {
    /// Parses a storage connection string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] for an empty string or an
    /// unsupported scheme.
    pub fn parse(conn: &str) -> Result<Self, StoreError> {
        let conn = conn.trim();
        if conn.is_empty() {
            return Err(StoreError::Storage("empty storage connection string".into()));
        }
        if conn == "memory" || conn == "memory://" {
            return Ok(Self::Memory);
        }
        if let Some(path) = conn.strip_prefix("file://") {
            if path.is_empty() {
                return Err(StoreError::Storage("file:// storage needs a path".into()));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = conn.split_once("://") {
            return Err(StoreError::Storage(format!(
                "unsupported storage scheme: {scheme}"
            )));
        }
        Ok(Self::File(PathBuf::from(conn)))
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}
