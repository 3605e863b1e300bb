//! In-memory [`TaskStore`] backend.

use mytasks_proto::api::{NewTask, TaskPatch};
use mytasks_proto::{Task, TaskId};
use tokio::sync::RwLock;

use super::{Clock, TaskStore, TaskTable, system_clock};
use crate::error::StoreError;

/// Task store that lives for the duration of the process.
///
/// Thread-safe via [`RwLock`]; all writes take the write lock.
pub struct MemoryTaskStore {
    table: RwLock<TaskTable>,
    clock: Clock,
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTaskStore {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    /// Creates an empty store with a custom clock.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            table: RwLock::new(TaskTable::new()),
            clock,
        }
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    /// Whether the store holds no tasks.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }
}

impl TaskStore for MemoryTaskStore {
    async fn create(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let now = (self.clock)();
        self.table.write().await.insert(new_task, now)
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.table.read().await.list())
    }

    async fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        self.table.read().await.get(id)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let now = (self.clock)();
        self.table.write().await.update(id, patch, now)
    }

    async fn toggle_completed(&self, id: TaskId) -> Result<Task, StoreError> {
        let now = (self.clock)();
        self.table.write().await.toggle(id, now)
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.table.write().await.remove(id).map(|_| ())
    }
}
