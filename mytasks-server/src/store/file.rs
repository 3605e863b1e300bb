//! File-backed [`TaskStore`] backend.
//!
//! The whole task list is kept in memory and mirrored to a single JSON
//! snapshot. Every mutation is applied to a copy of the table, the copy is
//! written to `<path>.tmp` and renamed over `<path>`, and only then does the
//! copy replace the live table. A failed write therefore leaves both the
//! file and the in-memory state as they were.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mytasks_proto::api::{NewTask, TaskPatch};
use mytasks_proto::codec::{decode_snapshot, encode_snapshot};
use mytasks_proto::{Task, TaskId};
use tokio::sync::RwLock;

use super::{Clock, TaskStore, TaskTable, system_clock};
use crate::error::StoreError;

/// Task store persisted as a JSON snapshot file.
pub struct FileTaskStore {
    path: PathBuf,
    table: RwLock<TaskTable>,
    clock: Clock,
}

impl FileTaskStore {
    /// Opens (or lazily creates) the store at `path` using the system clock.
    ///
    /// A missing file is an empty store; the file is first written on the
    /// first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the file exists but cannot be read
    /// or does not contain a valid snapshot.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_clock(path, system_clock()).await
    }

    /// Opens the store at `path` with a custom clock.
    ///
    /// # Errors
    ///
    /// See [`FileTaskStore::open`].
    pub async fn open_with_clock(
        path: impl Into<PathBuf>,
        clock: Clock,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => decode_snapshot(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(path = %path.display(), count = tasks.len(), "opened task store");

        Ok(Self {
            path,
            table: RwLock::new(TaskTable::from_tasks(tasks)),
            clock,
        })
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `op` against a copy of the table, persists the copy, then swaps
    /// it in. The write lock is held throughout so mutations serialize.
    async fn mutate<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut TaskTable, DateTime<Utc>) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut live = self.table.write().await;
        let mut next = live.clone();
        let out = op(&mut next, (self.clock)())?;
        self.persist(&next).await?;
        *live = next;
        Ok(out)
    }

    async fn persist(&self, table: &TaskTable) -> Result<(), StoreError> {
        let snapshot = encode_snapshot(&table.list())?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, snapshot).await?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "snapshot rename failed");
            StoreError::from(e)
        })
    }
}

impl TaskStore for FileTaskStore {
    async fn create(&self, new_task: NewTask) -> Result<Task, StoreError> {
        self.mutate(move |table, now| table.insert(new_task, now))
            .await
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.table.read().await.list())
    }

    async fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        self.table.read().await.get(id)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        self.mutate(move |table, now| table.update(id, patch, now))
            .await
    }

    async fn toggle_completed(&self, id: TaskId) -> Result<Task, StoreError> {
        self.mutate(move |table, now| table.toggle(id, now)).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.mutate(move |table, _| table.remove(id).map(|_| ()))
            .await
    }
}
