//! Local snapshot of the last known task list.
//!
//! The cache holds exactly one entry: the JSON-encoded task array stored
//! under [`CACHE_KEY`]. Every write replaces the whole snapshot.

use std::future::Future;
use std::path::{Path, PathBuf};

use mytasks_proto::Task;
use mytasks_proto::codec::{CodecError, encode_snapshot};
use parking_lot::Mutex;

/// Key the task snapshot is stored under.
pub const CACHE_KEY: &str = "tasks";

/// Errors from reading or writing the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing file could not be read or written.
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The task list could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Storage for the task snapshot.
pub trait TaskCache: Send + Sync {
    /// The raw snapshot, or `None` if nothing was ever stored.
    fn load(&self) -> impl Future<Output = Result<Option<String>, CacheError>> + Send;

    /// Replace the snapshot with `tasks`.
    fn store(&self, tasks: &[Task]) -> impl Future<Output = Result<(), CacheError>> + Send;
}

/// A cache kept in a single JSON file, replaced atomically on each write.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// A cache stored at exactly `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A cache stored as `<dir>/tasks.json`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{CACHE_KEY}.json")))
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskCache for FileCache {
    async fn load(&self) -> Result<Option<String>, CacheError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, tasks: &[Task]) -> Result<(), CacheError> {
        let snapshot = encode_snapshot(tasks)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, snapshot).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// An in-process cache, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCache {
    snapshot: Mutex<Option<String>>,
}

impl MemoryCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache pre-seeded with a raw snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot.into())),
        }
    }

    /// The current raw snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.lock().clone()
    }
}

impl TaskCache for MemoryCache {
    async fn load(&self) -> Result<Option<String>, CacheError> {
        Ok(self.snapshot())
    }

    async fn store(&self, tasks: &[Task]) -> Result<(), CacheError> {
        let snapshot = encode_snapshot(tasks)?;
        *self.snapshot.lock() = Some(snapshot);
        Ok(())
    }
}
