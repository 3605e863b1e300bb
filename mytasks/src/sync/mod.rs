//! Offline-tolerant synchronization between the local task list and the
//! task service.
//!
//! The [`SyncLayer`] is the only code that talks to the network or the
//! local cache. It is parameterized over two seams:
//!
//! - [`TaskApi`] -- the remote task service ([`HttpTaskApi`] in production).
//! - [`TaskCache`] -- the local snapshot store ([`FileCache`], [`MemoryCache`]).
//!
//! A successful server call is applied to the in-memory list and then
//! mirrored to the cache. A failed call leaves the list untouched and is
//! reported as a [`SyncError`].

pub mod api;
pub mod cache;
pub mod layer;

pub use api::{HttpTaskApi, TaskApi};
pub use cache::{CACHE_KEY, CacheError, FileCache, MemoryCache, TaskCache};
pub use layer::{RefreshSource, SyncLayer};

use mytasks_proto::ValidationError;

/// Why a sync operation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The input was rejected, locally or by the service (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// The service does not know the task (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// The service could not be reached, timed out, or sent an unreadable
    /// response.
    #[error("network error: {0}")]
    Transport(String),

    /// The service answered with any other non-success status.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// The service's `error` message, or the status reason.
        message: String,
    },
}

impl From<ValidationError> for SyncError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl SyncError {
    /// Whether the failure was caused by connectivity rather than by the
    /// service rejecting the request.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
