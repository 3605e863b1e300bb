//! `MyTasks` client library.
//!
//! Offline-tolerant access to the task service: [`sync::SyncLayer`] keeps an
//! [`state::AppState`] in step with the service and falls back to a local
//! snapshot when the service cannot be reached.

pub mod config;
pub mod state;
pub mod sync;
