//! `MyTasks` task service library.
//!
//! Exposes the task store, the HTTP router, and configuration for use in
//! tests and embedding. The binary in `main.rs` wires them together.

pub mod api;
pub mod config;
pub mod error;
pub mod store;
