//! Shared task model and HTTP wire contract for `MyTasks`.

pub mod api;
pub mod codec;
pub mod task;

pub use task::{Priority, Task, TaskId, ValidationError, validate_title};
