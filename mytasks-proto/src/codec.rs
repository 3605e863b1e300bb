//! JSON snapshot codec for whole task lists.
//!
//! A snapshot is the serialized form of an entire task list. The client
//! cache and the file-backed store both persist exactly one snapshot and
//! always overwrite it in full.

use crate::task::Task;

/// Error type for snapshot encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Encodes a task list into a JSON snapshot.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the list cannot be serialized.
pub fn encode_snapshot(tasks: &[Task]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Decodes a JSON snapshot back into a task list.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the text is not a valid snapshot.
pub fn decode_snapshot(snapshot: &str) -> Result<Vec<Task>, CodecError> {
    Ok(serde_json::from_str(snapshot)?)
}
