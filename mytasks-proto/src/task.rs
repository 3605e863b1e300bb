//! Task model for `MyTasks`.
//!
//! A [`Task`] is the only persisted entity. Identifiers are UUID v7 so they
//! are time-ordered and never collide; priorities carry an explicit total
//! order instead of relying on string comparison.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors raised when task input does not satisfy the model's invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A field required on creation was absent.
    #[error("Title and priority are required ({0} missing).")]
    MissingField(&'static str),
    /// Title is empty or whitespace-only.
    #[error("Title must be at least 1 character long.")]
    EmptyTitle,
    /// Priority is not one of `High`, `Medium`, `Low`.
    #[error("Invalid priority '{0}': expected High, Medium or Low.")]
    InvalidPriority(String),
    /// Request body could not be parsed at all.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Task priority.
///
/// Variants are declared lowest first so the derived `Ord` gives
/// `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Least urgent.
    Low,
    /// Default for new tasks entered by a user.
    Medium,
    /// Most urgent.
    High,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Sorting weight: `High = 3`, `Medium = 2`, `Low = 1`.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// The exact wire spelling of this priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(ValidationError::InvalidPriority(other.to_string())),
        }
    }
}

/// A persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier, immutable after creation.
    pub id: TaskId,
    /// Never empty or whitespace-only.
    pub title: String,
    /// Task urgency.
    pub priority: Priority,
    /// Completion flag, `false` at creation.
    pub completed: bool,
    /// Set once by the store at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every update or toggle.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Orders tasks newest first, breaking timestamp ties by id (also newest
    /// first, since ids are UUID v7).
    #[must_use]
    pub fn cmp_newest_first(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Checks that a title has at least one non-whitespace character.
///
/// The title is not rewritten; surrounding whitespace is preserved.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTitle`].
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}
