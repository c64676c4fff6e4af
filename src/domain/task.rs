//! Task domain model.
//!
//! Besides the [`Task`] entity this module holds the partial-update model:
//! [`TaskPatch`] is built from [`FieldUpdate`] values so that a field the
//! client left out and a field the client explicitly set to `null` stay
//! distinguishable all the way from the request body to the merge.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::project::ProjectId;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a task, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// A timestamp wrapper for `DateTime<Utc>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    #[must_use]
    pub const fn into_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the current time.
    ///
    /// Handlers read the clock once per request and pass the value down, so
    /// `created_at` and `updated_at` of a new task are identical.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.to_rfc3339())
    }
}

// =============================================================================
// Status
// =============================================================================

/// The workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire and storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Returned when a string names none of the [`TaskStatus`] variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status: '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    /// Parses the exact wire representation; matching is case-sensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

// =============================================================================
// Task
// =============================================================================

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub task_id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// Overlays the supplied fields of `patch` onto this task.
    ///
    /// Fields left [`FieldUpdate::Unchanged`] keep their current value.
    /// `updated_at` is always refreshed to `now`, even for an empty patch.
    #[must_use]
    pub fn apply(self, patch: TaskPatch, now: Timestamp) -> Self {
        Self {
            title: patch.title.apply(self.title),
            description: patch.description.apply(self.description),
            status: patch.status.apply(self.status),
            updated_at: now,
            ..self
        }
    }
}

/// Validated data for a task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: Timestamp,
}

// =============================================================================
// Partial Update
// =============================================================================

/// A single field of a partial update: either left alone or set to a value.
///
/// For nullable fields `T` is itself an `Option`, so `Set(None)` means
/// "clear the field" and is not the same as `Unchanged`.
///
/// Deserializing only ever yields `Set`; combine with `#[serde(default)]` so
/// an absent key becomes `Unchanged`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Unchanged,
    Set(T),
}

impl<T> FieldUpdate<T> {
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Returns the new value, or `current` when the field was not supplied.
    pub fn apply(self, current: T) -> T {
        match self {
            Self::Unchanged => current,
            Self::Set(value) => value,
        }
    }
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Set)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    /// Pair with `skip_serializing_if = "FieldUpdate::is_unchanged"`;
    /// an unchanged field that does get serialized is written as `null`.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Unchanged => serializer.serialize_none(),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

/// Validated partial update of a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: FieldUpdate<String>,
    pub description: FieldUpdate<Option<String>>,
    pub status: FieldUpdate<TaskStatus>,
}

impl TaskPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_unchanged() && self.description.is_unchanged() && self.status.is_unchanged()
    }
}

// =============================================================================
// Tests
// =============================================================================
