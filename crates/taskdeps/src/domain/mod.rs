//! Domain types for the task dependency graph.
//!
//! Tasks are owned by an external task store; this crate only references them
//! by [`TaskId`] and reads their [`TaskStatus`]. The entity owned here is the
//! [`DependencyEdge`].

mod views;

pub use views::{Blocker, DependencyDirection, DependencyView, Readiness, TaskWithDependencies};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Create a new task ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyId(pub u64);

impl DependencyId {
    /// Create a new dependency ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dep-{}", self.0)
    }
}

impl From<u64> for DependencyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identity of the caller that created an edge.
///
/// Supplied by the upstream authentication layer; never validated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the user ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Currently being worked on
    InProgress,

    /// Done; the only status that satisfies a `BlockedBy` edge
    Completed,

    /// Abandoned
    Cancelled,
}

impl TaskStatus {
    /// Whether a task in this status releases the tasks blocked by it.
    pub fn satisfies_blockers(self) -> bool {
        self == Self::Completed
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!(
                "Invalid status '{other}'. Must be one of: pending, in_progress, completed, cancelled"
            )),
        }
    }
}

/// A task as seen by the engine: identity, display title and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier
    pub id: TaskId,

    /// Human-readable title, used in blocking reasons
    pub title: String,

    /// Current status
    pub status: TaskStatus,
}

/// Stored kind of a dependency edge.
///
/// `BlockedBy` is the only stored kind. The "blocks" direction is a read-side
/// projection, see [`DependencyDirection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// The subject task cannot start until the referenced task is completed
    BlockedBy,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockedBy => f.write_str("blocked-by"),
        }
    }
}

/// Directed dependency edge between two tasks.
///
/// For `BlockedBy`, `task_id` depends on `dependent_task_id`: the subject task
/// cannot start until the referenced task completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Edge identifier, assigned by the store
    pub id: DependencyId,

    /// Subject task of the edge
    pub task_id: TaskId,

    /// The other task referenced by the edge
    pub dependent_task_id: TaskId,

    /// Kind of relationship
    pub kind: DependencyKind,

    /// Creation timestamp, set by the store
    pub created_at: DateTime<Utc>,

    /// Identity of the creator
    pub created_by: UserId,
}

/// Data for inserting a new edge. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDependency {
    /// Subject task
    pub task_id: TaskId,

    /// Referenced task
    pub dependent_task_id: TaskId,

    /// Kind of relationship
    pub kind: DependencyKind,

    /// Identity of the creator
    pub created_by: UserId,
}
