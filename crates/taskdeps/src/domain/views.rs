//! Read models returned to collaborators.
//!
//! These are plain serializable records with no behavior beyond formatting,
//! meant to be mapped by an outer layer into its own wire format.

use super::{DependencyEdge, DependencyId, TaskId, TaskRecord, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an edge relative to the task being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyDirection {
    /// The viewed task waits on the other task
    BlockedBy,

    /// The other task waits on the viewed task (reverse lookup of a `BlockedBy` edge)
    Blocks,
}

impl fmt::Display for DependencyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockedBy => f.write_str("blocked by"),
            Self::Blocks => f.write_str("blocks"),
        }
    }
}

/// One edge rendered from the point of view of a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyView {
    /// Underlying edge
    pub edge_id: DependencyId,

    /// How the edge relates to the viewed task
    pub direction: DependencyDirection,

    /// The task on the other end of the edge
    pub other_task_id: TaskId,

    /// Title of the other task, `None` if it no longer exists
    pub other_task_title: Option<String>,

    /// Status of the other task, `None` if it no longer exists
    pub other_task_status: Option<TaskStatus>,

    /// When the edge was created
    pub created_at: DateTime<Utc>,

    /// Who created the edge
    pub created_by: UserId,
}

impl DependencyView {
    /// Render `edge` as seen from `viewed`, attaching the other task if known.
    ///
    /// An edge where `viewed` is the subject renders as `BlockedBy`; otherwise
    /// it renders as `Blocks`.
    pub fn from_edge(edge: &DependencyEdge, viewed: TaskId, other: Option<&TaskRecord>) -> Self {
        let (direction, other_task_id) = if edge.task_id == viewed {
            (DependencyDirection::BlockedBy, edge.dependent_task_id)
        } else {
            (DependencyDirection::Blocks, edge.task_id)
        };

        Self {
            edge_id: edge.id,
            direction,
            other_task_id,
            other_task_title: other.map(|t| t.title.clone()),
            other_task_status: other.map(|t| t.status),
            created_at: edge.created_at,
            created_by: edge.created_by.clone(),
        }
    }

    /// Whether the viewed task waits on the other end of this edge.
    pub fn is_blocked_by(&self) -> bool {
        self.direction == DependencyDirection::BlockedBy
    }
}

/// A predecessor that currently prevents a task from starting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    /// The `BlockedBy` edge responsible
    pub edge_id: DependencyId,

    /// The blocking task
    pub task_id: TaskId,

    /// Title of the blocking task
    pub title: String,

    /// Current status of the blocking task
    pub status: TaskStatus,
}

impl Blocker {
    /// Human-readable explanation of why this blocker holds.
    pub fn reason(&self) -> String {
        format!(
            "Blocked by task {} \"{}\" (status: {})",
            self.task_id, self.title, self.status
        )
    }
}

/// Outcome of a readiness evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    /// Task that was evaluated
    pub task_id: TaskId,

    /// Whether every `BlockedBy` predecessor is completed
    pub can_start: bool,

    /// Unsatisfied predecessors, in edge creation order
    pub blockers: Vec<Blocker>,
}

impl Readiness {
    /// Blocking reasons in edge creation order. Empty iff `can_start`.
    pub fn reasons(&self) -> Vec<String> {
        self.blockers.iter().map(Blocker::reason).collect()
    }
}

/// A task with its full dependency context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithDependencies {
    /// The task itself
    pub task: TaskRecord,

    /// Predecessors this task waits on
    pub blocked_by: Vec<DependencyView>,

    /// Successors waiting on this task
    pub blocks: Vec<DependencyView>,

    /// Whether the task can start now
    pub can_start: bool,

    /// Why the task cannot start, empty when it can
    pub blocking_reasons: Vec<String>,
}
