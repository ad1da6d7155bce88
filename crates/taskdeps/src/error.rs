//! Error types for taskdeps operations.

use crate::domain::{DependencyId, TaskId};
use std::io;
use thiserror::Error;

/// Message shown to users when the backing store fails.
///
/// Storage failures never leak their internal details to the caller-facing message.
pub const STORAGE_USER_MESSAGE: &str = "The dependency store is unavailable, please try again";

/// The error type for taskdeps operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A dependency rule was violated. Caller-fixable, never retried.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced task does not exist.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// Referenced dependency edge does not exist.
    #[error("Dependency not found: {0}")]
    DependencyNotFound(DependencyId),

    /// Backing store failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation timed out or was abandoned before completing.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command run outside of an initialized workspace.
    #[error("Not a taskdeps workspace (or any parent directory). Run 'taskdeps init' first")]
    NotInitialized,
}

impl Error {
    /// Message suitable for showing to an end user.
    ///
    /// Validation and not-found errors keep their specific wording so the caller
    /// knows which rule failed. Storage and IO failures collapse to a generic
    /// retry message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Io(_) | Self::Json(_) => STORAGE_USER_MESSAGE.to_string(),
            Self::Cancelled(_) => "The operation timed out, please try again".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether an upstream retry policy may reasonably retry this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Cancelled(_))
    }
}

/// Violations of the dependency edge invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An edge from a task to itself.
    #[error("Task {task_id} cannot depend on itself")]
    SelfDependency {
        /// The offending task
        task_id: TaskId,
    },

    /// An identical edge already exists.
    #[error("Task {task_id} is already blocked by task {dependent_task_id}")]
    Duplicate {
        /// Subject task
        task_id: TaskId,
        /// Referenced task
        dependent_task_id: TaskId,
    },

    /// The edge would close a directed cycle.
    #[error("Adding this dependency would create a circular dependency between task {task_id} and task {dependent_task_id}")]
    Cycle {
        /// Subject task
        task_id: TaskId,
        /// Referenced task
        dependent_task_id: TaskId,
    },
}

impl ValidationError {
    /// Short name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::SelfDependency { .. } => "self-dependency",
            Self::Duplicate { .. } => "duplicate",
            Self::Cycle { .. } => "cycle",
        }
    }
}

/// Backing store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness or referential constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Persisted data could not be interpreted.
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// A record could not be serialized for persistence.
    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// A specialized Result type for taskdeps operations.
pub type Result<T> = std::result::Result<T, Error>;
