//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Parser, Subcommand};

use super::types::TaskStatusArg;
use super::validators::{validate_edge_id, validate_task_id, validate_title, validate_user};
use crate::domain::{DependencyId, TaskId};

/// Default creator recorded on edges when `--user` and `$USER` are absent
pub const DEFAULT_USER: &str = "cli";

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone, Default)]
pub struct InitArgs {
    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `task` command
#[derive(Parser, Debug, Clone)]
pub struct TaskArgs {
    /// Task subcommand
    #[command(subcommand)]
    pub action: TaskAction,
}

/// Task management actions
#[derive(Subcommand, Debug, Clone)]
pub enum TaskAction {
    /// Create a task in pending status
    Add {
        /// Task title (maximum 200 characters)
        #[arg(value_parser = validate_title)]
        title: String,
    },

    /// Change a task's status
    Status {
        /// Task ID
        #[arg(value_parser = validate_task_id)]
        task_id: TaskId,

        /// New status
        #[arg(value_enum)]
        status: TaskStatusArg,
    },

    /// Delete a task and every dependency touching it
    #[command(alias = "remove")]
    Rm {
        /// Task ID
        #[arg(value_parser = validate_task_id)]
        task_id: TaskId,
    },

    /// List all tasks
    #[command(alias = "ls")]
    List,
}

/// Arguments for the `dep` command
#[derive(Parser, Debug, Clone)]
pub struct DepArgs {
    /// Dependency subcommand
    #[command(subcommand)]
    pub action: DepAction,
}

/// Dependency management actions
#[derive(Subcommand, Debug, Clone)]
pub enum DepAction {
    /// Record that a task is blocked by another
    Add {
        /// Task that waits
        #[arg(value_parser = validate_task_id)]
        task_id: TaskId,

        /// Task it waits on
        #[arg(value_parser = validate_task_id)]
        blocked_by: TaskId,

        /// Name recorded as the edge's creator (defaults to $USER)
        #[arg(short, long, value_parser = validate_user)]
        user: Option<String>,
    },

    /// Remove a dependency by edge ID
    #[command(alias = "remove")]
    Rm {
        /// Edge ID (e.g., dep-3 or 3)
        #[arg(value_parser = validate_edge_id)]
        edge_id: DependencyId,
    },

    /// List every dependency touching a task
    #[command(alias = "ls")]
    List {
        /// Task ID
        #[arg(value_parser = validate_task_id)]
        task_id: TaskId,
    },
}

impl DepAction {
    /// Resolve the creator for `dep add`: `--user`, then `$USER`, then [`DEFAULT_USER`].
    pub fn resolve_user(user: Option<&str>, env_user: Option<String>) -> String {
        user.map(str::to_string)
            .or_else(|| env_user.and_then(|u| validate_user(&u).ok()))
            .unwrap_or_else(|| DEFAULT_USER.to_string())
    }
}

/// Arguments for commands that take a single task
#[derive(Parser, Debug, Clone)]
pub struct TaskRefArgs {
    /// Task ID
    #[arg(value_parser = validate_task_id)]
    pub task_id: TaskId,
}
