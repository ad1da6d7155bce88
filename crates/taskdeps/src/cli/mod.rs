//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for taskdeps using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `init`: Initialize a new taskdeps workspace
//! - `task add|status|rm|list`: Manage the tasks edges refer to
//! - `dep add|rm|list`: Create, delete and list dependency edges
//! - `ready`: Whether a task can start
//! - `why`: Why a task cannot start
//! - `show`: A task with its full dependency context
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! taskdeps task add "Design schema"
//! taskdeps task add "Build API"
//! taskdeps dep add 2 1 --user alice
//! taskdeps why 2
//! taskdeps task status 1 completed
//! taskdeps ready 2
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

// Re-export argument structs
pub use args::{DepAction, DepArgs, InitArgs, TaskAction, TaskArgs, TaskRefArgs, DEFAULT_USER};

// Re-export types
pub use types::TaskStatusArg;

// Re-export validators for external use
pub use validators::{validate_edge_id, validate_task_id, validate_title, validate_user};

/// Taskdeps - dependency tracking between tasks
///
/// Record which tasks block which, reject circular dependencies, and ask
/// whether a task is ready to start. State lives in `.taskdeps/graph.jsonl`.
#[derive(Parser, Debug)]
#[command(name = "taskdeps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new taskdeps workspace
    ///
    /// Creates the `.taskdeps/` directory with configuration and an empty graph.
    Init(InitArgs),

    /// Manage tasks
    Task(TaskArgs),

    /// Manage dependencies between tasks
    ///
    /// Edges are validated: self-dependencies, duplicates and edges that
    /// would create a cycle are rejected.
    Dep(DepArgs),

    /// Check whether a task can start
    ///
    /// A task can start once every task it is blocked by is completed.
    Ready(TaskRefArgs),

    /// Explain why a task cannot start
    Why(TaskRefArgs),

    /// Show a task with its dependencies and readiness
    Show(TaskRefArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command in the current directory
    pub async fn execute(&self) -> Result<()> {
        let current_dir = std::env::current_dir()?;
        self.execute_in(&current_dir).await
    }

    /// Execute the CLI command against the workspace containing `working_dir`
    pub async fn execute_in(&self, working_dir: &std::path::Path) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = OutputMode::from_json_flag(self.json);

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(working_dir, args).await,
            Some(Commands::Task(args)) => {
                let app = App::from_directory(working_dir).await?;
                execute::execute_task(&app, args, output_mode).await
            }
            Some(Commands::Dep(args)) => {
                let app = App::from_directory(working_dir).await?;
                execute::execute_dep(&app, args, output_mode).await
            }
            Some(Commands::Ready(args)) => {
                let app = App::from_directory(working_dir).await?;
                execute::execute_ready(&app, args, output_mode).await
            }
            Some(Commands::Why(args)) => {
                let app = App::from_directory(working_dir).await?;
                execute::execute_why(&app, args, output_mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(working_dir).await?;
                execute::execute_show(&app, args, output_mode).await
            }
            None => {
                println!("Taskdeps dependency tracker");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyId, TaskId};

    // ========== CLI Parsing Tests ==========

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["taskdeps"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_global_json_flag() {
        let cli = Cli::try_parse_from(["taskdeps", "task", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Some(Commands::Task(TaskArgs {
                action: TaskAction::List
            }))
        ));
    }

    #[test]
    fn test_parse_init_quiet() {
        let cli = Cli::try_parse_from(["taskdeps", "init", "-q"]).unwrap();
        match cli.command {
            Some(Commands::Init(args)) => assert!(args.quiet),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_parse_task_add() {
        let cli = Cli::try_parse_from(["taskdeps", "task", "add", "  Write docs "]).unwrap();
        match cli.command {
            Some(Commands::Task(TaskArgs {
                action: TaskAction::Add { title },
            })) => assert_eq!(title, "Write docs"),
            _ => panic!("Expected task add"),
        }
    }

    #[test]
    fn test_parse_task_status() {
        let cli = Cli::try_parse_from(["taskdeps", "task", "status", "#4", "done"]).unwrap();
        match cli.command {
            Some(Commands::Task(TaskArgs {
                action: TaskAction::Status { task_id, status },
            })) => {
                assert_eq!(task_id, TaskId(4));
                assert_eq!(status, TaskStatusArg::Completed);
            }
            _ => panic!("Expected task status"),
        }
    }

    #[test]
    fn test_parse_task_status_invalid() {
        let result = Cli::try_parse_from(["taskdeps", "task", "status", "4", "blocked"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_dep_add() {
        let cli =
            Cli::try_parse_from(["taskdeps", "dep", "add", "2", "1", "--user", "alice"]).unwrap();
        match cli.command {
            Some(Commands::Dep(DepArgs {
                action:
                    DepAction::Add {
                        task_id,
                        blocked_by,
                        user,
                    },
            })) => {
                assert_eq!(task_id, TaskId(2));
                assert_eq!(blocked_by, TaskId(1));
                assert_eq!(user.as_deref(), Some("alice"));
            }
            _ => panic!("Expected dep add"),
        }
    }

    #[test]
    fn test_parse_dep_rm_accepts_display_form() {
        let cli = Cli::try_parse_from(["taskdeps", "dep", "rm", "dep-7"]).unwrap();
        match cli.command {
            Some(Commands::Dep(DepArgs {
                action: DepAction::Rm { edge_id },
            })) => assert_eq!(edge_id, DependencyId(7)),
            _ => panic!("Expected dep rm"),
        }
    }

    #[test]
    fn test_parse_dep_list_alias() {
        let cli = Cli::try_parse_from(["taskdeps", "dep", "ls", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Dep(DepArgs {
                action: DepAction::List { task_id: TaskId(3) }
            }))
        ));
    }

    #[test]
    fn test_parse_ready_why_show() {
        for name in ["ready", "why", "show"] {
            let cli = Cli::try_parse_from(["taskdeps", name, "5"]).unwrap();
            let args = match cli.command {
                Some(Commands::Ready(args) | Commands::Why(args) | Commands::Show(args)) => args,
                _ => panic!("Expected {name}"),
            };
            assert_eq!(args.task_id, TaskId(5));
        }
    }

    #[test]
    fn test_parse_rejects_bad_task_id() {
        assert!(Cli::try_parse_from(["taskdeps", "ready", "abc"]).is_err());
        assert!(Cli::try_parse_from(["taskdeps", "ready", "0"]).is_err());
    }

    #[test]
    fn test_resolve_user() {
        assert_eq!(DepAction::resolve_user(Some("bob"), Some("env".into())), "bob");
        assert_eq!(DepAction::resolve_user(None, Some("env".into())), "env");
        assert_eq!(DepAction::resolve_user(None, None), DEFAULT_USER);
        assert_eq!(DepAction::resolve_user(None, Some(" ".into())), DEFAULT_USER);
    }
}
