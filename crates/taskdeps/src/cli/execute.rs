//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;
use std::path::Path;

use super::args::{DepAction, DepArgs, InitArgs, TaskAction, TaskArgs, TaskRefArgs};
use crate::app::App;
use crate::domain::{DependencyKind, UserId};
use crate::error::Error;
use crate::output::{self, OutputMode};
use crate::storage::TaskStore;

/// Execute the init command
pub async fn execute_init(working_dir: &Path, args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let result = init::init(working_dir).await?;

    if !args.quiet {
        println!("Initialized taskdeps in {}", result.taskdeps_dir.display());
        println!("  Config: {}", result.config_file.display());
        println!("  Graph:  {}", result.graph_file.display());
    }

    Ok(())
}

/// Execute the task command
pub async fn execute_task(app: &App, args: &TaskArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        TaskAction::Add { title } => {
            let task = app.store().create_task(title.clone()).await?;
            app.save().await?;
            tracing::info!(task_id = %task.id, "Created task");
            output::print_task(&task, output_mode)?;
        }
        TaskAction::Status { task_id, status } => {
            let task = app.store().set_status(*task_id, (*status).into()).await?;
            app.save().await?;
            output::print_task(&task, output_mode)?;
        }
        TaskAction::Rm { task_id } => {
            if !app.store().delete_task(*task_id).await? {
                return Err(Error::TaskNotFound(*task_id).into());
            }
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "task_id": task_id,
                    "deleted": true
                }))?,
                OutputMode::Text => {
                    output::print_message(&format!("Deleted task {}", task_id))?
                }
            }
        }
        TaskAction::List => {
            let tasks = app.store().list_tasks().await?;
            output::print_tasks(&tasks, output_mode)?;
        }
    }
    Ok(())
}

/// Execute the dep command
pub async fn execute_dep(app: &App, args: &DepArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        DepAction::Add {
            task_id,
            blocked_by,
            user,
        } => {
            let created_by = DepAction::resolve_user(user.as_deref(), std::env::var("USER").ok());
            let edge = app
                .service()
                .create_dependency(
                    *task_id,
                    *blocked_by,
                    DependencyKind::BlockedBy,
                    UserId::new(created_by),
                )
                .await
                .map_err(user_facing)?;
            app.save().await?;
            output::print_edge(&edge, "Added", output_mode)?;
        }
        DepAction::Rm { edge_id } => {
            let edge = app
                .service()
                .delete_dependency(*edge_id)
                .await
                .map_err(user_facing)?;
            app.save().await?;
            output::print_edge(&edge, "Removed", output_mode)?;
        }
        DepAction::List { task_id } => {
            let views = app
                .service()
                .list_dependencies(*task_id)
                .await
                .map_err(user_facing)?;
            output::print_dependency_views(*task_id, &views, output_mode)?;
        }
    }
    Ok(())
}

/// Execute the ready command
pub async fn execute_ready(app: &App, args: &TaskRefArgs, output_mode: OutputMode) -> Result<()> {
    let readiness = app
        .service()
        .readiness(args.task_id)
        .await
        .map_err(user_facing)?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "task_id": readiness.task_id,
            "can_start": readiness.can_start
        }))?,
        OutputMode::Text => output::print_readiness(&readiness, output_mode)?,
    }
    Ok(())
}

/// Execute the why command
pub async fn execute_why(app: &App, args: &TaskRefArgs, output_mode: OutputMode) -> Result<()> {
    let readiness = app
        .service()
        .readiness(args.task_id)
        .await
        .map_err(user_facing)?;

    match output_mode {
        OutputMode::Json => output::print_json(&readiness.reasons())?,
        OutputMode::Text => output::print_readiness(&readiness, output_mode)?,
    }
    Ok(())
}

/// Execute the show command
pub async fn execute_show(app: &App, args: &TaskRefArgs, output_mode: OutputMode) -> Result<()> {
    let details = app
        .service()
        .get_task_with_dependencies(args.task_id)
        .await
        .map_err(user_facing)?;
    output::print_task_details(&details, output_mode)?;
    Ok(())
}

/// Replace internal storage details with the user-facing message.
fn user_facing(err: Error) -> anyhow::Error {
    if err.is_retryable() {
        tracing::debug!(error = %err, "Engine operation failed");
        anyhow::anyhow!(err.user_message())
    } else {
        err.into()
    }
}
