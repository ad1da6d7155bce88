//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub mod color;

use crate::domain::{
    DependencyEdge, DependencyView, Readiness, TaskId, TaskRecord, TaskWithDependencies,
};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success};

use color::{bold, colored_status_icon, colorize_id, colorize_status, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

/// Configuration for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig from the process environment.
    ///
    /// Reads:
    /// - `TASKDEPS_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `TASKDEPS_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create an OutputConfig from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let use_ascii = match lookup("TASKDEPS_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "TASKDEPS_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("TASKDEPS_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

impl OutputMode {
    /// Pick the mode from the global `--json` flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a single task
pub fn print_task(task: &TaskRecord, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_task_text(&mut io::stdout().lock(), task, &config)
        }
        OutputMode::Json => print_json(task),
    }
}

/// Print a list of tasks
pub fn print_tasks(tasks: &[TaskRecord], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_tasks_text(&mut io::stdout().lock(), tasks, &config)
        }
        OutputMode::Json => print_json(&tasks),
    }
}

/// Print a newly created or removed edge
pub fn print_edge(edge: &DependencyEdge, verb: &str, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_edge_text(&mut io::stdout().lock(), edge, verb, &config)
        }
        OutputMode::Json => print_json(edge),
    }
}

/// Print the edges touching a task
pub fn print_dependency_views(
    task_id: TaskId,
    views: &[DependencyView],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_dependency_views_text(&mut io::stdout().lock(), task_id, views, &config)
        }
        OutputMode::Json => print_json(&views),
    }
}

/// Print a readiness verdict with its blockers
pub fn print_readiness(readiness: &Readiness, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_readiness_text(&mut io::stdout().lock(), readiness, &config)
        }
        OutputMode::Json => print_json(readiness),
    }
}

/// Print a task with its full dependency context (for the show command)
pub fn print_task_details(details: &TaskWithDependencies, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            print_task_details_text(&mut io::stdout().lock(), details, &config)
        }
        OutputMode::Json => print_json(details),
    }
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", msg)
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{}", json)
}

// ============================================================================
// Text Formatting
// ============================================================================

fn print_task_text<W: Write>(w: &mut W, task: &TaskRecord, config: &OutputConfig) -> io::Result<()> {
    writeln!(
        w,
        "{} {} {} {}",
        colored_status_icon(task.status, config),
        colorize_id(&task.id.to_string(), config),
        task.title,
        dimmed(&format!("({})", task.status), config)
    )
}

fn print_tasks_text<W: Write>(
    w: &mut W,
    tasks: &[TaskRecord],
    config: &OutputConfig,
) -> io::Result<()> {
    if tasks.is_empty() {
        writeln!(w, "No tasks found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} task(s):", tasks.len())?;
    writeln!(w)?;

    for task in tasks {
        print_task_text(w, task, config)?;
    }

    Ok(())
}

fn print_edge_text<W: Write>(
    w: &mut W,
    edge: &DependencyEdge,
    verb: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} dependency {}: {} {} {}",
        verb,
        colorize_id(&edge.id.to_string(), config),
        colorize_id(&edge.task_id.to_string(), config),
        edge.kind,
        colorize_id(&edge.dependent_task_id.to_string(), config),
    )
}

/// Render the other end of an edge as `#id "title" (status)`.
fn describe_other(view: &DependencyView, config: &OutputConfig) -> String {
    let id = colorize_id(&view.other_task_id.to_string(), config);
    match (&view.other_task_title, view.other_task_status) {
        (Some(title), Some(status)) => {
            format!("{} \"{}\" ({})", id, title, colorize_status(status, config))
        }
        _ => format!("{} {}", id, dimmed("(missing task)", config)),
    }
}

fn print_view_lines<W: Write>(
    w: &mut W,
    views: &[&DependencyView],
    config: &OutputConfig,
) -> io::Result<()> {
    for view in views {
        writeln!(
            w,
            "  └── {} {}",
            describe_other(view, config),
            dimmed(
                &format!(
                    "[{} by {} at {}]",
                    view.edge_id,
                    view.created_by,
                    view.created_at.format("%Y-%m-%d %H:%M")
                ),
                config
            )
        )?;
    }
    Ok(())
}

fn print_dependency_views_text<W: Write>(
    w: &mut W,
    task_id: TaskId,
    views: &[DependencyView],
    config: &OutputConfig,
) -> io::Result<()> {
    let task_id = colorize_id(&task_id.to_string(), config);
    if views.is_empty() {
        writeln!(w, "{} has no dependencies", task_id)?;
        return Ok(());
    }

    let (blocked_by, blocks): (Vec<&DependencyView>, Vec<&DependencyView>) =
        views.iter().partition(|view| view.is_blocked_by());

    if !blocked_by.is_empty() {
        writeln!(w, "↓ {} is blocked by ({}):", task_id, blocked_by.len())?;
        print_view_lines(w, &blocked_by, config)?;
    }
    if !blocks.is_empty() {
        writeln!(w, "↑ {} blocks ({}):", task_id, blocks.len())?;
        print_view_lines(w, &blocks, config)?;
    }
    Ok(())
}

fn print_readiness_text<W: Write>(
    w: &mut W,
    readiness: &Readiness,
    config: &OutputConfig,
) -> io::Result<()> {
    let task_id = colorize_id(&readiness.task_id.to_string(), config);
    if readiness.can_start {
        writeln!(w, "{} {}", task_id, success("can start", config))?;
        return Ok(());
    }

    writeln!(
        w,
        "{} {} ({} blocker(s)):",
        task_id,
        error("cannot start", config),
        readiness.blockers.len()
    )?;
    for reason in readiness.reasons() {
        writeln!(w, "  - {}", reason)?;
    }
    Ok(())
}

fn print_task_details_text<W: Write>(
    w: &mut W,
    details: &TaskWithDependencies,
    config: &OutputConfig,
) -> io::Result<()> {
    let task = &details.task;
    writeln!(
        w,
        "{} {}: {}",
        colored_status_icon(task.status, config),
        colorize_id(&task.id.to_string(), config),
        task.title
    )?;
    writeln!(
        w,
        "{} {}",
        dimmed("Status:", config),
        colorize_status(task.status, config)
    )?;

    let ready = if details.can_start {
        success("yes", config)
    } else {
        error("no", config)
    };
    writeln!(w, "{} {}", dimmed("Can start:", config), ready)?;

    if !details.blocked_by.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} ({}):",
            bold("Blocked by", config),
            details.blocked_by.len()
        )?;
        let views: Vec<&DependencyView> = details.blocked_by.iter().collect();
        print_view_lines(w, &views, config)?;
    }

    if !details.blocks.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Blocks", config), details.blocks.len())?;
        let views: Vec<&DependencyView> = details.blocks.iter().collect();
        print_view_lines(w, &views, config)?;
    }

    if !details.blocking_reasons.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Why not", config))?;
        for reason in &details.blocking_reasons {
            writeln!(w, "  - {}", reason)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Blocker, DependencyDirection, DependencyId, DependencyKind, TaskId, TaskStatus, UserId,
    };
    use chrono::Utc;
    use std::collections::HashMap;

    fn plain() -> OutputConfig {
        OutputConfig::new(true, false)
    }

    fn task(id: u64, title: &str, status: TaskStatus) -> TaskRecord {
        TaskRecord {
            id: TaskId(id),
            title: title.to_string(),
            status,
        }
    }

    fn view(direction: DependencyDirection, other: u64, title: Option<&str>) -> DependencyView {
        DependencyView {
            edge_id: DependencyId(other),
            direction,
            other_task_id: TaskId(other),
            other_task_title: title.map(str::to_string),
            other_task_status: title.map(|_| TaskStatus::Pending),
            created_at: Utc::now(),
            created_by: UserId::new("alice"),
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_output_config_from_lookup() {
        let vars: HashMap<&str, &str> = [("TASKDEPS_ASCII", "1")].into_iter().collect();
        let config = OutputConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert!(config.use_ascii);
        assert!(config.use_colors);

        let vars: HashMap<&str, &str> = [("NO_COLOR", "1")].into_iter().collect();
        let config = OutputConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert!(!config.use_colors, "NO_COLOR should disable colors");

        let vars: HashMap<&str, &str> = [("TASKDEPS_COLOR", "false"), ("TASKDEPS_ASCII", "maybe")]
            .into_iter()
            .collect();
        let config = OutputConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert!(!config.use_colors);
        assert!(!config.use_ascii);
    }

    #[test]
    fn test_print_tasks_text() {
        let tasks = vec![
            task(1, "Design schema", TaskStatus::Completed),
            task(2, "Build API", TaskStatus::Pending),
        ];
        let output = render(|w| print_tasks_text(w, &tasks, &plain()));

        assert!(output.contains("Found 2 task(s)"));
        assert!(output.contains("+ #1 Design schema (completed)"));
        assert!(output.contains("o #2 Build API (pending)"));
    }

    #[test]
    fn test_print_empty_task_list() {
        let output = render(|w| print_tasks_text(w, &[], &plain()));
        assert_eq!(output, "No tasks found.\n");
    }

    #[test]
    fn test_print_edge_text() {
        let edge = DependencyEdge {
            id: DependencyId(3),
            task_id: TaskId(2),
            dependent_task_id: TaskId(1),
            kind: DependencyKind::BlockedBy,
            created_at: Utc::now(),
            created_by: UserId::new("alice"),
        };
        let output = render(|w| print_edge_text(w, &edge, "Added", &plain()));
        assert_eq!(output, "Added dependency dep-3: #2 blocked-by #1\n");
    }

    #[test]
    fn test_print_dependency_views_splits_directions() {
        let views = vec![
            view(DependencyDirection::BlockedBy, 1, Some("Design schema")),
            view(DependencyDirection::Blocks, 3, None),
        ];
        let output = render(|w| print_dependency_views_text(w, TaskId(2), &views, &plain()));

        assert!(output.contains("#2 is blocked by (1):"));
        assert!(output.contains("#1 \"Design schema\" (pending)"));
        assert!(output.contains("#2 blocks (1):"));
        assert!(output.contains("#3 (missing task)"));
    }

    #[test]
    fn test_print_readiness_text() {
        let ready = Readiness {
            task_id: TaskId(5),
            can_start: true,
            blockers: vec![],
        };
        assert_eq!(
            render(|w| print_readiness_text(w, &ready, &plain())),
            "#5 can start\n"
        );

        let blocked = Readiness {
            task_id: TaskId(5),
            can_start: false,
            blockers: vec![Blocker {
                edge_id: DependencyId(1),
                task_id: TaskId(4),
                title: "Review".to_string(),
                status: TaskStatus::InProgress,
            }],
        };
        let output = render(|w| print_readiness_text(w, &blocked, &plain()));
        assert!(output.contains("cannot start (1 blocker(s))"));
        assert!(output.contains("Blocked by task #4 \"Review\" (status: in_progress)"));
    }

    #[test]
    fn test_print_task_details_text() {
        let details = TaskWithDependencies {
            task: task(2, "Build API", TaskStatus::Pending),
            blocked_by: vec![view(DependencyDirection::BlockedBy, 1, Some("Design"))],
            blocks: vec![],
            can_start: false,
            blocking_reasons: vec!["Blocked by task #1 \"Design\" (status: pending)".to_string()],
        };
        let output = render(|w| print_task_details_text(w, &details, &plain()));

        assert!(output.contains("#2: Build API"));
        assert!(output.contains("Can start: no"));
        assert!(output.contains("Blocked by (1):"));
        assert!(output.contains("Why not:"));
        assert!(!output.contains("Blocks ("));
    }
}
