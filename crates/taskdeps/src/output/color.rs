//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success/Done:  green   (completed status, ready tasks)
//!   - Warning/Active: yellow (in_progress status)
//!   - Error/Blocked: red     (cancelled status, blockers)
//!   - Info/Reference: cyan   (task and edge IDs)
//!   - Muted:         dimmed  (field labels, edge metadata)
//!   - Emphasis:      bold    (section headers)
//!   - Default:       white   (pending status)

use crate::domain::TaskStatus;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply color to status text based on task status.
pub(crate) fn colorize_status(status: TaskStatus, config: &OutputConfig) -> String {
    let text = format!("{status}");
    if !config.use_colors {
        return text;
    }
    match status {
        TaskStatus::Pending => text.white().to_string(),
        TaskStatus::InProgress => text.yellow().to_string(),
        TaskStatus::Completed => text.green().to_string(),
        TaskStatus::Cancelled => text.red().to_string(),
    }
}

/// Colorize a task or edge ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Get a colored status icon, with ASCII fallback support.
pub(crate) fn colored_status_icon(status: TaskStatus, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        match status {
            TaskStatus::Pending => "o",
            TaskStatus::InProgress => ">",
            TaskStatus::Completed => "+",
            TaskStatus::Cancelled => "x",
        }
    } else {
        match status {
            TaskStatus::Pending => "○",
            TaskStatus::InProgress => "▶",
            TaskStatus::Completed => "✓",
            TaskStatus::Cancelled => "✗",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }

    match status {
        TaskStatus::Pending => icon.white().to_string(),
        TaskStatus::InProgress => icon.yellow().to_string(),
        TaskStatus::Completed => icon.green().to_string(),
        TaskStatus::Cancelled => icon.red().to_string(),
    }
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::control::set_override;
    use std::sync::{Mutex, MutexGuard};

    static GLOBAL_STATE_MUTEX: Mutex<()> = Mutex::new(());

    struct ColorGuard<'a> {
        _guard: MutexGuard<'a, ()>,
    }

    impl ColorGuard<'_> {
        fn new() -> Self {
            let guard = GLOBAL_STATE_MUTEX
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            set_override(true);
            Self { _guard: guard }
        }
    }

    impl Drop for ColorGuard<'_> {
        fn drop(&mut self) {
            set_override(false);
        }
    }

    #[test]
    fn test_colorize_status_contains_ansi_codes() {
        let _guard = ColorGuard::new();
        let config = OutputConfig::new(false, true);

        let pending = colorize_status(TaskStatus::Pending, &config);
        let completed = colorize_status(TaskStatus::Completed, &config);

        assert!(pending.contains("pending"));
        assert!(completed.contains("completed"));
        assert!(completed.contains("\x1b["));
    }

    #[test]
    fn test_colorize_status_without_colors() {
        let config = OutputConfig::new(false, false);
        assert_eq!(
            colorize_status(TaskStatus::InProgress, &config),
            "in_progress"
        );
        assert_eq!(colorize_id("#4", &config), "#4");
    }

    #[test]
    fn test_ascii_fallback_icons() {
        let config = OutputConfig::new(true, false);
        assert_eq!(colored_status_icon(TaskStatus::Pending, &config), "o");
        assert_eq!(colored_status_icon(TaskStatus::InProgress, &config), ">");
        assert_eq!(colored_status_icon(TaskStatus::Completed, &config), "+");
        assert_eq!(colored_status_icon(TaskStatus::Cancelled, &config), "x");
    }

    #[test]
    fn test_semantic_colors_without_colors() {
        let config = OutputConfig::new(false, false);
        assert_eq!(success("ok", &config), "ok");
        assert_eq!(error("bad", &config), "bad");
        assert_eq!(bold("Header", &config), "Header");
        assert_eq!(dimmed("label", &config), "label");
    }
}
