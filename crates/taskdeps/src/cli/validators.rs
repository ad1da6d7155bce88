//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::{DependencyId, TaskId};

/// Maximum task title length in characters
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum user name length in characters
pub const MAX_USER_LENGTH: usize = 64;

/// Parse a numeric id, tolerating one optional prefix such as `#` or `dep-`.
fn parse_numeric_id(s: &str, prefix: &str, what: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err(format!("{} cannot be empty", what));
    }

    let digits = s.strip_prefix(prefix).unwrap_or(s);
    let id: u64 = digits.parse().map_err(|_| {
        format!(
            "Invalid {}: '{}'. Expected a number (e.g., 12 or {}12)",
            what.to_lowercase(),
            s,
            prefix
        )
    })?;

    if id == 0 {
        return Err(format!("{} must be at least 1", what));
    }

    Ok(id)
}

/// Validate a task ID.
///
/// Accepts a bare number or the display form: `12`, `#12`.
pub fn validate_task_id(s: &str) -> Result<TaskId, String> {
    parse_numeric_id(s, "#", "Task ID").map(TaskId)
}

/// Validate a dependency edge ID.
///
/// Accepts a bare number or the display form: `3`, `dep-3`.
pub fn validate_edge_id(s: &str) -> Result<DependencyId, String> {
    parse_numeric_id(s, "dep-", "Dependency ID").map(DependencyId)
}

/// Validate title length.
///
/// Title must not exceed MAX_TITLE_LENGTH (200 characters).
pub fn validate_title(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    if s.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {} characters, got {} characters",
            MAX_TITLE_LENGTH,
            s.chars().count()
        ));
    }

    if s.contains('\n') || s.contains('\r') {
        return Err("Title cannot contain newline characters".to_string());
    }

    // Control characters excluding tab, plus C1 controls
    if let Some(pos) = s.chars().position(|c| {
        let code = c as u32;
        (code < 0x20 && code != 0x09) || (0x7F..=0x9F).contains(&code)
    }) {
        return Err(format!(
            "Title contains invalid control character at position {}",
            pos
        ));
    }

    Ok(s.to_string())
}

/// Validate the name recorded as an edge's creator.
pub fn validate_user(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("User cannot be empty".to_string());
    }

    if s.chars().count() > MAX_USER_LENGTH {
        return Err(format!("User cannot exceed {} characters", MAX_USER_LENGTH));
    }

    if s.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err("User cannot contain whitespace or control characters".to_string());
    }

    Ok(s.to_string())
}
