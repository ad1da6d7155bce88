//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Run the taskdeps binary in the specified directory
pub fn run_taskdeps_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskdeps"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute taskdeps binary")
}

/// Run a command that must succeed and return its stdout
pub fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = run_taskdeps_in_dir(dir, args);
    assert!(
        output.status.success(),
        "taskdeps {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Create a task and return its numeric id
pub fn create_task(dir: &Path, title: &str) -> u64 {
    let stdout = run_ok(dir, &["--json", "task", "add", title]);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("task add should print JSON");
    json["id"].as_u64().expect("task JSON should carry an id")
}
