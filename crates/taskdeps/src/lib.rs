//! Taskdeps - a dependency graph engine for tasks.
//!
//! Records directed "blocked by" edges between tasks, rejects edges that
//! would create self-dependencies, duplicates or cycles, and answers whether
//! a task can start. Ships as a library and as the `taskdeps` CLI.
//!
//! - [`domain`]: ids, task records, edges and read models
//! - [`storage`]: injected store traits plus in-memory and JSONL backends
//! - [`engine`]: cycle detection, readiness and the validated service
//!
//! # Example
//!
//! ```no_run
//! use taskdeps::config::EngineConfig;
//! use taskdeps::domain::{DependencyKind, UserId};
//! use taskdeps::engine::DependencyService;
//! use taskdeps::storage::{create_store, StorageBackend, TaskStore};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let store = create_store(StorageBackend::InMemory).await?;
//!     let service = DependencyService::from_store(store.clone(), &EngineConfig::default());
//!
//!     let design = store.create_task("Design schema".to_string()).await?;
//!     let build = store.create_task("Build API".to_string()).await?;
//!     service
//!         .create_dependency(build.id, design.id, DependencyKind::BlockedBy, UserId::new("alice"))
//!         .await?;
//!
//!     assert!(!service.can_task_start(build.id).await?);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod storage;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

// Application context and output formatting used by the CLI
pub mod app;
pub mod output;
