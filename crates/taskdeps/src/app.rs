//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that manages storage lifecycle
//! and provides a context for executing CLI commands.
//!
//! # Example
//!
//! ```no_run
//! use taskdeps::app::App;
//! use taskdeps::domain::TaskId;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     println!("{}", app.service().can_task_start(TaskId(1)).await?);
//!     Ok(())
//! }
//! ```

use crate::commands::init::{find_taskdeps_root, TaskdepsConfig, CONFIG_FILE_NAME, TASKDEPS_DIR_NAME};
use crate::engine::DependencyService;
use crate::error::{Error, Result};
use crate::storage::{create_store, Store};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application context for CLI operations.
///
/// Owns the store and the dependency service built on top of it. Storage is
/// loaded from the workspace on creation; call [`App::save`] after mutations.
pub struct App {
    /// The storage backend (trait object for polymorphism)
    store: Arc<dyn Store>,

    /// Validated dependency operations over `store`
    service: DependencyService,

    /// Path to the taskdeps directory (.taskdeps)
    taskdeps_dir: PathBuf,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("taskdeps_dir", &self.taskdeps_dir)
            .field("store", &"<dyn Store>")
            .field("service", &self.service)
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree to find a `.taskdeps/` directory,
    /// loads configuration, and initializes storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No taskdeps workspace is found in the directory tree
    /// - Configuration cannot be loaded or is invalid
    /// - Storage initialization fails
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_taskdeps_root(working_dir).ok_or(Error::NotInitialized)?;

        let taskdeps_dir = root_dir.join(TASKDEPS_DIR_NAME);
        let config = TaskdepsConfig::load(&taskdeps_dir.join(CONFIG_FILE_NAME)).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        tracing::debug!(backend = ?backend, "Opening store");
        let store = create_store(backend).await?;
        let service = DependencyService::from_store(store.clone(), &config.engine);

        Ok(Self {
            store,
            service,
            taskdeps_dir,
        })
    }

    /// The underlying store, for task management.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// The dependency service.
    pub fn service(&self) -> &DependencyService {
        &self.service
    }

    /// Get the path to the taskdeps directory.
    pub fn taskdeps_dir(&self) -> &Path {
        &self.taskdeps_dir
    }

    /// Save storage state to persistent storage.
    ///
    /// This should be called after any mutating operations.
    pub async fn save(&self) -> Result<()> {
        self.store.save().await
    }
}
