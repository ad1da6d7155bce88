//! Implementation of the `init` command.
//!
//! This module handles initialization of a new taskdeps workspace, creating
//! the `.taskdeps/` directory structure with configuration and data files.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the taskdeps directory
pub const TASKDEPS_DIR_NAME: &str = ".taskdeps";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the graph snapshot file
pub const GRAPH_FILE_NAME: &str = "graph.jsonl";

/// Name of the gitignore file within .taskdeps
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Maximum directory depth to traverse when searching for the workspace root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Backend name for the JSONL-backed in-memory store
pub const BACKEND_JSONL: &str = "jsonl";

/// Backend name for the purely in-memory store
pub const BACKEND_MEMORY: &str = "memory";

/// Configuration file structure for taskdeps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskdepsConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Engine tuning
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("jsonl" or "memory")
    pub backend: String,

    /// Path to the data file, relative to the workspace root
    pub data_file: String,
}

impl StorageConfig {
    /// Resolve this section into a concrete backend rooted at `root_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an unknown backend name.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            BACKEND_JSONL => Ok(StorageBackend::Jsonl(root_dir.join(&self.data_file))),
            BACKEND_MEMORY => Ok(StorageBackend::InMemory),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}' (expected '{}' or '{}')",
                other, BACKEND_JSONL, BACKEND_MEMORY
            ))),
        }
    }
}

impl TaskdepsConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {}", e)))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for TaskdepsConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: BACKEND_JSONL.to_string(),
                data_file: format!("{}/{}", TASKDEPS_DIR_NAME, GRAPH_FILE_NAME),
            },
            engine: EngineConfig::default(),
        }
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created taskdeps directory
    pub taskdeps_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created graph snapshot
    pub graph_file: PathBuf,
    /// Path to the created gitignore file
    pub gitignore_file: PathBuf,
}

/// Initialize a new taskdeps workspace in the given directory.
///
/// # Errors
///
/// Returns an error if:
/// - The `.taskdeps/` directory already exists
/// - File system operations fail
pub async fn init(base_dir: &Path) -> Result<InitResult> {
    let taskdeps_dir = base_dir.join(TASKDEPS_DIR_NAME);

    if taskdeps_dir.exists() {
        return Err(Error::Config(format!(
            "Taskdeps is already initialized in this directory. Found existing '{}'",
            TASKDEPS_DIR_NAME
        )));
    }

    fs::create_dir_all(&taskdeps_dir).await?;

    let config_file = taskdeps_dir.join(CONFIG_FILE_NAME);
    TaskdepsConfig::default().save(&config_file).await?;

    let graph_file = taskdeps_dir.join(GRAPH_FILE_NAME);
    fs::write(&graph_file, "").await?;

    let gitignore_file = taskdeps_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# Snapshot temp files left behind by an interrupted save
*.tmp
";
    fs::write(&gitignore_file, gitignore_content).await?;

    tracing::info!(path = %taskdeps_dir.display(), "Initialized taskdeps workspace");

    Ok(InitResult {
        taskdeps_dir,
        config_file,
        graph_file,
        gitignore_file,
    })
}

/// Find the workspace root by searching up the directory tree.
///
/// Returns the directory containing `.taskdeps/`, or `None` if none is found
/// before the filesystem root or [`MAX_TRAVERSAL_DEPTH`] levels up.
pub fn find_taskdeps_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(TASKDEPS_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
