//! Storage abstraction layer for taskdeps.
//!
//! The engine never owns its storage: every component receives the store as
//! an injected trait object. Two traits split the concerns:
//!
//! - [`DependencyStore`]: edge CRUD and the raw lookups the engine needs
//! - [`TaskStore`]: the external task table (existence, title, status)
//!
//! [`Store`] combines both plus persistence and is what the factory returns.
//!
//! Backends:
//!
//! - **In-memory**: fast, ephemeral tables guarded by an async `RwLock`
//! - **JSONL**: the in-memory backend with a snapshot file written on `save()`
//!
//! # Test Utilities
//!
//! With the `test-util` feature (or under `cfg(test)`) this module exposes
//! [`UnavailableStore`], which fails every call with a storage error, and
//! [`StalledStore`], which never completes a call. Both are meant for
//! exercising error and timeout paths.
//!
//! # Example
//!
//! ```no_run
//! use taskdeps::domain::{DependencyKind, NewDependency, UserId};
//! use taskdeps::storage::{create_store, DependencyStore, StorageBackend, TaskStore};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let store = create_store(StorageBackend::InMemory).await?;
//!
//!     let design = store.create_task("Design schema".to_string()).await?;
//!     let build = store.create_task("Build API".to_string()).await?;
//!
//!     // Raw insert, no validation. Use DependencyService for validated writes.
//!     let edge = store
//!         .insert(NewDependency {
//!             task_id: build.id,
//!             dependent_task_id: design.id,
//!             kind: DependencyKind::BlockedBy,
//!             created_by: UserId::new("alice"),
//!         })
//!         .await?;
//!     println!("Stored edge {}", edge.id);
//!
//!     Ok(())
//! }
//! ```

use crate::domain::{
    DependencyEdge, DependencyId, DependencyKind, NewDependency, TaskId, TaskRecord, TaskStatus,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Storage backend implementations
pub mod in_memory;

/// Edge persistence used by the engine.
///
/// All listing methods return edges in creation order (ascending id).
/// Implementations must be `Send + Sync`; reads may run concurrently with each
/// other and must never block indefinitely.
#[async_trait]
pub trait DependencyStore: Send + Sync {
    /// All edges where `task_id` appears on either end.
    ///
    /// Returns an empty list for an unknown task.
    async fn edges_touching(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>>;

    /// `BlockedBy` edges whose subject is `task_id`: the predecessors it waits on.
    async fn blocking_edges_for(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>>;

    /// `BlockedBy` edges that reference `task_id`: the successors waiting on it.
    async fn blocked_edges_by(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>>;

    /// Persist a new edge, assigning its id and creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the store is unreachable or a uniqueness
    /// constraint rejects the row.
    async fn insert(&self, edge: NewDependency) -> Result<DependencyEdge>;

    /// Delete an edge. Returns `false` if no such edge existed.
    async fn delete_by_id(&self, id: DependencyId) -> Result<bool>;

    /// Whether an edge with exactly these endpoints and kind exists.
    async fn edge_exists(
        &self,
        task_id: TaskId,
        dependent_task_id: TaskId,
        kind: DependencyKind,
    ) -> Result<bool>;

    /// Look up a single edge.
    async fn get_edge(&self, id: DependencyId) -> Result<Option<DependencyEdge>>;

    /// Every stored edge, for export.
    async fn all_edges(&self) -> Result<Vec<DependencyEdge>>;
}

/// The external task table.
///
/// The engine itself only calls [`TaskStore::get_task`]; the write methods
/// exist so the CLI and tests can manage the tasks edges refer to.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Get a task by ID. Returns `None` if it doesn't exist.
    async fn get_task(&self, id: TaskId) -> Result<Option<TaskRecord>>;

    /// Create a task in `Pending` status.
    async fn create_task(&self, title: String) -> Result<TaskRecord>;

    /// Change a task's status.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task doesn't exist.
    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<TaskRecord>;

    /// Delete a task and every edge touching it.
    ///
    /// Returns `false` if the task didn't exist.
    async fn delete_task(&self, id: TaskId) -> Result<bool>;

    /// All tasks, ordered by id.
    async fn list_tasks(&self) -> Result<Vec<TaskRecord>>;
}

/// A complete backend: both tables plus persistence.
#[async_trait]
pub trait Store: DependencyStore + TaskStore {
    /// Flush state to persistent storage.
    ///
    /// No-op for purely in-memory backends.
    async fn save(&self) -> Result<()>;

    /// The ids the next created task and edge will receive.
    ///
    /// Persisted with snapshots so ids freed by a delete are never handed
    /// out again after a reload.
    async fn id_counters(&self) -> Result<IdCounters>;
}

/// Next-id counters of a store.
///
/// Counters only move forward: an id is never reused, even after the record
/// holding it has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    /// Id the next created task receives
    pub next_task_id: u64,

    /// Id the next created edge receives
    pub next_edge_id: u64,
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL snapshot file (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Wrapper that adds JSONL file persistence to an in-memory store.
struct JsonlBackedStore {
    inner: Arc<dyn Store>,
    path: PathBuf,
}

#[async_trait]
impl DependencyStore for JsonlBackedStore {
    async fn edges_touching(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        self.inner.edges_touching(task_id).await
    }

    async fn blocking_edges_for(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        self.inner.blocking_edges_for(task_id).await
    }

    async fn blocked_edges_by(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        self.inner.blocked_edges_by(task_id).await
    }

    async fn insert(&self, edge: NewDependency) -> Result<DependencyEdge> {
        self.inner.insert(edge).await
    }

    async fn delete_by_id(&self, id: DependencyId) -> Result<bool> {
        self.inner.delete_by_id(id).await
    }

    async fn edge_exists(
        &self,
        task_id: TaskId,
        dependent_task_id: TaskId,
        kind: DependencyKind,
    ) -> Result<bool> {
        self.inner.edge_exists(task_id, dependent_task_id, kind).await
    }

    async fn get_edge(&self, id: DependencyId) -> Result<Option<DependencyEdge>> {
        self.inner.get_edge(id).await
    }

    async fn all_edges(&self) -> Result<Vec<DependencyEdge>> {
        self.inner.all_edges().await
    }
}

#[async_trait]
impl TaskStore for JsonlBackedStore {
    async fn get_task(&self, id: TaskId) -> Result<Option<TaskRecord>> {
        self.inner.get_task(id).await
    }

    async fn create_task(&self, title: String) -> Result<TaskRecord> {
        self.inner.create_task(title).await
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<TaskRecord> {
        self.inner.set_status(id, status).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool> {
        self.inner.delete_task(id).await
    }

    async fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        self.inner.list_tasks().await
    }
}

#[async_trait]
impl Store for JsonlBackedStore {
    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn id_counters(&self) -> Result<IdCounters> {
        self.inner.id_counters().await
    }
}

/// Create a store for the given backend.
///
/// For the JSONL backend an existing file is loaded resiliently: damaged or
/// invariant-breaking records are skipped and logged as warnings.
///
/// # Errors
///
/// - `Error::Io` if the data file exists but cannot be read
pub async fn create_store(backend: StorageBackend) -> Result<Arc<dyn Store>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_store()),
        StorageBackend::Jsonl(path) => {
            let inner = if path.exists() {
                let (store, warnings) = in_memory::load_from_jsonl(&path).await?;
                for warning in &warnings {
                    tracing::warn!(warning = ?warning, "JSONL load warning");
                }
                store
            } else {
                // First run - nothing to load yet
                in_memory::new_in_memory_store()
            };
            Ok(Arc::new(JsonlBackedStore { inner, path }))
        }
    }
}

// ========== Test Utilities ==========

/// Store whose every call fails with `StorageError::Unavailable`.
///
/// Used to verify that storage failures propagate to callers and leave no
/// partial writes behind.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct UnavailableStore;

#[cfg(any(test, feature = "test-util"))]
impl UnavailableStore {
    /// Create a new `UnavailableStore`.
    pub fn new() -> Self {
        Self
    }

    fn fail<T>() -> Result<T> {
        Err(crate::error::StorageError::Unavailable("connection refused".to_string()).into())
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl DependencyStore for UnavailableStore {
    async fn edges_touching(&self, _task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        Self::fail()
    }

    async fn blocking_edges_for(&self, _task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        Self::fail()
    }

    async fn blocked_edges_by(&self, _task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        Self::fail()
    }

    async fn insert(&self, _edge: NewDependency) -> Result<DependencyEdge> {
        Self::fail()
    }

    async fn delete_by_id(&self, _id: DependencyId) -> Result<bool> {
        Self::fail()
    }

    async fn edge_exists(
        &self,
        _task_id: TaskId,
        _dependent_task_id: TaskId,
        _kind: DependencyKind,
    ) -> Result<bool> {
        Self::fail()
    }

    async fn get_edge(&self, _id: DependencyId) -> Result<Option<DependencyEdge>> {
        Self::fail()
    }

    async fn all_edges(&self) -> Result<Vec<DependencyEdge>> {
        Self::fail()
    }
}

/// Store whose every call stays pending forever.
///
/// Used to verify that engine operations honor their timeout instead of hanging.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct StalledStore;

#[cfg(any(test, feature = "test-util"))]
impl StalledStore {
    /// Create a new `StalledStore`.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl DependencyStore for StalledStore {
    async fn edges_touching(&self, _task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        std::future::pending().await
    }

    async fn blocking_edges_for(&self, _task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        std::future::pending().await
    }

    async fn blocked_edges_by(&self, _task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        std::future::pending().await
    }

    async fn insert(&self, _edge: NewDependency) -> Result<DependencyEdge> {
        std::future::pending().await
    }

    async fn delete_by_id(&self, _id: DependencyId) -> Result<bool> {
        std::future::pending().await
    }

    async fn edge_exists(
        &self,
        _task_id: TaskId,
        _dependent_task_id: TaskId,
        _kind: DependencyKind,
    ) -> Result<bool> {
        std::future::pending().await
    }

    async fn get_edge(&self, _id: DependencyId) -> Result<Option<DependencyEdge>> {
        std::future::pending().await
    }

    async fn all_edges(&self) -> Result<Vec<DependencyEdge>> {
        std::future::pending().await
    }
}
