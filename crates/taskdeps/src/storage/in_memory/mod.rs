//! In-memory storage backend.
//!
//! This module provides a fast, **ephemeral** implementation of both store
//! traits where all data is held in RAM and **lost when the process exits**,
//! unless it is wrapped by the JSONL backend. It is suitable for:
//!
//! - Tests that need a substitutable fake graph
//! - Short-lived CLI sessions backed by a snapshot file
//!
//! # Persistence
//!
//! [`load_from_jsonl`] and [`save_to_jsonl`] move the whole state to and from
//! a JSONL snapshot. The trait's `save()` is a no-op for the bare in-memory
//! store; the JSONL backend overrides it.
//!
//! # Architecture
//!
//! The tables mirror a relational layout:
//! - `BTreeMap<TaskId, TaskRecord>` for the task table
//! - `BTreeMap<DependencyId, DependencyEdge>` for the edge table
//! - Forward and reverse adjacency indexes keyed by task id, holding edge ids
//!   in ascending (creation) order
//!
//! ## Edge Direction Convention
//!
//! A `BlockedBy` edge is indexed **subject -> referenced task**:
//!
//! - `outgoing[task_id]` holds the edges the task waits on
//! - `incoming[dependent_task_id]` holds the edges of tasks waiting on it
//!
//! # Thread Safety
//!
//! The tables are wrapped in `Arc<RwLock<InMemoryStoreInner>>`. Reads share the
//! lock and run in parallel; writes take it exclusively. Each trait method holds
//! the lock for its own duration only.

mod graph;
mod inner;
mod jsonl;
mod trait_impl;

use crate::storage::Store;
use inner::InMemoryStoreInner;
use std::sync::Arc;
use tokio::sync::RwLock;

// Re-export public API
pub use graph::EdgeGraph;
pub use jsonl::{load_from_jsonl, save_to_jsonl, LoadWarning, SnapshotRecord};

/// Thread-safe in-memory store.
///
/// Implements the store traits via `trait_impl.rs`.
pub(crate) type InMemoryStore = Arc<RwLock<InMemoryStoreInner>>;

/// Create a new, empty in-memory store.
///
/// # Example
///
/// ```
/// use taskdeps::storage::in_memory::new_in_memory_store;
/// use taskdeps::storage::TaskStore;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let store = new_in_memory_store();
///     let task = store.create_task("Write docs".to_string()).await.unwrap();
///     assert_eq!(task.title, "Write docs");
/// }
/// ```
pub fn new_in_memory_store() -> Arc<dyn Store> {
    Arc::new(Arc::new(RwLock::new(InMemoryStoreInner::new())))
}
