//! JSONL persistence for the in-memory store.
//!
//! A snapshot holds one record per line: the id counters, then tasks, then
//! edges in id order:
//!
//! ```text
//! {"record":"counters","next_task_id":3,"next_edge_id":2}
//! {"record":"task","id":1,"title":"Design schema","status":"completed"}
//! {"record":"dependency","id":1,"task_id":2,"dependent_task_id":1,"kind":"blocked-by",...}
//! ```

use super::graph::EdgeGraph;
use super::inner::InMemoryStoreInner;
use crate::domain::{DependencyEdge, DependencyId, TaskId, TaskRecord};
use crate::error::{Error, Result, StorageError};
use crate::storage::{DependencyStore, IdCounters, Store, TaskStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::RwLock;

/// One line of a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum SnapshotRecord {
    /// Next-id counters, so ids freed by deletes stay retired across reloads
    Counters(IdCounters),

    /// A row of the task table
    Task(TaskRecord),

    /// A row of the edge table
    Dependency(DependencyEdge),
}

/// Non-fatal problems found while loading a snapshot.
///
/// The offending record is skipped; everything else is loaded. Applications
/// should surface these, since they point at manual edits or corruption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Line that couldn't be parsed as a snapshot record
    ///
    /// **Effect**: Line is skipped entirely.
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A second record for an already loaded task id
    ///
    /// **Effect**: The first record wins.
    DuplicateTask {
        /// The repeated id
        task_id: TaskId,
    },

    /// Edge from a task to itself
    ///
    /// **Effect**: Edge is skipped.
    SelfDependency {
        /// Edge id
        edge_id: DependencyId,
        /// The task on both ends
        task_id: TaskId,
    },

    /// Edge repeating an id or the endpoints and kind of an earlier edge
    ///
    /// **Effect**: The later edge is skipped.
    DuplicateDependency {
        /// Edge id of the skipped record
        edge_id: DependencyId,
    },

    /// Edge referencing a task that isn't in the snapshot
    ///
    /// **Effect**: Edge is skipped, as the task delete cascade would have done.
    OrphanedDependency {
        /// Edge id
        edge_id: DependencyId,
        /// Subject task
        task_id: TaskId,
        /// Referenced task
        dependent_task_id: TaskId,
    },

    /// Edge that would close a cycle with earlier edges
    ///
    /// **Effect**: Edge is skipped to break the cycle.
    CircularDependency {
        /// Edge id
        edge_id: DependencyId,
        /// Subject task
        task_id: TaskId,
        /// Referenced task
        dependent_task_id: TaskId,
    },
}

/// Load a store from a JSONL snapshot.
///
/// Loading is resilient: every record that would break an invariant is
/// skipped and reported as a [`LoadWarning`]. Edges are applied in id order,
/// so when two edges conflict the older one is kept.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read.
pub async fn load_from_jsonl(path: &Path) -> Result<(Arc<dyn Store>, Vec<LoadWarning>)> {
    let content = tokio::fs::read_to_string(path).await?;

    let mut warnings = Vec::new();
    let mut tasks = Vec::new();
    let mut edges = Vec::new();
    let mut counters = Vec::new();

    // First pass: parse lines
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SnapshotRecord>(line) {
            Ok(SnapshotRecord::Task(task)) => tasks.push(task),
            Ok(SnapshotRecord::Dependency(edge)) => edges.push(edge),
            Ok(SnapshotRecord::Counters(saved)) => counters.push(saved),
            Err(e) => warnings.push(LoadWarning::MalformedJson {
                line_number: index + 1,
                error: e.to_string(),
            }),
        }
    }

    let mut inner = InMemoryStoreInner::new();

    // Second pass: task table
    for task in tasks {
        if inner.tasks.contains_key(&task.id) {
            warnings.push(LoadWarning::DuplicateTask { task_id: task.id });
            continue;
        }
        inner.restore_task(task);
    }

    // Third pass: edges, re-checking every invariant
    edges.sort_by_key(|edge| edge.id);
    let mut graph = EdgeGraph::new();
    let mut seen_ids = HashSet::new();

    for edge in edges {
        if !seen_ids.insert(edge.id)
            || inner
                .find_edge(edge.task_id, edge.dependent_task_id, edge.kind)
                .is_some()
        {
            warnings.push(LoadWarning::DuplicateDependency { edge_id: edge.id });
            continue;
        }

        if edge.task_id == edge.dependent_task_id {
            warnings.push(LoadWarning::SelfDependency {
                edge_id: edge.id,
                task_id: edge.task_id,
            });
            continue;
        }

        if !inner.tasks.contains_key(&edge.task_id)
            || !inner.tasks.contains_key(&edge.dependent_task_id)
        {
            warnings.push(LoadWarning::OrphanedDependency {
                edge_id: edge.id,
                task_id: edge.task_id,
                dependent_task_id: edge.dependent_task_id,
            });
            continue;
        }

        if !graph.try_add(edge.task_id, edge.dependent_task_id) {
            warnings.push(LoadWarning::CircularDependency {
                edge_id: edge.id,
                task_id: edge.task_id,
                dependent_task_id: edge.dependent_task_id,
            });
            continue;
        }

        inner.restore_edge(edge);
    }

    // Snapshots without a counters record resume after the highest loaded id
    for saved in counters {
        inner.raise_counters(saved);
    }

    tracing::debug!(
        path = %path.display(),
        tasks = inner.tasks.len(),
        edges = inner.edges.len(),
        warnings = warnings.len(),
        "Loaded snapshot"
    );

    let store: Arc<dyn Store> = Arc::new(Arc::new(RwLock::new(inner)));
    Ok((store, warnings))
}

/// Save a store to a JSONL snapshot with an atomic write.
///
/// Writes to a temporary file next to `path`, then renames it over `path`.
/// If the process dies midway the previous snapshot stays intact. The
/// temporary name carries the process id, so concurrent saves never write
/// into each other's temp file; the last rename still wins.
pub async fn save_to_jsonl(store: &dyn Store, path: &Path) -> Result<()> {
    let temp_path = path.with_extension(format!("{}.tmp", std::process::id()));

    let counters = store.id_counters().await?;
    let tasks = store.list_tasks().await?;
    let edges = store.all_edges().await?;

    let file = File::create(&temp_path).await.map_err(Error::Io)?;
    let mut writer = BufWriter::new(file);

    let records = std::iter::once(SnapshotRecord::Counters(counters))
        .chain(tasks.into_iter().map(SnapshotRecord::Task))
        .chain(edges.into_iter().map(SnapshotRecord::Dependency));

    for record in records {
        let json = serde_json::to_string(&record).map_err(StorageError::Serialization)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;

    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}
