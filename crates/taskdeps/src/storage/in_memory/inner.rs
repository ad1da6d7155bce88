//! Core in-memory storage data structures.
//!
//! This module contains the inner tables that hold all data and are wrapped
//! in `Arc<RwLock<>>` for thread safety.

use crate::domain::{
    DependencyEdge, DependencyId, DependencyKind, NewDependency, TaskId, TaskRecord, TaskStatus,
};
use crate::error::{Result, StorageError};
use crate::storage::IdCounters;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Inner storage structure (not thread-safe).
///
/// See the module-level documentation for the edge direction convention.
pub(crate) struct InMemoryStoreInner {
    /// Task table
    pub(super) tasks: BTreeMap<TaskId, TaskRecord>,

    /// Edge table, ordered by id (= creation order)
    pub(super) edges: BTreeMap<DependencyId, DependencyEdge>,

    /// Subject task -> ids of edges it is the subject of
    pub(super) outgoing: HashMap<TaskId, BTreeSet<DependencyId>>,

    /// Referenced task -> ids of edges that reference it
    pub(super) incoming: HashMap<TaskId, BTreeSet<DependencyId>>,

    /// Next task id to hand out
    next_task_id: u64,

    /// Next edge id to hand out
    next_edge_id: u64,
}

impl InMemoryStoreInner {
    /// Create a new empty storage instance
    pub(crate) fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            edges: BTreeMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            next_task_id: 1,
            next_edge_id: 1,
        }
    }

    /// Insert a new task with a freshly allocated id.
    pub(super) fn add_task(&mut self, title: String) -> TaskRecord {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;

        let task = TaskRecord {
            id,
            title,
            status: TaskStatus::Pending,
        };
        self.tasks.insert(id, task.clone());
        task
    }

    /// Insert a task that already has an id (snapshot loading).
    ///
    /// Keeps the id counter ahead of every restored id.
    pub(super) fn restore_task(&mut self, task: TaskRecord) {
        self.next_task_id = self.next_task_id.max(task.id.0 + 1);
        self.tasks.insert(task.id, task);
    }

    /// The ids the next task and edge will receive.
    pub(super) fn counters(&self) -> IdCounters {
        IdCounters {
            next_task_id: self.next_task_id,
            next_edge_id: self.next_edge_id,
        }
    }

    /// Move the id counters forward to at least `counters`, never backward.
    pub(super) fn raise_counters(&mut self, counters: IdCounters) {
        self.next_task_id = self.next_task_id.max(counters.next_task_id);
        self.next_edge_id = self.next_edge_id.max(counters.next_edge_id);
    }

    /// Find an edge with exactly these endpoints and kind.
    pub(super) fn find_edge(
        &self,
        task_id: TaskId,
        dependent_task_id: TaskId,
        kind: DependencyKind,
    ) -> Option<&DependencyEdge> {
        self.outgoing
            .get(&task_id)?
            .iter()
            .filter_map(|id| self.edges.get(id))
            .find(|edge| edge.dependent_task_id == dependent_task_id && edge.kind == kind)
    }

    /// Insert a new edge, enforcing the unique `(task, dependent, kind)` constraint.
    pub(super) fn add_edge(
        &mut self,
        new_edge: NewDependency,
        created_at: DateTime<Utc>,
    ) -> Result<DependencyEdge> {
        if self
            .find_edge(new_edge.task_id, new_edge.dependent_task_id, new_edge.kind)
            .is_some()
        {
            return Err(StorageError::Constraint(format!(
                "duplicate edge {} -> {} ({})",
                new_edge.task_id, new_edge.dependent_task_id, new_edge.kind
            ))
            .into());
        }

        let edge = DependencyEdge {
            id: DependencyId(self.next_edge_id),
            task_id: new_edge.task_id,
            dependent_task_id: new_edge.dependent_task_id,
            kind: new_edge.kind,
            created_at,
            created_by: new_edge.created_by,
        };
        self.next_edge_id += 1;
        self.index_edge(edge.clone());
        Ok(edge)
    }

    /// Insert an edge that already has an id (snapshot loading).
    pub(super) fn restore_edge(&mut self, edge: DependencyEdge) {
        self.next_edge_id = self.next_edge_id.max(edge.id.0 + 1);
        self.index_edge(edge);
    }

    fn index_edge(&mut self, edge: DependencyEdge) {
        self.outgoing
            .entry(edge.task_id)
            .or_default()
            .insert(edge.id);
        self.incoming
            .entry(edge.dependent_task_id)
            .or_default()
            .insert(edge.id);
        self.edges.insert(edge.id, edge);
    }

    /// Remove an edge and its index entries.
    pub(super) fn remove_edge(&mut self, id: DependencyId) -> Option<DependencyEdge> {
        let edge = self.edges.remove(&id)?;

        if let Some(ids) = self.outgoing.get_mut(&edge.task_id) {
            ids.remove(&id);
            if ids.is_empty() {
                self.outgoing.remove(&edge.task_id);
            }
        }
        if let Some(ids) = self.incoming.get_mut(&edge.dependent_task_id) {
            ids.remove(&id);
            if ids.is_empty() {
                self.incoming.remove(&edge.dependent_task_id);
            }
        }

        Some(edge)
    }

    /// Remove a task and cascade to every edge touching it.
    ///
    /// Returns the number of edges removed, or `None` if the task didn't exist.
    pub(super) fn remove_task(&mut self, id: TaskId) -> Option<usize> {
        self.tasks.remove(&id)?;

        let touching: BTreeSet<DependencyId> = self
            .outgoing
            .get(&id)
            .into_iter()
            .chain(self.incoming.get(&id))
            .flatten()
            .copied()
            .collect();

        for edge_id in &touching {
            self.remove_edge(*edge_id);
        }

        Some(touching.len())
    }

    /// Resolve a set of edge ids to edges, keeping only `BlockedBy` ones.
    pub(super) fn blocked_by_edges<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a DependencyId>,
    ) -> Vec<DependencyEdge> {
        ids.into_iter()
            .filter_map(|id| self.edges.get(id))
            .filter(|edge| edge.kind == DependencyKind::BlockedBy)
            .cloned()
            .collect()
    }
}
