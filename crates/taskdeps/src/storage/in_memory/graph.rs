//! Whole-graph view of the `BlockedBy` edges using petgraph.
//!
//! The engine's cycle detector works incrementally through store lookups.
//! This module is for bulk work where the full edge set is already in hand:
//! - Rebuilding a graph from a snapshot while dropping cycle-closing edges
//! - Auditing an edge set for acyclicity

use crate::domain::{DependencyEdge, DependencyKind, TaskId};
use petgraph::algo;
use petgraph::graphmap::DiGraphMap;

/// Directed graph of `BlockedBy` edges.
///
/// Edge direction: subject -> referenced task (the task it waits on).
#[derive(Debug, Clone, Default)]
pub struct EdgeGraph {
    graph: DiGraphMap<TaskId, ()>,
}

impl EdgeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from every `BlockedBy` edge in `edges`, without checks.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a DependencyEdge>) -> Self {
        let mut graph = DiGraphMap::new();
        for edge in edges {
            if edge.kind == DependencyKind::BlockedBy {
                graph.add_edge(edge.task_id, edge.dependent_task_id, ());
            }
        }
        Self { graph }
    }

    /// Whether adding `task -> dependent` would close a cycle.
    ///
    /// True when `dependent` already reaches `task`, or for a self-loop.
    pub fn would_close_cycle(&self, task: TaskId, dependent: TaskId) -> bool {
        if task == dependent {
            return true;
        }
        if !self.graph.contains_node(task) || !self.graph.contains_node(dependent) {
            return false;
        }
        algo::has_path_connecting(&self.graph, dependent, task, None)
    }

    /// Add `task -> dependent` unless it would close a cycle.
    ///
    /// Returns `false` (and leaves the graph unchanged) when rejected.
    pub fn try_add(&mut self, task: TaskId, dependent: TaskId) -> bool {
        if self.would_close_cycle(task, dependent) {
            return false;
        }
        self.graph.add_edge(task, dependent, ());
        true
    }

    /// Whether the graph contains no directed cycle.
    pub fn is_acyclic(&self) -> bool {
        !algo::is_cyclic_directed(&self.graph)
    }

    /// Number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
