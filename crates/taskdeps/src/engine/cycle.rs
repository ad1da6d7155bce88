//! Cycle detection for prospective `BlockedBy` edges.
//!
//! A candidate edge `A blockedBy B` closes a cycle iff `B` already reaches `A`
//! by following `BlockedBy` edges outward (each task to the tasks it waits
//! on). The search is an iterative depth-first traversal with a visited set
//! local to the call, so stored cycles from damaged data still terminate and
//! no node is expanded twice.

use crate::domain::TaskId;
use crate::error::Result;
use crate::storage::DependencyStore;
use std::collections::HashSet;
use std::sync::Arc;

/// Decides whether inserting an edge would make the graph cyclic.
///
/// Reads the persisted edge set through the store and has no side effects.
#[derive(Clone)]
pub struct CycleDetector {
    store: Arc<dyn DependencyStore>,
    max_traversal: usize,
}

impl std::fmt::Debug for CycleDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleDetector")
            .field("store", &"<dyn DependencyStore>")
            .field("max_traversal", &self.max_traversal)
            .finish()
    }
}

impl CycleDetector {
    /// Create a detector that gives up after expanding `max_traversal` nodes.
    pub fn new(store: Arc<dyn DependencyStore>, max_traversal: usize) -> Self {
        Self {
            store,
            max_traversal,
        }
    }

    /// Whether adding `task_id blockedBy dependent_task_id` would create a cycle.
    ///
    /// A self-loop counts as a cycle. The answer is conservative: if the
    /// traversal bound is hit before the search finishes, this returns `true`.
    ///
    /// # Errors
    ///
    /// Propagates store failures; a failed search never reports "no cycle".
    pub async fn would_create_cycle(
        &self,
        task_id: TaskId,
        dependent_task_id: TaskId,
    ) -> Result<bool> {
        if task_id == dependent_task_id {
            return Ok(true);
        }

        let mut stack = vec![dependent_task_id];
        let mut visited = HashSet::from([dependent_task_id]);
        let mut expanded = 0usize;

        while let Some(current) = stack.pop() {
            if expanded >= self.max_traversal {
                tracing::warn!(
                    task_id = %task_id,
                    dependent_task_id = %dependent_task_id,
                    max_traversal = self.max_traversal,
                    "Cycle search hit traversal bound, treating edge as cyclic"
                );
                return Ok(true);
            }
            expanded += 1;

            for edge in self.store.blocking_edges_for(current).await? {
                let next = edge.dependent_task_id;
                if next == task_id {
                    tracing::debug!(
                        task_id = %task_id,
                        dependent_task_id = %dependent_task_id,
                        via = %current,
                        "Candidate edge closes a cycle"
                    );
                    return Ok(true);
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }

        tracing::debug!(
            task_id = %task_id,
            dependent_task_id = %dependent_task_id,
            expanded,
            "No cycle found"
        );
        Ok(false)
    }
}
