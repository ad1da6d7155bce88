//! Readiness evaluation: can a task start, and if not, why not.

use crate::domain::{Blocker, Readiness, TaskId};
use crate::error::Result;
use crate::storage::{DependencyStore, TaskStore};
use std::sync::Arc;

/// Answers readiness questions from the live store.
///
/// Every call re-reads the task's blocking edges and the current status of
/// each referenced task; nothing is cached between calls.
#[derive(Clone)]
pub struct ReadinessEvaluator {
    deps: Arc<dyn DependencyStore>,
    tasks: Arc<dyn TaskStore>,
}

impl std::fmt::Debug for ReadinessEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessEvaluator").finish_non_exhaustive()
    }
}

impl ReadinessEvaluator {
    /// Create an evaluator over the given stores.
    pub fn new(deps: Arc<dyn DependencyStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { deps, tasks }
    }

    /// Evaluate `task_id` in one pass over its `BlockedBy` edges.
    ///
    /// The task's own status is not considered. An edge whose referenced task
    /// no longer exists is skipped rather than treated as a blocker.
    pub async fn evaluate(&self, task_id: TaskId) -> Result<Readiness> {
        let edges = self.deps.blocking_edges_for(task_id).await?;

        let mut blockers = Vec::new();
        for edge in edges {
            let Some(blocking) = self.tasks.get_task(edge.dependent_task_id).await? else {
                tracing::debug!(
                    task_id = %task_id,
                    edge_id = %edge.id,
                    missing = %edge.dependent_task_id,
                    "Skipping edge to missing task"
                );
                continue;
            };

            if !blocking.status.satisfies_blockers() {
                blockers.push(Blocker {
                    edge_id: edge.id,
                    task_id: blocking.id,
                    title: blocking.title,
                    status: blocking.status,
                });
            }
        }

        Ok(Readiness {
            task_id,
            can_start: blockers.is_empty(),
            blockers,
        })
    }

    /// Whether every predecessor of `task_id` is completed.
    pub async fn can_start(&self, task_id: TaskId) -> Result<bool> {
        Ok(self.evaluate(task_id).await?.can_start)
    }

    /// One reason per unsatisfied predecessor, in edge creation order.
    pub async fn blocking_reasons(&self, task_id: TaskId) -> Result<Vec<String>> {
        Ok(self.evaluate(task_id).await?.reasons())
    }
}
