//! The validated entry point for dependency mutations and queries.
//!
//! [`DependencyService`] is the only component that writes edges through the
//! engine. Creation runs its checks and the insert under one global async
//! lock, so two concurrent creations can never both pass the cycle check
//! against the same stale graph. Reads bypass the lock and run in parallel.
//!
//! Every operation, including the wait for the lock, is bounded by the
//! configured operation timeout and fails with [`Error::Cancelled`] instead
//! of hanging.

use super::{with_deadline, CycleDetector, ReadinessEvaluator};
use crate::config::EngineConfig;
use crate::domain::{
    DependencyEdge, DependencyId, DependencyKind, DependencyView, NewDependency, Readiness,
    TaskId, TaskRecord, TaskWithDependencies, UserId,
};
use crate::error::{Error, Result, ValidationError};
use crate::storage::{DependencyStore, Store, TaskStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Dependency graph operations with invariant enforcement.
pub struct DependencyService {
    deps: Arc<dyn DependencyStore>,
    tasks: Arc<dyn TaskStore>,
    cycles: CycleDetector,
    readiness: ReadinessEvaluator,
    write_lock: Mutex<()>,
    timeout: Duration,
}

impl std::fmt::Debug for DependencyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyService")
            .field("cycles", &self.cycles)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl DependencyService {
    /// Create a service over separate edge and task stores.
    pub fn new(
        deps: Arc<dyn DependencyStore>,
        tasks: Arc<dyn TaskStore>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            cycles: CycleDetector::new(deps.clone(), config.max_traversal),
            readiness: ReadinessEvaluator::new(deps.clone(), tasks.clone()),
            deps,
            tasks,
            write_lock: Mutex::new(()),
            timeout: config.operation_timeout(),
        }
    }

    /// Create a service over a combined store.
    pub fn from_store(store: Arc<dyn Store>, config: &EngineConfig) -> Self {
        Self::new(store.clone(), store, config)
    }

    /// Create an edge after validating it.
    ///
    /// Checks run in this order, all under the write lock:
    /// 1. Both tasks exist
    /// 2. The edge is not a self-dependency
    /// 3. No identical edge exists
    /// 4. For `BlockedBy`, the edge does not close a cycle
    ///
    /// # Errors
    ///
    /// - `Error::TaskNotFound` if either task is missing
    /// - `Error::Validation` naming the violated rule
    /// - `Error::Storage` if the store fails (nothing is written)
    /// - `Error::Cancelled` if the operation exceeds its deadline
    pub async fn create_dependency(
        &self,
        task_id: TaskId,
        dependent_task_id: TaskId,
        kind: DependencyKind,
        created_by: UserId,
    ) -> Result<DependencyEdge> {
        with_deadline(self.timeout, "create_dependency", async {
            let _guard = self.write_lock.lock().await;

            self.require_task(task_id).await?;
            self.require_task(dependent_task_id).await?;

            if task_id == dependent_task_id {
                return Err(ValidationError::SelfDependency { task_id }.into());
            }

            if self
                .deps
                .edge_exists(task_id, dependent_task_id, kind)
                .await?
            {
                return Err(ValidationError::Duplicate {
                    task_id,
                    dependent_task_id,
                }
                .into());
            }

            if matches!(kind, DependencyKind::BlockedBy)
                && self
                    .cycles
                    .would_create_cycle(task_id, dependent_task_id)
                    .await?
            {
                tracing::warn!(
                    task_id = %task_id,
                    dependent_task_id = %dependent_task_id,
                    "Rejected dependency that would create a cycle"
                );
                return Err(ValidationError::Cycle {
                    task_id,
                    dependent_task_id,
                }
                .into());
            }

            let edge = self
                .deps
                .insert(NewDependency {
                    task_id,
                    dependent_task_id,
                    kind,
                    created_by,
                })
                .await?;

            tracing::info!(
                edge_id = %edge.id,
                task_id = %task_id,
                dependent_task_id = %dependent_task_id,
                created_by = %edge.created_by,
                "Created dependency"
            );
            Ok(edge)
        })
        .await
    }

    /// Delete an edge by id, returning the removed edge.
    ///
    /// # Errors
    ///
    /// Returns `Error::DependencyNotFound` if no such edge exists.
    pub async fn delete_dependency(&self, id: DependencyId) -> Result<DependencyEdge> {
        with_deadline(self.timeout, "delete_dependency", async {
            let _guard = self.write_lock.lock().await;

            let edge = self
                .deps
                .get_edge(id)
                .await?
                .ok_or(Error::DependencyNotFound(id))?;

            if !self.deps.delete_by_id(id).await? {
                return Err(Error::DependencyNotFound(id));
            }

            tracing::info!(edge_id = %id, task_id = %edge.task_id, "Deleted dependency");
            Ok(edge)
        })
        .await
    }

    /// Every edge touching `task_id`, rendered relative to that task.
    pub async fn list_dependencies(&self, task_id: TaskId) -> Result<Vec<DependencyView>> {
        with_deadline(self.timeout, "list_dependencies", async {
            self.require_task(task_id).await?;
            let edges = self.deps.edges_touching(task_id).await?;
            self.render(&edges, task_id).await
        })
        .await
    }

    /// Whether every predecessor of `task_id` is completed.
    pub async fn can_task_start(&self, task_id: TaskId) -> Result<bool> {
        Ok(self.readiness(task_id).await?.can_start)
    }

    /// Why `task_id` cannot start. Empty iff [`Self::can_task_start`] is true.
    pub async fn blocking_reasons(&self, task_id: TaskId) -> Result<Vec<String>> {
        Ok(self.readiness(task_id).await?.reasons())
    }

    /// Full readiness record for `task_id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task doesn't exist.
    pub async fn readiness(&self, task_id: TaskId) -> Result<Readiness> {
        with_deadline(self.timeout, "readiness", async {
            self.require_task(task_id).await?;
            self.readiness.evaluate(task_id).await
        })
        .await
    }

    /// The task with its predecessors, successors and readiness.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task doesn't exist.
    pub async fn get_task_with_dependencies(
        &self,
        task_id: TaskId,
    ) -> Result<TaskWithDependencies> {
        with_deadline(self.timeout, "get_task_with_dependencies", async {
            let task = self.require_task(task_id).await?;

            let blocking = self.deps.blocking_edges_for(task_id).await?;
            let blocked = self.deps.blocked_edges_by(task_id).await?;
            let blocked_by = self.render(&blocking, task_id).await?;
            let blocks = self.render(&blocked, task_id).await?;

            let readiness = self.readiness.evaluate(task_id).await?;
            let blocking_reasons = readiness.reasons();

            Ok(TaskWithDependencies {
                task,
                blocked_by,
                blocks,
                can_start: readiness.can_start,
                blocking_reasons,
            })
        })
        .await
    }

    async fn require_task(&self, task_id: TaskId) -> Result<TaskRecord> {
        self.tasks
            .get_task(task_id)
            .await?
            .ok_or(Error::TaskNotFound(task_id))
    }

    async fn render(
        &self,
        edges: &[DependencyEdge],
        viewed: TaskId,
    ) -> Result<Vec<DependencyView>> {
        let mut views = Vec::with_capacity(edges.len());
        for edge in edges {
            let other_id = if edge.task_id == viewed {
                edge.dependent_task_id
            } else {
                edge.task_id
            };
            let other = self.tasks.get_task(other_id).await?;
            views.push(DependencyView::from_edge(edge, viewed, other.as_ref()));
        }
        Ok(views)
    }
}
