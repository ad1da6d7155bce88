//! Store trait implementations for the in-memory backend.

use super::InMemoryStore;
use crate::domain::{
    DependencyEdge, DependencyId, DependencyKind, NewDependency, TaskId, TaskRecord, TaskStatus,
};
use crate::error::{Error, Result};
use crate::storage::{DependencyStore, IdCounters, Store, TaskStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;

#[async_trait]
impl DependencyStore for InMemoryStore {
    async fn edges_touching(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        let inner = self.read().await;

        // Union of both directions, in id order
        let ids: BTreeSet<DependencyId> = inner
            .outgoing
            .get(&task_id)
            .into_iter()
            .chain(inner.incoming.get(&task_id))
            .flatten()
            .copied()
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| inner.edges.get(id))
            .cloned()
            .collect())
    }

    async fn blocking_edges_for(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        let inner = self.read().await;
        Ok(inner
            .outgoing
            .get(&task_id)
            .map(|ids| inner.blocked_by_edges(ids))
            .unwrap_or_default())
    }

    async fn blocked_edges_by(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        let inner = self.read().await;
        Ok(inner
            .incoming
            .get(&task_id)
            .map(|ids| inner.blocked_by_edges(ids))
            .unwrap_or_default())
    }

    async fn insert(&self, edge: NewDependency) -> Result<DependencyEdge> {
        let mut inner = self.write().await;
        inner.add_edge(edge, Utc::now())
    }

    async fn delete_by_id(&self, id: DependencyId) -> Result<bool> {
        let mut inner = self.write().await;
        Ok(inner.remove_edge(id).is_some())
    }

    async fn edge_exists(
        &self,
        task_id: TaskId,
        dependent_task_id: TaskId,
        kind: DependencyKind,
    ) -> Result<bool> {
        let inner = self.read().await;
        Ok(inner.find_edge(task_id, dependent_task_id, kind).is_some())
    }

    async fn get_edge(&self, id: DependencyId) -> Result<Option<DependencyEdge>> {
        let inner = self.read().await;
        Ok(inner.edges.get(&id).cloned())
    }

    async fn all_edges(&self) -> Result<Vec<DependencyEdge>> {
        let inner = self.read().await;
        Ok(inner.edges.values().cloned().collect())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn get_task(&self, id: TaskId) -> Result<Option<TaskRecord>> {
        let inner = self.read().await;
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn create_task(&self, title: String) -> Result<TaskRecord> {
        let mut inner = self.write().await;
        Ok(inner.add_task(title))
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<TaskRecord> {
        let mut inner = self.write().await;

        let task = inner.tasks.get_mut(&id).ok_or(Error::TaskNotFound(id))?;
        task.status = status;

        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool> {
        let mut inner = self.write().await;

        match inner.remove_task(id) {
            Some(removed_edges) => {
                tracing::debug!(task_id = %id, removed_edges, "Deleted task and its edges");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        let inner = self.read().await;
        Ok(inner.tasks.values().cloned().collect())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save(&self) -> Result<()> {
        // Nothing to flush; the JSONL backend wraps this store to persist
        Ok(())
    }

    async fn id_counters(&self) -> Result<IdCounters> {
        Ok(self.read().await.counters())
    }
}
