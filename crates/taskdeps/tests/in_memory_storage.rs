//! Integration tests for in-memory storage.
//!
//! These tests exercise the store traits directly: task CRUD, raw edge
//! inserts, directional lookups, ordering, the uniqueness constraint and the
//! task delete cascade. Validation lives in the engine and is not tested here.

use rstest::rstest;
use std::sync::Arc;
use taskdeps::domain::{DependencyId, DependencyKind, NewDependency, TaskId, TaskStatus, UserId};
use taskdeps::error::{Error, StorageError};
use taskdeps::storage::in_memory::new_in_memory_store;
use taskdeps::storage::{create_store, DependencyStore, Store, StorageBackend, TaskStore};

fn blocked_by(task: TaskId, on: TaskId) -> NewDependency {
    NewDependency {
        task_id: task,
        dependent_task_id: on,
        kind: DependencyKind::BlockedBy,
        created_by: UserId::new("tester"),
    }
}

async fn store_with_tasks(count: usize) -> (Arc<dyn Store>, Vec<TaskId>) {
    let store = new_in_memory_store();
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        ids.push(store.create_task(format!("Task {i}")).await.unwrap().id);
    }
    (store, ids)
}

fn ids_of(edges: &[taskdeps::domain::DependencyEdge]) -> Vec<DependencyId> {
    edges.iter().map(|e| e.id).collect()
}

// ========== Task Table Tests ==========

#[tokio::test]
async fn test_create_task_assigns_sequential_ids() {
    let store = new_in_memory_store();

    let first = store.create_task("First".to_string()).await.unwrap();
    let second = store.create_task("Second".to_string()).await.unwrap();

    assert_eq!(first.id, TaskId(1));
    assert_eq!(second.id, TaskId(2));
    assert_eq!(first.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_get_task_missing_returns_none() {
    let store = new_in_memory_store();
    assert!(store.get_task(TaskId(5)).await.unwrap().is_none());
}

#[rstest]
#[case::in_progress(TaskStatus::InProgress)]
#[case::completed(TaskStatus::Completed)]
#[case::cancelled(TaskStatus::Cancelled)]
#[tokio::test]
async fn test_set_status(#[case] status: TaskStatus) {
    let (store, ids) = store_with_tasks(1).await;

    let updated = store.set_status(ids[0], status).await.unwrap();

    assert_eq!(updated.status, status);
    assert_eq!(store.get_task(ids[0]).await.unwrap().unwrap().status, status);
}

#[tokio::test]
async fn test_set_status_unknown_task() {
    let store = new_in_memory_store();

    let result = store.set_status(TaskId(3), TaskStatus::Completed).await;

    assert!(matches!(result, Err(Error::TaskNotFound(TaskId(3)))));
}

#[tokio::test]
async fn test_list_tasks_ordered_by_id() {
    let (store, ids) = store_with_tasks(4).await;

    let listed: Vec<TaskId> = store
        .list_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();

    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_delete_task_missing_returns_false() {
    let store = new_in_memory_store();
    assert!(!store.delete_task(TaskId(1)).await.unwrap());
}

// ========== Edge Table Tests ==========

#[tokio::test]
async fn test_insert_assigns_id_and_timestamp() {
    let (store, ids) = store_with_tasks(2).await;
    let before = chrono::Utc::now();

    let edge = store.insert(blocked_by(ids[0], ids[1])).await.unwrap();

    assert_eq!(edge.id, DependencyId(1));
    assert_eq!(edge.task_id, ids[0]);
    assert_eq!(edge.dependent_task_id, ids[1]);
    assert_eq!(edge.created_by.as_str(), "tester");
    assert!(edge.created_at >= before);
    assert_eq!(store.get_edge(edge.id).await.unwrap(), Some(edge));
}

#[tokio::test]
async fn test_insert_duplicate_violates_constraint() {
    let (store, ids) = store_with_tasks(2).await;
    store.insert(blocked_by(ids[0], ids[1])).await.unwrap();

    let result = store.insert(blocked_by(ids[0], ids[1])).await;

    assert!(matches!(
        result,
        Err(Error::Storage(StorageError::Constraint(_)))
    ));
    assert_eq!(store.all_edges().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reverse_edge_is_not_a_duplicate() {
    let (store, ids) = store_with_tasks(2).await;
    store.insert(blocked_by(ids[0], ids[1])).await.unwrap();

    // The store does not check for cycles; only the engine does
    store.insert(blocked_by(ids[1], ids[0])).await.unwrap();

    assert_eq!(store.all_edges().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_edge_exists() {
    let (store, ids) = store_with_tasks(2).await;
    store.insert(blocked_by(ids[0], ids[1])).await.unwrap();

    assert!(store
        .edge_exists(ids[0], ids[1], DependencyKind::BlockedBy)
        .await
        .unwrap());
    assert!(!store
        .edge_exists(ids[1], ids[0], DependencyKind::BlockedBy)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_directional_lookups() {
    // 1 waits on 2 and 3; 4 waits on 1
    let (store, ids) = store_with_tasks(4).await;
    let e1 = store.insert(blocked_by(ids[0], ids[1])).await.unwrap();
    let e2 = store.insert(blocked_by(ids[0], ids[2])).await.unwrap();
    let e3 = store.insert(blocked_by(ids[3], ids[0])).await.unwrap();

    let blocking = store.blocking_edges_for(ids[0]).await.unwrap();
    assert_eq!(ids_of(&blocking), vec![e1.id, e2.id]);

    let blocked = store.blocked_edges_by(ids[0]).await.unwrap();
    assert_eq!(ids_of(&blocked), vec![e3.id]);

    let touching = store.edges_touching(ids[0]).await.unwrap();
    assert_eq!(ids_of(&touching), vec![e1.id, e2.id, e3.id]);

    assert!(store.blocking_edges_for(ids[1]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edges_touching_in_creation_order() {
    let (store, ids) = store_with_tasks(4).await;
    // Interleave directions so id order differs from per-direction grouping
    let a = store.insert(blocked_by(ids[1], ids[0])).await.unwrap();
    let b = store.insert(blocked_by(ids[0], ids[2])).await.unwrap();
    let c = store.insert(blocked_by(ids[3], ids[0])).await.unwrap();

    let touching = store.edges_touching(ids[0]).await.unwrap();

    assert_eq!(ids_of(&touching), vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn test_unknown_task_has_no_edges() {
    let store = new_in_memory_store();

    assert!(store.edges_touching(TaskId(8)).await.unwrap().is_empty());
    assert!(store.blocking_edges_for(TaskId(8)).await.unwrap().is_empty());
    assert!(store.blocked_edges_by(TaskId(8)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_by_id() {
    let (store, ids) = store_with_tasks(2).await;
    let edge = store.insert(blocked_by(ids[0], ids[1])).await.unwrap();

    assert!(store.delete_by_id(edge.id).await.unwrap());
    assert!(!store.delete_by_id(edge.id).await.unwrap());

    assert!(store.get_edge(edge.id).await.unwrap().is_none());
    assert!(store.blocking_edges_for(ids[0]).await.unwrap().is_empty());
    assert!(store.blocked_edges_by(ids[1]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edge_ids_not_reused_after_delete() {
    let (store, ids) = store_with_tasks(3).await;
    let first = store.insert(blocked_by(ids[0], ids[1])).await.unwrap();
    store.delete_by_id(first.id).await.unwrap();

    let second = store.insert(blocked_by(ids[0], ids[2])).await.unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_deleted_ids_stay_retired_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.jsonl");

    {
        let store = create_store(StorageBackend::Jsonl(path.clone())).await.unwrap();
        let a = store.create_task("A".to_string()).await.unwrap();
        let b = store.create_task("B".to_string()).await.unwrap();
        let c = store.create_task("C".to_string()).await.unwrap();
        store.insert(blocked_by(a.id, b.id)).await.unwrap();
        let newest = store.insert(blocked_by(a.id, c.id)).await.unwrap();

        // Remove the highest task and edge ids before saving
        assert!(store.delete_by_id(newest.id).await.unwrap());
        assert!(store.delete_task(c.id).await.unwrap());
        store.save().await.unwrap();
    }

    let store = create_store(StorageBackend::Jsonl(path)).await.unwrap();
    let d = store.create_task("D".to_string()).await.unwrap();
    let edge = store.insert(blocked_by(TaskId(2), d.id)).await.unwrap();

    assert_eq!(d.id, TaskId(4), "task id reused after reload");
    assert_eq!(edge.id, DependencyId(3), "edge id reused after reload");
}

// ========== Cascade Tests ==========

#[tokio::test]
async fn test_delete_task_cascades_both_directions() {
    let (store, ids) = store_with_tasks(3).await;
    store.insert(blocked_by(ids[0], ids[1])).await.unwrap();
    store.insert(blocked_by(ids[1], ids[2])).await.unwrap();
    let kept = store.insert(blocked_by(ids[0], ids[2])).await.unwrap();

    assert!(store.delete_task(ids[1]).await.unwrap());

    assert_eq!(ids_of(&store.all_edges().await.unwrap()), vec![kept.id]);
    assert!(store.edges_touching(ids[1]).await.unwrap().is_empty());
    assert_eq!(store.list_tasks().await.unwrap().len(), 2);
}

// ========== Backend Factory Tests ==========

#[tokio::test]
async fn test_create_store_in_memory() {
    let store = create_store(StorageBackend::InMemory).await.unwrap();
    store.create_task("Ephemeral".to_string()).await.unwrap();

    // In-memory save is a no-op and must not fail
    store.save().await.unwrap();
}

#[tokio::test]
async fn test_create_store_jsonl_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.jsonl");

    {
        let store = create_store(StorageBackend::Jsonl(path.clone())).await.unwrap();
        let a = store.create_task("A".to_string()).await.unwrap();
        let b = store.create_task("B".to_string()).await.unwrap();
        store.insert(blocked_by(a.id, b.id)).await.unwrap();
        store.set_status(b.id, TaskStatus::Completed).await.unwrap();
        store.save().await.unwrap();
    }

    let store = create_store(StorageBackend::Jsonl(path)).await.unwrap();
    let tasks = store.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].status, TaskStatus::Completed);

    let edges = store.all_edges().await.unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].created_by.as_str(), "tester");

    // Counters continue past restored ids
    let c = store.create_task("C".to_string()).await.unwrap();
    assert_eq!(c.id, TaskId(3));
    let edge = store.insert(blocked_by(c.id, TaskId(1))).await.unwrap();
    assert_eq!(edge.id, DependencyId(2));
}

#[tokio::test]
async fn test_concurrent_reads() {
    let (store, ids) = store_with_tasks(10).await;
    for pair in ids.windows(2) {
        store.insert(blocked_by(pair[1], pair[0])).await.unwrap();
    }

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let store = store.clone();
            tokio::spawn(async move { store.edges_touching(id).await.unwrap().len() })
        })
        .collect();

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap();
    }

    // Every edge is seen from both ends
    assert_eq!(total, 2 * (ids.len() - 1));
}
