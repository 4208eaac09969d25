//! Tests for the in-memory store and its snapshots.
mod common;
use common::*;
use nagare::model::{NewProcessInstance, NewWorkItem};
use nagare::prelude::*;

#[test]
fn test_ids_are_sequential() {
    let store = MemoryStore::new();
    let p1 = store
        .create_process_instance(NewProcessInstance::new(1, "alice"))
        .unwrap();
    let p2 = store
        .create_process_instance(NewProcessInstance::new(1, "alice"))
        .unwrap();
    assert_eq!((p1.id, p2.id), (1, 2));

    let item = store
        .create_work_item(NewWorkItem::new(p2.id, "a", None))
        .unwrap();
    assert_eq!(item.id, 1);
    assert_eq!(store.find_work_item(1).unwrap(), Some(item));
    assert_eq!(store.find_work_item(2).unwrap(), None);
}

#[test]
fn test_saving_unknown_rows_fails() {
    let store = MemoryStore::new();
    let ghost = NewProcessInstance::new(1, "alice").into_instance(99);
    assert_eq!(
        store.save_process_instance(&ghost).unwrap_err(),
        StoreError::NotFound {
            entity: "Process instance",
            id: 99,
        }
    );
}

#[test]
fn test_count_completed_only_counts_listed_nodes_of_the_process() {
    let store = MemoryStore::new();
    for (process_id, code, done) in [(1, "x", true), (1, "y", false), (1, "z", true), (2, "x", true)]
    {
        let mut item = store
            .create_work_item(NewWorkItem::new(process_id, code, None))
            .unwrap();
        if done {
            item.complete("alice", chrono::Utc::now());
            store.save_work_item(&item).unwrap();
        }
    }

    let join = vec!["x".to_string(), "y".to_string()];
    assert_eq!(store.count_completed_work_items(&join, 1).unwrap(), 1);
    assert_eq!(store.count_completed_work_items(&join, 2).unwrap(), 1);
    assert_eq!(store.count_completed_work_items(&[], 1).unwrap(), 0);
}

#[test]
fn test_snapshot_restores_runtime_state() {
    let (store, engine) = create_engine(ConditionValue::Bool(true));
    let started = engine.start_instance(SEQUENTIAL, "alice").unwrap();
    engine
        .complete_task(started.work_item.unwrap().id, "alice", Some("R-7"))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.bin");
    let path = path.to_str().unwrap();
    store.save_snapshot(path).unwrap();

    let restored = MemoryStore::new().with_definition(create_sequential_flow());
    restored.restore_from_file(path).unwrap();

    let pid = started.process.id;
    assert_eq!(
        restored.find_process_instance(pid).unwrap(),
        store.find_process_instance(pid).unwrap()
    );
    assert_eq!(restored.work_items_of(pid), store.work_items_of(pid));

    // New rows continue after the restored ids.
    let next = restored
        .create_work_item(NewWorkItem::new(pid, "c", None))
        .unwrap();
    assert_eq!(next.id, 3);
}

#[test]
fn test_corrupt_snapshot_is_rejected() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.restore(&[0xff, 0xff, 0xff]).unwrap_err(),
        StoreError::Snapshot(_)
    ));
    assert!(matches!(
        store.restore_from_file("/nonexistent/state.bin").unwrap_err(),
        StoreError::Snapshot(msg) if msg.contains("Could not open")
    ));
}
