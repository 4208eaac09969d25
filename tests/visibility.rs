//! Tests for the work item visibility contract.
mod common;
use ahash::AHashSet;
use common::*;
use nagare::model::NewWorkItem;
use nagare::prelude::*;
use std::result::Result;
use std::sync::Arc;

fn roles(names: &[&str]) -> AHashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn item(process_id: ProcessId, assignment: Option<Assignment>) -> WorkItem {
    NewWorkItem::new(process_id, "task", assignment).into_work_item(1)
}

#[test]
fn test_three_match_strategies_are_or_combined() {
    let query = VisibilityQuery::new("alice", roles(&["managers", "audit"]));

    assert!(query.matches(&item(1, Some(Assignment::Assignee("alice".into())))));
    assert!(query.matches(&item(1, Some(Assignment::Group("managers".into())))));
    assert!(query.matches(&item(1, Some(Assignment::Permission("audit".into())))));

    assert!(!query.matches(&item(1, Some(Assignment::Assignee("bob".into())))));
    assert!(!query.matches(&item(1, Some(Assignment::Group("sales".into())))));
    assert!(!query.matches(&item(1, None)));
}

#[test]
fn test_completed_and_foreign_process_items_are_hidden() {
    let query = VisibilityQuery::new("alice", roles(&[])).in_process(Some(2));

    let mut own = item(2, Some(Assignment::Assignee("alice".into())));
    assert!(query.matches(&own));
    assert!(!query.matches(&item(3, Some(Assignment::Assignee("alice".into())))));

    own.complete("alice", chrono::Utc::now());
    assert!(!query.matches(&own));
}

#[test]
fn test_role_names_do_not_match_assignee() {
    // A role named like the actor must not make user-addressed items visible.
    let query = VisibilityQuery::new("carol", roles(&["alice"]));
    assert!(!query.matches(&item(1, Some(Assignment::Assignee("alice".into())))));
}

#[test]
fn test_engine_lists_items_by_role() {
    let (_store, engine) = create_engine(ConditionValue::Bool(true));
    let started = engine.start_instance(EXCLUSIVE, "alice").unwrap();
    engine
        .complete_task(started.work_item.unwrap().id, "alice", None)
        .unwrap();

    let bob = engine.list_visible_work_items("bob", None).unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].node_code, "approve");
    assert_eq!(bob[0].group.as_deref(), Some("managers"));

    assert!(engine.list_visible_work_items("alice", None).unwrap().is_empty());
    assert!(engine.list_visible_work_items("carol", None).unwrap().is_empty());
}

#[test]
fn test_permission_addressed_items_reach_role_holders() {
    let definition = FlowDefinition::new(
        4,
        vec![
            NodeRecord::new("start", "start", &["audit"]),
            NodeRecord::new("audit", "task", &[]).assigned("permission", "audit"),
        ],
    );
    let store = Arc::new(MemoryStore::new().with_definition(definition));
    let engine = Engine::builder(store, Arc::new(create_roles())).build();

    let started = engine.start_instance(4, "alice").unwrap();
    assert!(started.work_item.is_none());

    let carol = engine
        .list_visible_work_items("carol", Some(started.process.id))
        .unwrap();
    assert_eq!(carol.len(), 1);
    assert_eq!(carol[0].permission.as_deref(), Some("audit"));
}

#[test]
fn test_listing_is_idempotent_and_filters_by_process() {
    let (store, engine) = create_engine(ConditionValue::Bool(true));
    let first = engine.start_instance(PARALLEL, "alice").unwrap().process.id;
    let second = engine.start_instance(SEQUENTIAL, "alice").unwrap().process.id;
    let before = store.snapshot().unwrap();

    let all = engine.list_visible_work_items("alice", None).unwrap();
    assert_eq!(all, engine.list_visible_work_items("alice", None).unwrap());
    assert_eq!(all.len(), 2);
    assert_eq!(store.snapshot().unwrap(), before);

    let only_second = engine.list_visible_work_items("alice", Some(second)).unwrap();
    assert_eq!(only_second.len(), 1);
    assert_eq!(only_second[0].node_code, "a");

    let only_first = engine.list_visible_work_items("alice", Some(first)).unwrap();
    assert_eq!(only_first[0].node_code, "x");
}

/// A role directory that is unreachable.
struct OfflineRoles;

impl RoleLookup for OfflineRoles {
    fn roles_of(&self, _actor_id: &str) -> Result<AHashSet<String>, StoreError> {
        Err(StoreError::Persistence("role directory unreachable".to_string()))
    }
}

#[test]
fn test_role_lookup_failure_is_propagated() {
    let engine = Engine::builder(create_store(), Arc::new(OfflineRoles)).build();

    assert_eq!(
        engine.list_visible_work_items("alice", None).unwrap_err(),
        EngineError::Store(StoreError::Persistence(
            "role directory unreachable".to_string()
        ))
    );
}
