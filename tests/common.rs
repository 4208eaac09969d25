//! Common test utilities for building flow definitions and engines.
use nagare::error::StoreError;
use nagare::model::{NewProcessInstance, NewWorkItem};
use nagare::prelude::*;
use std::result::Result;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[allow(dead_code)]
pub const SEQUENTIAL: DefinitionId = 1;
#[allow(dead_code)]
pub const EXCLUSIVE: DefinitionId = 2;
#[allow(dead_code)]
pub const PARALLEL: DefinitionId = 3;

/// `start -> a -> b -> c`, every task assigned to alice.
#[allow(dead_code)]
pub fn create_sequential_flow() -> FlowDefinition {
    FlowDefinition::new(
        SEQUENTIAL,
        vec![
            NodeRecord::new("start", "start", &["a"]),
            NodeRecord::new("a", "task", &["b"])
                .named("Draft")
                .assigned("assignee", "alice"),
            NodeRecord::new("b", "task", &["c"])
                .named("Review")
                .assigned("assignee", "alice"),
            NodeRecord::new("c", "task", &[])
                .named("Publish")
                .assigned("assignee", "alice"),
        ],
    )
    .with_name("Sequential")
}

/// `start -> submit -> review?(approved)`, then `approve` (true, managers) or `reject` (false, alice).
#[allow(dead_code)]
pub fn create_exclusive_flow() -> FlowDefinition {
    FlowDefinition::new(
        EXCLUSIVE,
        vec![
            NodeRecord::new("start", "start", &["submit"]),
            NodeRecord::new("submit", "task", &["review"]).assigned("assignee", "alice"),
            NodeRecord::new("review", "exclusive", &["approve", "reject"])
                .with_condition("approved"),
            NodeRecord::new("approve", "task", &[])
                .assigned("group", "managers")
                .on_result(json!(true)),
            NodeRecord::new("reject", "task", &[])
                .assigned("assignee", "alice")
                .on_result(json!(false)),
        ],
    )
}

/// `start -> split -> {x, y} -> join -> done`. x is alice's, y is bob's.
#[allow(dead_code)]
pub fn create_parallel_flow() -> FlowDefinition {
    FlowDefinition::new(
        PARALLEL,
        vec![
            NodeRecord::new("start", "start", &["split"]),
            NodeRecord::new("split", "parallel", &["x", "y"]),
            NodeRecord::new("x", "task", &["join"]).assigned("assignee", "alice"),
            NodeRecord::new("y", "task", &["join"]).assigned("assignee", "bob"),
            NodeRecord::new("join", "parallel", &["done"]).after(&["x", "y"]),
            NodeRecord::new("done", "task", &[]).assigned("assignee", "alice"),
        ],
    )
}

/// bob is a manager, carol holds the audit permission.
#[allow(dead_code)]
pub fn create_roles() -> StaticRoles {
    StaticRoles::new()
        .with_role("bob", "managers")
        .with_role("carol", "audit")
}

#[allow(dead_code)]
pub fn create_store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::new()
            .with_definition(create_sequential_flow())
            .with_definition(create_exclusive_flow())
            .with_definition(create_parallel_flow()),
    )
}

/// An engine over all fixture flows whose `approved` condition yields `approved`.
#[allow(dead_code)]
pub fn create_engine(approved: ConditionValue) -> (Arc<MemoryStore>, Engine) {
    let store = create_store();
    let engine = Engine::builder(store.clone(), Arc::new(create_roles()))
        .with_condition_fn("approved", move |_| approved.clone())
        .build();
    (store, engine)
}

/// Work items of `process_id` created for `node_code`.
#[allow(dead_code)]
pub fn items_for(store: &MemoryStore, process_id: ProcessId, node_code: &str) -> Vec<WorkItem> {
    store
        .work_items_of(process_id)
        .into_iter()
        .filter(|item| item.node_code == node_code)
        .collect()
}

/// A store whose saves can be made to fail on demand.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_work_item_saves: AtomicBool,
    pub fail_process_saves: AtomicBool,
}

#[allow(dead_code)]
impl FailingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Persistence(format!("{} table is read-only", what)))
        } else {
            Ok(())
        }
    }
}

impl WorkflowStore for FailingStore {
    fn load_definition(&self, id: DefinitionId) -> Result<FlowDefinition, StoreError> {
        self.inner.load_definition(id)
    }

    fn create_process_instance(
        &self,
        process: NewProcessInstance,
    ) -> Result<ProcessInstance, StoreError> {
        self.inner.create_process_instance(process)
    }

    fn save_process_instance(&self, process: &ProcessInstance) -> Result<(), StoreError> {
        Self::check(&self.fail_process_saves, "process")?;
        self.inner.save_process_instance(process)
    }

    fn find_process_instance(
        &self,
        id: ProcessId,
    ) -> Result<Option<ProcessInstance>, StoreError> {
        self.inner.find_process_instance(id)
    }

    fn create_work_item(&self, work_item: NewWorkItem) -> Result<WorkItem, StoreError> {
        self.inner.create_work_item(work_item)
    }

    fn save_work_item(&self, work_item: &WorkItem) -> Result<(), StoreError> {
        Self::check(&self.fail_work_item_saves, "work item")?;
        self.inner.save_work_item(work_item)
    }

    fn find_work_item(&self, id: WorkItemId) -> Result<Option<WorkItem>, StoreError> {
        self.inner.find_work_item(id)
    }

    fn count_completed_work_items(
        &self,
        node_codes: &[String],
        process_id: ProcessId,
    ) -> Result<usize, StoreError> {
        self.inner.count_completed_work_items(node_codes, process_id)
    }

    fn query_visible_work_items(
        &self,
        query: &VisibilityQuery,
    ) -> Result<Vec<WorkItem>, StoreError> {
        self.inner.query_visible_work_items(query)
    }
}
