use crate::definition::FlowDefinition;
use crate::error::StoreError;
use crate::model::{
    DefinitionId, NewProcessInstance, NewWorkItem, ProcessId, ProcessInstance, WorkItem,
    WorkItemId,
};

mod memory;
mod query;

pub use memory::MemoryStore;
pub use query::VisibilityQuery;

/// The persistence boundary of the engine.
///
/// Implementations own id assignment and storage. Every method is a plain
/// synchronous request/response; the engine serializes completions per process
/// instance itself, so a store only has to make each individual call atomic.
pub trait WorkflowStore: Send + Sync {
    fn load_definition(&self, id: DefinitionId) -> Result<FlowDefinition, StoreError>;

    fn create_process_instance(
        &self,
        process: NewProcessInstance,
    ) -> Result<ProcessInstance, StoreError>;

    fn save_process_instance(&self, process: &ProcessInstance) -> Result<(), StoreError>;

    fn find_process_instance(&self, id: ProcessId)
    -> Result<Option<ProcessInstance>, StoreError>;

    fn create_work_item(&self, work_item: NewWorkItem) -> Result<WorkItem, StoreError>;

    fn save_work_item(&self, work_item: &WorkItem) -> Result<(), StoreError>;

    fn find_work_item(&self, id: WorkItemId) -> Result<Option<WorkItem>, StoreError>;

    /// Counts completed work items of `process_id` whose node code is one of `node_codes`.
    fn count_completed_work_items(
        &self,
        node_codes: &[String],
        process_id: ProcessId,
    ) -> Result<usize, StoreError>;

    /// Returns the work items selected by `query`, ordered by id.
    fn query_visible_work_items(&self, query: &VisibilityQuery)
    -> Result<Vec<WorkItem>, StoreError>;
}
