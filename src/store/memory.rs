use super::{VisibilityQuery, WorkflowStore};
use crate::definition::FlowDefinition;
use crate::error::StoreError;
use crate::model::{
    DefinitionId, NewProcessInstance, NewWorkItem, ProcessId, ProcessInstance, WorkItem,
    WorkItemId,
};
use ahash::AHashMap;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};

/// Runtime state of the store. This is what snapshots persist.
#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryState {
    last_process_id: ProcessId,
    last_work_item_id: WorkItemId,
    processes: BTreeMap<ProcessId, ProcessInstance>,
    work_items: BTreeMap<WorkItemId, WorkItem>,
}

/// A thread-safe, in-process `WorkflowStore`.
///
/// Ids are assigned sequentially starting at 1. Definitions are registered up
/// front with `insert_definition`; instance and work item state can be written
/// to and restored from a bincode snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    definitions: RwLock<AHashMap<DefinitionId, FlowDefinition>>,
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition(self, definition: FlowDefinition) -> Self {
        self.insert_definition(definition);
        self
    }

    pub fn insert_definition(&self, definition: FlowDefinition) {
        self.definitions.write().insert(definition.id, definition);
    }

    /// All work items of a process instance, completed or not, ordered by id.
    pub fn work_items_of(&self, process_id: ProcessId) -> Vec<WorkItem> {
        self.state
            .read()
            .work_items
            .values()
            .filter(|item| item.process_id == process_id)
            .cloned()
            .collect()
    }

    pub fn process_count(&self) -> usize {
        self.state.read().processes.len()
    }

    /// Serializes instance and work item state using the bincode format.
    pub fn snapshot(&self) -> Result<Vec<u8>, StoreError> {
        encode_to_vec(&*self.state.read(), standard())
            .map_err(|e| StoreError::Snapshot(format!("Serialization failed: {}", e)))
    }

    /// Saves a snapshot of the runtime state to a file.
    pub fn save_snapshot(&self, path: &str) -> Result<(), StoreError> {
        let bytes = self.snapshot()?;
        let mut file = fs::File::create(path).map_err(|e| {
            StoreError::Snapshot(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            StoreError::Snapshot(format!("Could not write to file '{}': {}", path, e))
        })?;
        Ok(())
    }

    /// Replaces the runtime state with a previously saved snapshot. Definitions are kept.
    pub fn restore(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let (state, _) = decode_from_slice::<MemoryState, _>(bytes, standard())
            .map_err(|e| StoreError::Snapshot(format!("Deserialization failed: {}", e)))?;
        *self.state.write() = state;
        Ok(())
    }

    /// Restores the runtime state from a snapshot file.
    pub fn restore_from_file(&self, path: &str) -> Result<(), StoreError> {
        let mut file = fs::File::open(path)
            .map_err(|e| StoreError::Snapshot(format!("Could not open file '{}': {}", path, e)))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            StoreError::Snapshot(format!("Could not read from file '{}': {}", path, e))
        })?;
        self.restore(&bytes)
    }
}

impl WorkflowStore for MemoryStore {
    fn load_definition(&self, id: DefinitionId) -> Result<FlowDefinition, StoreError> {
        self.definitions
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Flow definition",
                id,
            })
    }

    fn create_process_instance(
        &self,
        process: NewProcessInstance,
    ) -> Result<ProcessInstance, StoreError> {
        let mut state = self.state.write();
        state.last_process_id += 1;
        let instance = process.into_instance(state.last_process_id);
        state.processes.insert(instance.id, instance.clone());
        Ok(instance)
    }

    fn save_process_instance(&self, process: &ProcessInstance) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let slot = state
            .processes
            .get_mut(&process.id)
            .ok_or(StoreError::NotFound {
                entity: "Process instance",
                id: process.id,
            })?;
        *slot = process.clone();
        Ok(())
    }

    fn find_process_instance(
        &self,
        id: ProcessId,
    ) -> Result<Option<ProcessInstance>, StoreError> {
        Ok(self.state.read().processes.get(&id).cloned())
    }

    fn create_work_item(&self, work_item: NewWorkItem) -> Result<WorkItem, StoreError> {
        let mut state = self.state.write();
        state.last_work_item_id += 1;
        let item = work_item.into_work_item(state.last_work_item_id);
        state.work_items.insert(item.id, item.clone());
        Ok(item)
    }

    fn save_work_item(&self, work_item: &WorkItem) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let slot = state
            .work_items
            .get_mut(&work_item.id)
            .ok_or(StoreError::NotFound {
                entity: "Work item",
                id: work_item.id,
            })?;
        *slot = work_item.clone();
        Ok(())
    }

    fn find_work_item(&self, id: WorkItemId) -> Result<Option<WorkItem>, StoreError> {
        Ok(self.state.read().work_items.get(&id).cloned())
    }

    fn count_completed_work_items(
        &self,
        node_codes: &[String],
        process_id: ProcessId,
    ) -> Result<usize, StoreError> {
        Ok(self
            .state
            .read()
            .work_items
            .values()
            .filter(|item| {
                item.process_id == process_id
                    && item.completed
                    && node_codes.contains(&item.node_code)
            })
            .count())
    }

    fn query_visible_work_items(
        &self,
        query: &VisibilityQuery,
    ) -> Result<Vec<WorkItem>, StoreError> {
        Ok(self
            .state
            .read()
            .work_items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect())
    }
}
