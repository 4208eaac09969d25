use super::{DefinitionId, ProcessId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a process instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessStatus {
    Active,
    Completed,
    Cancelled,
}

/// One execution of a flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInstance {
    pub id: ProcessId,
    pub flow_definition_id: DefinitionId,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub completed: bool,
    pub status: ProcessStatus,
    pub finished_at: Option<DateTime<Utc>>,
    /// External correlation id. Written once, by the first completion that supplies one.
    pub ref_id: Option<String>,
}

/// The fields a store needs to create a process instance. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProcessInstance {
    pub flow_definition_id: DefinitionId,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl NewProcessInstance {
    pub fn new(flow_definition_id: DefinitionId, created_by: &str) -> Self {
        Self {
            flow_definition_id,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn into_instance(self, id: ProcessId) -> ProcessInstance {
        ProcessInstance {
            id,
            flow_definition_id: self.flow_definition_id,
            created_at: self.created_at,
            created_by: self.created_by,
            completed: false,
            status: ProcessStatus::Active,
            finished_at: None,
            ref_id: None,
        }
    }
}

impl ProcessInstance {
    /// Sets the correlation id if none is set yet.
    ///
    /// Returns `true` only when the value transitioned from `None`, which is the
    /// signal for the caller to persist the instance.
    pub fn assign_ref_id(&mut self, ref_id: Option<&str>) -> bool {
        match (&self.ref_id, ref_id) {
            (None, Some(value)) => {
                self.ref_id = Some(value.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.status = ProcessStatus::Completed;
        self.finished_at = Some(at);
    }

    pub fn is_active(&self) -> bool {
        self.status == ProcessStatus::Active
    }
}
