use crate::graph::ConditionValue;
use crate::model::{ProcessId, WorkItemId};
use std::fmt;

/// A single step the traversal performed while advancing an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    WorkItemCreated {
        node_code: String,
        work_item_id: WorkItemId,
    },
    BranchTaken {
        gateway: String,
        branch: String,
        result: ConditionValue,
    },
    /// No branch of the gateway carries the condition's result; the path stalls here.
    BranchUnmatched {
        gateway: String,
        result: ConditionValue,
    },
    JoinPending {
        gateway: String,
        completed: usize,
        required: usize,
    },
    JoinFired {
        gateway: String,
    },
    ProcessCompleted {
        process_id: ProcessId,
    },
}

impl Activation {
    pub fn work_item_id(&self) -> Option<WorkItemId> {
        match self {
            Activation::WorkItemCreated { work_item_id, .. } => Some(*work_item_id),
            _ => None,
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::WorkItemCreated {
                node_code,
                work_item_id,
            } => write!(f, "created work item #{} for '{}'", work_item_id, node_code),
            Activation::BranchTaken {
                gateway,
                branch,
                result,
            } => write!(f, "gateway '{}' took '{}' on {}", gateway, branch, result),
            Activation::BranchUnmatched { gateway, result } => {
                write!(f, "gateway '{}' has no branch for {}", gateway, result)
            }
            Activation::JoinPending {
                gateway,
                completed,
                required,
            } => write!(
                f,
                "join '{}' waiting ({}/{} predecessors complete)",
                gateway, completed, required
            ),
            Activation::JoinFired { gateway } => write!(f, "join '{}' fired", gateway),
            Activation::ProcessCompleted { process_id } => {
                write!(f, "process #{} completed", process_id)
            }
        }
    }
}
