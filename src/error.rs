use crate::graph::ConditionValue;
use crate::model::{ProcessId, WorkItemId};
use thiserror::Error;

/// Errors that can occur while turning a definition document into a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Failed to parse flow definition JSON: {0}")]
    JsonParseError(String),

    #[error("Node code '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("The flow definition has no 'start' node")]
    MissingStartNode,

    #[error(
        "Node '{missing_node_code}' not found, which is referenced by node '{source_node_code}'"
    )]
    NodeNotFound {
        missing_node_code: String,
        source_node_code: String,
    },

    #[error("Node '{node_code}' has an unregistered or invalid node type: '{type_name}'")]
    InvalidNodeType { node_code: String, type_name: String },

    #[error("Node '{node_code}' is missing required field '{field}'")]
    MissingField {
        node_code: String,
        field: &'static str,
    },

    #[error("Node '{node_code}' references condition '{condition}', which is not registered")]
    UnknownCondition { node_code: String, condition: String },

    #[error("Node '{node_code}' has an invalid assign type: '{assign_type}'")]
    InvalidAssignType {
        node_code: String,
        assign_type: String,
    },
}

/// Errors reported by a `WorkflowStore` implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} #{id} does not exist")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Snapshot failed: {0}")]
    Snapshot(String),
}

/// Errors surfaced by the traversal engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Work item #{0} does not exist")]
    WorkItemNotFound(WorkItemId),

    #[error("Process instance #{0} does not exist")]
    ProcessNotFound(ProcessId),

    #[error("Process instance #{process_id} references node '{node_code}', which is not in its flow")]
    UnknownNode {
        process_id: ProcessId,
        node_code: String,
    },

    #[error("Work item #{0} has already been completed")]
    AlreadyCompleted(WorkItemId),

    #[error("Exclusive gateway '{gateway}' has no branch for condition result '{result}'")]
    UnmatchedBranch {
        gateway: String,
        result: ConditionValue,
    },

    #[error("Activation of node '{node_code}' exceeded the depth limit of {limit}")]
    ActivationDepthExceeded { node_code: String, limit: usize },
}
