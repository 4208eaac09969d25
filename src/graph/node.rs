use super::{BranchMatching, ConditionRef, ConditionValue};
use crate::model::Assignment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The built-in node variants a definition's `type` field can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Start,
    End,
    Task,
    ExclusiveGateway,
    ParallelGateway,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Task => "task",
            NodeType::ExclusiveGateway => "exclusive",
            NodeType::ParallelGateway => "parallel",
        };
        f.write_str(name)
    }
}

/// Variant-specific data of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Entry marker. Activating it passes straight through to its successors.
    Start,
    /// Exit marker. Activating it completes the process instance.
    End,
    /// Creates a work item when activated.
    Task {
        name: Option<String>,
        assignment: Option<Assignment>,
    },
    /// Takes the first successor whose branch tag equals the condition result.
    ExclusiveGateway { condition: ConditionRef },
    /// Fires all successors once every node in `previous` has a completed occurrence.
    ParallelGateway,
}

/// A vertex of a flow graph. Edges are kept as node codes and resolved at traversal time.
#[derive(Debug, Clone)]
pub struct Node {
    pub code: String,
    pub kind: NodeKind,
    pub nexts: Vec<String>,
    pub previous: Vec<String>,
    /// Presentation hint, opaque to the engine.
    pub view: Option<serde_json::Value>,
    /// Branch tag matched by an upstream exclusive gateway.
    pub prev_condition_result: Option<ConditionValue>,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Start => NodeType::Start,
            NodeKind::End => NodeType::End,
            NodeKind::Task { .. } => NodeType::Task,
            NodeKind::ExclusiveGateway { .. } => NodeType::ExclusiveGateway,
            NodeKind::ParallelGateway => NodeType::ParallelGateway,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.nexts.is_empty()
    }

    /// Whether this node is the branch an exclusive gateway takes for `result`.
    /// A node without a branch tag never matches.
    pub fn matches_branch(&self, result: &ConditionValue, mode: BranchMatching) -> bool {
        self.prev_condition_result
            .as_ref()
            .is_some_and(|tag| tag.matches(result, mode))
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Task { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}
