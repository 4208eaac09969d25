use crate::definition::FlowDefinition;
use crate::model::DefinitionId;
use ahash::AHashMap;

mod builder;
mod condition;
mod formatter;
mod node;
mod value;

pub use builder::GraphBuilder;
pub use condition::*;
pub use formatter::GraphFormatter;
pub use node::*;
pub use value::{BranchMatching, ConditionValue};

/// The code every flow must declare as its entry point.
pub const START_NODE: &str = "start";

/// An immutable process definition: node codes mapped to nodes.
///
/// A `FlowGraph` is built once per definition and shared read-only by every
/// process instance derived from it, so it can be used from many threads
/// without locking.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    definition_id: DefinitionId,
    name: Option<String>,
    nodes: AHashMap<String, Node>,
    order: Vec<String>,
}

impl FlowGraph {
    pub fn builder(flow: FlowDefinition) -> GraphBuilder {
        GraphBuilder::new(flow)
    }

    pub fn definition_id(&self) -> DefinitionId {
        self.definition_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn node(&self, code: &str) -> Option<&Node> {
        self.nodes.get(code)
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.get(START_NODE)
    }

    /// Nodes in the order the definition declared them.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|code| self.nodes.get(code))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
