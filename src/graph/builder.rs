use super::{
    Condition, ConditionRegistry, ConditionValue, FlowGraph, Node, NodeKind, NodeType, START_NODE,
};
use crate::definition::{FlowDefinition, NodeRecord};
use crate::error::DefinitionError;
use crate::model::{Assignment, ProcessId};
use ahash::AHashMap;
use itertools::Itertools;

/// Type names understood without any explicit mapping.
const DEFAULT_TYPE_NAMES: &[(&str, NodeType)] = &[
    ("start", NodeType::Start),
    ("Start", NodeType::Start),
    ("end", NodeType::End),
    ("End", NodeType::End),
    ("task", NodeType::Task),
    ("Task", NodeType::Task),
    ("exclusive", NodeType::ExclusiveGateway),
    ("ExclusiveGateway", NodeType::ExclusiveGateway),
    ("parallel", NodeType::ParallelGateway),
    ("ParallelGateway", NodeType::ParallelGateway),
];

/// Builds a `FlowGraph` from a `FlowDefinition`, resolving node types and conditions by name.
pub struct GraphBuilder {
    flow: FlowDefinition,
    type_registry: AHashMap<String, NodeType>,
    conditions: ConditionRegistry,
}

impl GraphBuilder {
    pub fn new(flow: FlowDefinition) -> Self {
        let type_registry = DEFAULT_TYPE_NAMES
            .iter()
            .map(|(name, node_type)| (name.to_string(), *node_type))
            .collect();
        Self {
            flow,
            type_registry,
            conditions: ConditionRegistry::new(),
        }
    }

    /// Maps a host-specific type name (e.g. `"userTask"`) onto a built-in node variant.
    pub fn with_type_mapping(mut self, user_type_name: &str, node_type: NodeType) -> Self {
        self.type_registry
            .insert(user_type_name.to_string(), node_type);
        self
    }

    pub fn with_condition(mut self, name: &str, condition: impl Condition + 'static) -> Self {
        self.conditions.register(name, condition);
        self
    }

    pub fn with_condition_fn<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(ProcessId) -> ConditionValue + Send + Sync + 'static,
    {
        self.conditions.register_fn(name, f);
        self
    }

    /// Adds every condition of `registry`, replacing same-named ones.
    pub fn with_conditions(mut self, registry: &ConditionRegistry) -> Self {
        self.conditions.merge(registry);
        self
    }

    pub fn with_type_mappings(mut self, mappings: &AHashMap<String, NodeType>) -> Self {
        self.type_registry
            .extend(mappings.iter().map(|(k, v)| (k.clone(), *v)));
        self
    }

    pub fn build(self) -> Result<FlowGraph, DefinitionError> {
        if let Some(code) = self.flow.nodes.iter().map(|n| &n.code).duplicates().next() {
            return Err(DefinitionError::DuplicateNode(code.clone()));
        }

        let mut nodes = AHashMap::with_capacity(self.flow.nodes.len());
        let mut order = Vec::with_capacity(self.flow.nodes.len());
        for record in &self.flow.nodes {
            let node = self.build_node(record)?;
            order.push(node.code.clone());
            nodes.insert(node.code.clone(), node);
        }

        if !nodes.contains_key(START_NODE) {
            return Err(DefinitionError::MissingStartNode);
        }

        for code in &order {
            let node = &nodes[code];
            if let Some(missing) = node
                .nexts
                .iter()
                .chain(node.previous.iter())
                .find(|target| !nodes.contains_key(target.as_str()))
            {
                return Err(DefinitionError::NodeNotFound {
                    missing_node_code: missing.clone(),
                    source_node_code: code.clone(),
                });
            }
        }

        Ok(FlowGraph {
            definition_id: self.flow.id,
            name: self.flow.name,
            nodes,
            order,
        })
    }

    fn build_node(&self, record: &NodeRecord) -> Result<Node, DefinitionError> {
        let node_type = self.type_registry.get(&record.node_type).ok_or_else(|| {
            DefinitionError::InvalidNodeType {
                node_code: record.code.clone(),
                type_name: record.node_type.clone(),
            }
        })?;

        let kind = match node_type {
            NodeType::Start => NodeKind::Start,
            NodeType::End => NodeKind::End,
            NodeType::Task => NodeKind::Task {
                name: record.name.clone(),
                assignment: parse_assignment(record)?,
            },
            NodeType::ExclusiveGateway => {
                let name =
                    record
                        .condition
                        .as_deref()
                        .ok_or_else(|| DefinitionError::MissingField {
                            node_code: record.code.clone(),
                            field: "condition",
                        })?;
                let condition = self.conditions.resolve(name).ok_or_else(|| {
                    DefinitionError::UnknownCondition {
                        node_code: record.code.clone(),
                        condition: name.to_string(),
                    }
                })?;
                NodeKind::ExclusiveGateway { condition }
            }
            NodeType::ParallelGateway => NodeKind::ParallelGateway,
        };

        Ok(Node {
            code: record.code.clone(),
            kind,
            nexts: record.nexts.clone(),
            previous: record.previous.clone(),
            view: record.view.clone(),
            prev_condition_result: record.prev_condition_result.as_ref().map(ConditionValue::from),
        })
    }
}

/// Reads `assignType`/`assignValue` into an `Assignment`. A task with neither is
/// unassigned; one without the other is rejected.
fn parse_assignment(record: &NodeRecord) -> Result<Option<Assignment>, DefinitionError> {
    let missing = |field| DefinitionError::MissingField {
        node_code: record.code.clone(),
        field,
    };

    let assign_type = match (record.assign_type.as_deref(), &record.assign_value) {
        (None, None) => return Ok(None),
        (None, Some(_)) => return Err(missing("assignType")),
        (Some(assign_type), _) => assign_type,
    };

    let value = match &record.assign_value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Err(missing("assignValue")),
    };

    match assign_type.to_ascii_lowercase().as_str() {
        "assignee" | "user" => Ok(Some(Assignment::Assignee(value))),
        "group" | "role" => Ok(Some(Assignment::Group(value))),
        "permission" => Ok(Some(Assignment::Permission(value))),
        _ => Err(DefinitionError::InvalidAssignType {
            node_code: record.code.clone(),
            assign_type: assign_type.to_string(),
        }),
    }
}
