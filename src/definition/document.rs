use crate::error::DefinitionError;
use crate::model::DefinitionId;
use serde::{Deserialize, Serialize};
use std::fs;

/// The complete, canonical definition of a process flow, ready for graph construction.
/// This is the target structure for any custom schema conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub id: DefinitionId,
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: Vec<NodeRecord>,
}

/// A single node record, as stored in a definition's schema.
///
/// Only `code`, `type` and `nexts` are required. Every other field falls back to
/// `None` (or an empty list) when the record does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub code: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub view: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assign_type: Option<String>,
    /// A user id, group or permission name. Numbers are accepted for numeric user ids.
    #[serde(default)]
    pub assign_value: Option<serde_json::Value>,
    #[serde(default)]
    pub prev_condition_result: Option<serde_json::Value>,
    pub nexts: Vec<String>,
    #[serde(default)]
    pub previous: Vec<String>,
}

impl FlowDefinition {
    pub fn new(id: DefinitionId, nodes: Vec<NodeRecord>) -> Self {
        Self {
            id,
            name: None,
            nodes,
        }
    }

    /// Parses a schema document: a JSON array of node records.
    pub fn from_json(id: DefinitionId, json: &str) -> Result<Self, DefinitionError> {
        let nodes: Vec<NodeRecord> = serde_json::from_str(json)
            .map_err(|e| DefinitionError::JsonParseError(e.to_string()))?;
        Ok(Self::new(id, nodes))
    }

    /// Loads a schema document from a JSON file.
    pub fn from_file(id: DefinitionId, path: &str) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DefinitionError::JsonParseError(format!("Could not read file '{}': {}", path, e))
        })?;
        Self::from_json(id, &content)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl NodeRecord {
    /// Creates a bare record of the given type. Convenient for building definitions in code.
    pub fn new(code: &str, node_type: &str, nexts: &[&str]) -> Self {
        Self {
            code: code.to_string(),
            node_type: node_type.to_string(),
            nexts: nexts.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn assigned(mut self, assign_type: &str, assign_value: &str) -> Self {
        self.assign_type = Some(assign_type.to_string());
        self.assign_value = Some(serde_json::Value::String(assign_value.to_string()));
        self
    }

    pub fn with_condition(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }

    pub fn on_result(mut self, result: serde_json::Value) -> Self {
        self.prev_condition_result = Some(result);
        self
    }

    pub fn after(mut self, previous: &[&str]) -> Self {
        self.previous = previous.iter().map(|p| p.to_string()).collect();
        self
    }
}
