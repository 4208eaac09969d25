use super::document::FlowDefinition;
use crate::error::DefinitionError;

/// A trait for host-specific schema models that can be converted into a `FlowDefinition`.
///
/// The engine never parses a stored schema itself. Implement this trait on whatever
/// your application loads (a database row, a designer export, a YAML file) to hand
/// the engine its canonical node records.
///
/// # Example
///
/// ```rust
/// use nagare::definition::{FlowDefinition, IntoFlow, NodeRecord};
/// use nagare::error::DefinitionError;
///
/// struct DesignerStep { key: String, kind: String, then: Vec<String> }
/// struct DesignerExport { id: u64, steps: Vec<DesignerStep> }
///
/// impl IntoFlow for DesignerExport {
///     fn into_flow(self) -> Result<FlowDefinition, DefinitionError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|step| NodeRecord {
///                 code: step.key,
///                 node_type: step.kind,
///                 nexts: step.then,
///                 ..NodeRecord::default()
///             })
///             .collect();
///         Ok(FlowDefinition::new(self.id, nodes))
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into canonical node records.
    fn into_flow(self) -> Result<FlowDefinition, DefinitionError>;
}

impl IntoFlow for FlowDefinition {
    fn into_flow(self) -> Result<FlowDefinition, DefinitionError> {
        Ok(self)
    }
}
