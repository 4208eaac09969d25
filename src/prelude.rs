//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the nagare crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<()> {
//! let definition = FlowDefinition::from_file(1, "path/to/flow.json")?;
//! let store = Arc::new(MemoryStore::new().with_definition(definition));
//! let engine = Engine::builder(store, Arc::new(StaticRoles::new())).build();
//!
//! let started = engine.start_instance(1, "alice")?;
//! println!("Started process #{}", started.process.id);
//! # Ok(())
//! # }
//! ```

// Engine
pub use crate::engine::{Activation, Completion, Engine, EngineBuilder, EngineConfig, Started};

// Definitions and graphs
pub use crate::definition::{FlowDefinition, IntoFlow, NodeRecord};
pub use crate::graph::{
    BranchMatching, Condition, ConditionRegistry, ConditionValue, FlowGraph, GraphFormatter, Node,
    NodeKind, NodeType,
};

// Runtime entities
pub use crate::model::{
    Assignment, DefinitionId, ProcessId, ProcessInstance, ProcessStatus, WorkItem, WorkItemId,
};

// Collaborators
pub use crate::roles::{RoleLookup, StaticRoles};
pub use crate::store::{MemoryStore, VisibilityQuery, WorkflowStore};

// Error types
pub use crate::error::{DefinitionError, EngineError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
