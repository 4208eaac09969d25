//! # Nagare - Workflow Execution Engine
//!
//! **Nagare** drives instances of declarative process graphs. A graph is made of
//! task nodes, which become work items for people to complete, and gateways,
//! which the engine resolves on its own: exclusive gateways pick exactly one
//! branch from a condition result, parallel gateways fan out and join.
//!
//! ## Core Workflow
//!
//! The engine is storage-agnostic. It talks to persistence through the
//! [`WorkflowStore`](store::WorkflowStore) trait and resolves an actor's roles
//! through [`RoleLookup`](roles::RoleLookup). The primary workflow is:
//!
//! 1.  **Describe the flow**: Load or build a [`FlowDefinition`](definition::FlowDefinition),
//!     an ordered list of node records. Implement [`IntoFlow`](definition::IntoFlow)
//!     to convert your own schema format.
//! 2.  **Build the engine**: Use `Engine::builder` with a store, a role lookup and the
//!     named conditions your exclusive gateways reference.
//! 3.  **Run instances**: `start_instance` creates an instance and its first work items,
//!     `complete_task` records a human completion and advances the instance,
//!     `list_visible_work_items` answers "what can this actor work on".
//!
//! ## Quick Start
//!
//! ```rust
//! use nagare::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let definition = FlowDefinition::new(
//!         1,
//!         vec![
//!             NodeRecord::new("start", "start", &["submit"]),
//!             NodeRecord::new("submit", "task", &["review"]).assigned("assignee", "alice"),
//!             NodeRecord::new("review", "exclusive", &["approve", "reject"])
//!                 .with_condition("amount_ok"),
//!             NodeRecord::new("approve", "task", &[])
//!                 .assigned("group", "managers")
//!                 .on_result(serde_json::json!(true)),
//!             NodeRecord::new("reject", "task", &[])
//!                 .assigned("assignee", "alice")
//!                 .on_result(serde_json::json!(false)),
//!         ],
//!     );
//!
//!     let store = Arc::new(MemoryStore::new().with_definition(definition));
//!     let roles = Arc::new(StaticRoles::new().with_role("bob", "managers"));
//!     let engine = Engine::builder(store, roles)
//!         .with_condition_fn("amount_ok", |_process_id| ConditionValue::Bool(true))
//!         .build();
//!
//!     let started = engine.start_instance(1, "alice")?;
//!     let submit = started.work_item.expect("alice owns the first task");
//!     engine.complete_task(submit.id, "alice", Some("PO-1042"))?;
//!
//!     let inbox = engine.list_visible_work_items("bob", None)?;
//!     assert_eq!(inbox[0].node_code, "approve");
//!     Ok(())
//! }
//! ```

pub mod definition;
pub mod engine;
pub mod error;
pub mod graph;
pub mod model;
pub mod prelude;
pub mod roles;
pub mod store;
