use crate::error::EngineError;
use crate::graph::{
    BranchMatching, Condition, ConditionRegistry, ConditionValue, FlowGraph, NodeType,
};
use crate::model::{
    DefinitionId, NewProcessInstance, ProcessId, ProcessInstance, WorkItem, WorkItemId,
};
use crate::roles::RoleLookup;
use crate::store::{VisibilityQuery, WorkflowStore};
use ahash::AHashMap;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

mod activation;
mod locks;
mod traversal;

pub use activation::Activation;
use locks::ProcessLocks;
use traversal::Traversal;

/// Tunables of the traversal engine.
///
/// Deserializes from a partial document; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How branch tags are compared with condition results.
    pub branch_matching: BranchMatching,
    /// Raise `EngineError::UnmatchedBranch` when an exclusive gateway has no
    /// branch for its condition result, instead of logging and stalling.
    pub strict_branching: bool,
    /// Maximum nesting of activations triggered by a single advance.
    pub max_activation_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            branch_matching: BranchMatching::Loose,
            strict_branching: false,
            max_activation_depth: 64,
        }
    }
}

/// The outcome of `Engine::start_instance`.
#[derive(Debug, Clone)]
pub struct Started {
    pub process: ProcessInstance,
    /// The first work item of the new instance visible to the starting actor, if any.
    pub work_item: Option<WorkItem>,
    pub activations: Vec<Activation>,
}

/// The outcome of `Engine::complete_task`.
#[derive(Debug, Clone)]
pub struct Completion {
    pub work_item: WorkItem,
    pub process_completed: bool,
    pub activations: Vec<Activation>,
}

/// Drives process instances through their flow graphs.
///
/// Graphs are built once per definition and cached. Completions are serialized
/// per process instance, so sibling branches feeding the same parallel join may
/// be completed from different threads and the join still fires exactly once.
pub struct Engine {
    store: Arc<dyn WorkflowStore>,
    roles: Arc<dyn RoleLookup>,
    conditions: ConditionRegistry,
    type_mappings: AHashMap<String, NodeType>,
    config: EngineConfig,
    graphs: RwLock<AHashMap<DefinitionId, Arc<FlowGraph>>>,
    locks: ProcessLocks,
}

pub struct EngineBuilder {
    store: Arc<dyn WorkflowStore>,
    roles: Arc<dyn RoleLookup>,
    conditions: ConditionRegistry,
    type_mappings: AHashMap<String, NodeType>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new(store: Arc<dyn WorkflowStore>, roles: Arc<dyn RoleLookup>) -> Self {
        Self {
            store,
            roles,
            conditions: ConditionRegistry::new(),
            type_mappings: AHashMap::new(),
            config: EngineConfig::default(),
        }
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

    pub fn with_conditions(mut self, registry: &ConditionRegistry) -> Self {
        self.conditions.merge(registry);
        self
    }

    pub fn with_type_mapping(mut self, user_type_name: &str, node_type: NodeType) -> Self {
        self.type_mappings
            .insert(user_type_name.to_string(), node_type);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn branch_matching(mut self, mode: BranchMatching) -> Self {
        self.config.branch_matching = mode;
        self
    }

    pub fn strict_branching(mut self, strict: bool) -> Self {
        self.config.strict_branching = strict;
        self
    }

    pub fn max_activation_depth(mut self, depth: usize) -> Self {
        self.config.max_activation_depth = depth;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            store: self.store,
            roles: self.roles,
            conditions: self.conditions,
            type_mappings: self.type_mappings,
            config: self.config,
            graphs: RwLock::new(AHashMap::new()),
            locks: ProcessLocks::default(),
        }
    }
}

impl Engine {
    pub fn builder(store: Arc<dyn WorkflowStore>, roles: Arc<dyn RoleLookup>) -> EngineBuilder {
        EngineBuilder::new(store, roles)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the graph of a definition, loading and building it on first use.
    pub fn graph(&self, definition_id: DefinitionId) -> Result<Arc<FlowGraph>, EngineError> {
        if let Some(graph) = self.graphs.read().get(&definition_id) {
            return Ok(Arc::clone(graph));
        }

        let definition = self.store.load_definition(definition_id)?;
        let graph = FlowGraph::builder(definition)
            .with_conditions(&self.conditions)
            .with_type_mappings(&self.type_mappings)
            .build()?;
        debug!(definition_id, nodes = graph.len(), "flow graph built");

        let mut graphs = self.graphs.write();
        let graph = graphs
            .entry(definition_id)
            .or_insert_with(|| Arc::new(graph));
        Ok(Arc::clone(graph))
    }

    pub fn process(&self, process_id: ProcessId) -> Result<ProcessInstance, EngineError> {
        self.store
            .find_process_instance(process_id)?
            .ok_or(EngineError::ProcessNotFound(process_id))
    }

    pub fn work_item(&self, work_item_id: WorkItemId) -> Result<WorkItem, EngineError> {
        self.store
            .find_work_item(work_item_id)?
            .ok_or(EngineError::WorkItemNotFound(work_item_id))
    }

    /// Creates a process instance of `definition_id` and advances it from the `start` node.
    ///
    /// The instance is created before the starting actor's roles are looked up, so a
    /// failing `RoleLookup` is reported for an instance that already exists.
    pub fn start_instance(
        &self,
        definition_id: DefinitionId,
        actor_id: &str,
    ) -> Result<Started, EngineError> {
        let graph = self.graph(definition_id)?;
        let process = self
            .store
            .create_process_instance(NewProcessInstance::new(definition_id, actor_id))?;
        info!(
            process_id = process.id,
            definition_id,
            actor = actor_id,
            "process instance started"
        );

        let activations = self.locks.run_exclusive(process.id, || {
            let start = graph
                .start_node()
                .ok_or_else(|| EngineError::UnknownNode {
                    process_id: process.id,
                    node_code: crate::graph::START_NODE.to_string(),
                })?;
            let mut traversal =
                Traversal::new(self.store.as_ref(), &graph, &self.config, process.id);
            traversal.advance(start)?;
            Ok::<_, EngineError>(traversal.into_activations())
        })?;

        let work_item = self
            .list_visible_work_items(actor_id, Some(process.id))?
            .into_iter()
            .next();
        Ok(Started {
            process: self.process(process.id)?,
            work_item,
            activations,
        })
    }

    /// Advances `process_id` from the node `from_code` without completing anything.
    pub fn advance(
        &self,
        process_id: ProcessId,
        from_code: &str,
    ) -> Result<Vec<Activation>, EngineError> {
        let process = self.process(process_id)?;
        let graph = self.graph(process.flow_definition_id)?;
        let from = graph
            .node(from_code)
            .ok_or_else(|| EngineError::UnknownNode {
                process_id,
                node_code: from_code.to_string(),
            })?;

        self.locks.run_exclusive(process_id, || {
            let mut traversal =
                Traversal::new(self.store.as_ref(), &graph, &self.config, process_id);
            traversal.advance(from)?;
            Ok(traversal.into_activations())
        })
    }

    /// Completes a work item on behalf of `actor_id` and advances its process instance.
    ///
    /// The work item save is the commit point: if it fails, the error is returned and
    /// nothing else happens. Failures to save the correlation id or the completed
    /// process afterwards are logged and do not undo the completion.
    pub fn complete_task(
        &self,
        work_item_id: WorkItemId,
        actor_id: &str,
        ref_id: Option<&str>,
    ) -> Result<Completion, EngineError> {
        let process_id = self.work_item(work_item_id)?.process_id;
        self.locks.run_exclusive(process_id, || {
            self.complete_locked(work_item_id, actor_id, ref_id)
        })
    }

    fn complete_locked(
        &self,
        work_item_id: WorkItemId,
        actor_id: &str,
        ref_id: Option<&str>,
    ) -> Result<Completion, EngineError> {
        let mut work_item = self.work_item(work_item_id)?;
        if work_item.completed {
            return Err(EngineError::AlreadyCompleted(work_item_id));
        }

        let mut process = self.process(work_item.process_id)?;
        let graph = self.graph(process.flow_definition_id)?;
        let node = graph
            .node(&work_item.node_code)
            .ok_or_else(|| EngineError::UnknownNode {
                process_id: process.id,
                node_code: work_item.node_code.clone(),
            })?;

        work_item.complete(actor_id, Utc::now());
        self.store.save_work_item(&work_item).inspect_err(|e| {
            error!(work_item_id, error = %e, "failed to save completed work item");
        })?;
        info!(
            work_item_id,
            process_id = process.id,
            node = %node.code,
            actor = actor_id,
            "work item completed"
        );

        if process.assign_ref_id(ref_id) {
            if let Err(e) = self.store.save_process_instance(&process) {
                error!(process_id = process.id, error = %e, "failed to save process ref id");
            }
        }

        let mut traversal = Traversal::new(self.store.as_ref(), &graph, &self.config, process.id);
        if node.is_terminal() {
            traversal.finish_process()?;
        }
        traversal.advance(node)?;
        let activations = traversal.into_activations();

        let process_completed = activations
            .iter()
            .any(|a| matches!(a, Activation::ProcessCompleted { .. }));
        Ok(Completion {
            work_item,
            process_completed,
            activations,
        })
    }

    /// Lists the incomplete work items visible to `actor_id`, optionally within one instance.
    pub fn list_visible_work_items(
        &self,
        actor_id: &str,
        process_id: Option<ProcessId>,
    ) -> Result<Vec<WorkItem>, EngineError> {
        let roles = self.roles.roles_of(actor_id)?;
        let query = VisibilityQuery::new(actor_id, roles).in_process(process_id);
        Ok(self.store.query_visible_work_items(&query)?)
    }
}
