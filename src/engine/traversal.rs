use super::{Activation, EngineConfig};
use crate::error::EngineError;
use crate::graph::{ConditionRef, FlowGraph, Node, NodeKind};
use crate::model::{NewWorkItem, ProcessId};
use crate::store::WorkflowStore;
use chrono::Utc;
use tracing::{debug, error, info, warn};

/// Walks a flow graph for one process instance, recording every activation.
pub(super) struct Traversal<'a> {
    store: &'a dyn WorkflowStore,
    graph: &'a FlowGraph,
    config: &'a EngineConfig,
    process_id: ProcessId,
    activations: Vec<Activation>,
}

impl<'a> Traversal<'a> {
    pub(super) fn new(
        store: &'a dyn WorkflowStore,
        graph: &'a FlowGraph,
        config: &'a EngineConfig,
        process_id: ProcessId,
    ) -> Self {
        Self {
            store,
            graph,
            config,
            process_id,
            activations: Vec::new(),
        }
    }

    pub(super) fn into_activations(self) -> Vec<Activation> {
        self.activations
    }

    pub(super) fn record(&mut self, activation: Activation) {
        self.activations.push(activation);
    }

    /// Activates every successor of `from`, in declared order.
    /// A node without successors activates nothing.
    pub(super) fn advance(&mut self, from: &Node) -> Result<(), EngineError> {
        self.advance_at(from, 0)
    }

    fn advance_at(&mut self, from: &Node, depth: usize) -> Result<(), EngineError> {
        for code in &from.nexts {
            let next = self.resolve(code)?;
            self.activate(next, depth + 1)?;
        }
        Ok(())
    }

    fn activate(&mut self, node: &'a Node, depth: usize) -> Result<(), EngineError> {
        if depth > self.config.max_activation_depth {
            return Err(EngineError::ActivationDepthExceeded {
                node_code: node.code.clone(),
                limit: self.config.max_activation_depth,
            });
        }

        match &node.kind {
            NodeKind::Task { assignment, .. } => {
                let work_item = self.store.create_work_item(NewWorkItem::new(
                    self.process_id,
                    &node.code,
                    assignment.clone(),
                ))?;
                debug!(
                    process_id = self.process_id,
                    node = %node.code,
                    work_item_id = work_item.id,
                    "work item created"
                );
                self.record(Activation::WorkItemCreated {
                    node_code: node.code.clone(),
                    work_item_id: work_item.id,
                });
                Ok(())
            }
            NodeKind::Start => self.advance_at(node, depth),
            NodeKind::End => {
                self.finish_process()?;
                Ok(())
            }
            NodeKind::ExclusiveGateway { condition } => {
                self.activate_exclusive(node, condition, depth)
            }
            NodeKind::ParallelGateway => self.activate_parallel(node, depth),
        }
    }

    /// First successor whose branch tag equals the condition result wins; at most one branch is taken.
    fn activate_exclusive(
        &mut self,
        node: &'a Node,
        condition: &ConditionRef,
        depth: usize,
    ) -> Result<(), EngineError> {
        let result = condition.evaluate(self.process_id);
        info!(
            process_id = self.process_id,
            gateway = %node.code,
            condition = %condition.name,
            %result,
            "exclusive gateway evaluated"
        );

        for code in &node.nexts {
            let next = self.resolve(code)?;
            if next.matches_branch(&result, self.config.branch_matching) {
                self.record(Activation::BranchTaken {
                    gateway: node.code.clone(),
                    branch: next.code.clone(),
                    result,
                });
                return self.activate(next, depth + 1);
            }
        }

        warn!(
            process_id = self.process_id,
            gateway = %node.code,
            %result,
            "no branch matches the condition result, instance path stalls"
        );
        if self.config.strict_branching {
            return Err(EngineError::UnmatchedBranch {
                gateway: node.code.clone(),
                result,
            });
        }
        self.record(Activation::BranchUnmatched {
            gateway: node.code.clone(),
            result,
        });
        Ok(())
    }

    /// Fires all successors once every predecessor occurrence is complete.
    /// Re-evaluated each time any predecessor completes.
    fn activate_parallel(&mut self, node: &'a Node, depth: usize) -> Result<(), EngineError> {
        let completed = self
            .store
            .count_completed_work_items(&node.previous, self.process_id)?;
        let required = node.previous.len();

        if completed != required {
            debug!(
                process_id = self.process_id,
                gateway = %node.code,
                completed,
                required,
                "parallel join not yet satisfied"
            );
            self.record(Activation::JoinPending {
                gateway: node.code.clone(),
                completed,
                required,
            });
            return Ok(());
        }

        debug!(process_id = self.process_id, gateway = %node.code, "parallel join fired");
        self.record(Activation::JoinFired {
            gateway: node.code.clone(),
        });
        self.advance_at(node, depth)
    }

    /// Marks the instance completed. A failed save is logged, not propagated.
    pub(super) fn finish_process(&mut self) -> Result<(), EngineError> {
        let mut process = self
            .store
            .find_process_instance(self.process_id)?
            .ok_or(EngineError::ProcessNotFound(self.process_id))?;
        if process.completed {
            return Ok(());
        }

        process.mark_completed(Utc::now());
        match self.store.save_process_instance(&process) {
            Ok(()) => {
                info!(process_id = self.process_id, "process instance completed");
                self.record(Activation::ProcessCompleted {
                    process_id: self.process_id,
                });
            }
            Err(e) => error!(
                process_id = self.process_id,
                error = %e,
                "failed to save completed process instance"
            ),
        }
        Ok(())
    }

    fn resolve(&self, code: &str) -> Result<&'a Node, EngineError> {
        self.graph
            .node(code)
            .ok_or_else(|| EngineError::UnknownNode {
                process_id: self.process_id,
                node_code: code.to_string(),
            })
    }
}
