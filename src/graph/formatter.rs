use super::{FlowGraph, Node, NodeKind};
use itertools::Itertools;

/// Formats flow graphs into human-readable listings.
pub struct GraphFormatter;

impl GraphFormatter {
    /// Renders one line per node, in declaration order.
    pub fn format_graph(graph: &FlowGraph) -> String {
        let title = match graph.name() {
            Some(name) => format!("FLOW #{}: {}", graph.definition_id(), name),
            None => format!("FLOW #{}", graph.definition_id()),
        };
        let width = graph.nodes().map(|n| n.code.len()).max().unwrap_or(0);

        let mut output = String::new();
        output.push_str(&format!("======== {} ========\n", title));
        for node in graph.nodes() {
            output.push_str(&Self::format_node(node, width));
            output.push('\n');
        }
        output.push_str(&format!("======== {} nodes ========\n", graph.len()));
        output
    }

    /// Formats a single node: code, variant, variant details, branch tag and edges.
    pub fn format_node(node: &Node, width: usize) -> String {
        let mut line = format!(
            "{:<width$} [{}]",
            node.code,
            node.node_type(),
            width = width
        );

        match &node.kind {
            NodeKind::Task { name, assignment } => {
                if let Some(name) = name {
                    line.push_str(&format!(" \"{}\"", name));
                }
                match assignment {
                    Some(assignment) => line.push_str(&format!(" ({})", assignment)),
                    None => line.push_str(" (unassigned)"),
                }
            }
            NodeKind::ExclusiveGateway { condition } => {
                line.push_str(&format!(" if {}?", condition.name));
            }
            NodeKind::ParallelGateway if !node.previous.is_empty() => {
                line.push_str(&format!(" waits for {}", node.previous.iter().join(" & ")));
            }
            _ => {}
        }

        if let Some(tag) = &node.prev_condition_result {
            line.push_str(&format!(" when {}", tag));
        }

        if node.is_terminal() {
            line.push_str(" -> (end of flow)");
        } else {
            line.push_str(&format!(" -> {}", node.nexts.iter().join(", ")));
        }
        line
    }
}
