//! Flow graph rendering utilities.
//!
//! Output formats for finished control flow graphs:
//! - Mermaid: flowcharts for documentation
//! - DOT (Graphviz): publication-quality graphs
//! - JSON: machine-readable via serde
//!
//! Events unreachable from the start of flow are styled dashed so dead
//! regions and unevaluated function bodies stand out visually.

use serde_json::{json, Value};

use crate::ast::AstNode;
use crate::flow::graph::{ControlFlowGraph, Flow};
use crate::flow::types::Phase;

/// Escape special characters for Mermaid labels.
///
/// Mermaid quotes node labels; quotes, brackets, and newlines inside them
/// break rendering.
fn escape_mermaid_label(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' | '`' => result.push('\''),
            '\n' => result.push(' '),
            '\r' => {}
            '[' => result.push_str("#91;"),
            ']' => result.push_str("#93;"),
            '{' => result.push_str("#123;"),
            '}' => result.push_str("#125;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape special characters for DOT labels.
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

/// Human-readable label for one flow event: phase, node kind, and a short
/// detail for leaf nodes.
fn event_label(flow: &Flow<'_>) -> String {
    let detail = match flow.node() {
        AstNode::Identifier { name } => Some(format!("`{}`", name)),
        AstNode::Literal { raw: Some(raw), .. } => Some(raw.clone()),
        AstNode::Literal { value, raw: None } => Some(value.to_string()),
        AstNode::BinaryExpression { operator, .. }
        | AstNode::LogicalExpression { operator, .. }
        | AstNode::AssignmentExpression { operator, .. }
        | AstNode::UnaryExpression { operator, .. }
        | AstNode::UpdateExpression { operator, .. } => Some(operator.clone()),
        _ => None,
    };
    match detail {
        Some(detail) => format!("{} {} {}", flow.phase(), flow.node().kind(), detail),
        None => format!("{} {}", flow.phase(), flow.node().kind()),
    }
}

/// Render a graph as a Mermaid flowchart.
///
/// The output can be embedded in Markdown or rendered via mermaid.live.
pub fn to_mermaid(graph: &ControlFlowGraph) -> String {
    let mut out = String::from("flowchart TD\n");
    for event in graph.events() {
        let label = escape_mermaid_label(&event_label(&event));
        match event.phase() {
            Phase::Hoist => out.push_str(&format!("    E{}[/\"{}\"/]\n", event.id(), label)),
            Phase::Enter => out.push_str(&format!("    E{}([\"{}\"])\n", event.id(), label)),
            Phase::Exit => out.push_str(&format!("    E{}[\"{}\"]\n", event.id(), label)),
        }
    }
    for event in graph.events() {
        for succ in event.forward_flows() {
            out.push_str(&format!("    E{} --> E{}\n", event.id(), succ.id()));
        }
    }
    // Mark the distinguished endpoints.
    out.push_str(&format!(
        "    style E{} stroke-width:3px\n",
        graph.start_of_flow().id()
    ));
    out.push_str(&format!(
        "    style E{} stroke-width:3px\n",
        graph.end_of_flow().id()
    ));
    for event in graph.events() {
        if !graph.is_reachable(event) {
            out.push_str(&format!(
                "    style E{} stroke-dasharray: 5 5\n",
                event.id()
            ));
        }
    }
    out
}

/// Render a graph in DOT format.
///
/// Pipe through Graphviz: `dot -Tpng flow.dot -o flow.png`.
pub fn to_dot(graph: &ControlFlowGraph) -> String {
    let mut out = String::from("digraph flow {\n    rankdir=TB;\n    node [fontname=\"monospace\"];\n");
    for event in graph.events() {
        let label = escape_dot_label(&event_label(&event));
        let shape = match event.phase() {
            Phase::Hoist => "parallelogram",
            Phase::Enter => "ellipse",
            Phase::Exit => "box",
        };
        let style = if graph.is_reachable(event) {
            "solid"
        } else {
            "dashed"
        };
        out.push_str(&format!(
            "    e{} [label=\"{}\", shape={}, style={}];\n",
            event.id(),
            label,
            shape,
            style
        ));
    }
    for event in graph.events() {
        for succ in event.forward_flows() {
            out.push_str(&format!("    e{} -> e{};\n", event.id(), succ.id()));
        }
    }
    out.push_str("}\n");
    out
}

/// Render a graph as a JSON value.
pub fn to_json(graph: &ControlFlowGraph) -> Value {
    let events: Vec<Value> = graph
        .events()
        .map(|event| {
            json!({
                "id": event.id(),
                "phase": event.phase(),
                "node": event.node_id(),
                "kind": event.node().kind().as_str(),
                "forward": event.forward_flows().map(|f| f.id()).collect::<Vec<_>>(),
                "backward": event.backward_flows().map(|f| f.id()).collect::<Vec<_>>(),
                "reachable": graph.is_reachable(event),
            })
        })
        .collect();
    json!({
        "start": graph.start_of_flow().id(),
        "end": graph.end_of_flow().id(),
        "events": events,
    })
}
