//! analyse-control - control flow graphs for ES5 programs.
//!
//! This library consumes an already-parsed, ESTree-shaped abstract syntax
//! tree and produces a control flow graph whose vertices are *flow events*:
//! hoisting, entering, or exiting one AST node. Edges connect each event to
//! the events that may execute immediately after it. The graph
//! over-approximates runtime behavior — every concrete execution trace is a
//! path through the graph, and both branches of every conditional are
//! present.
//!
//! # Architecture
//!
//! The library is organized in dependency order:
//!
//! - **AST layer** ([`ast`]): lowering of ESTree JSON into a flat arena of
//!   shallow nodes, each child replaced by a numeric handle
//! - **Flow layer** ([`flow`]): the event store, the per-kind wiring rules
//!   (hoisting, loops, short-circuit operators, labeled jumps,
//!   `try`/`catch`/`finally`), and the queryable graph facade
//!
//! Parsing is out of scope: feed this crate the JSON an ESTree-compliant
//! parser (esprima, acorn) produces. Exception flow is modeled only for
//! explicit `throw` statements reaching a syntactically enclosing `catch`.
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//!
//! // `helloWorld();` as parsed by an ESTree parser
//! let ast = json!({
//!     "type": "Program",
//!     "body": [{
//!         "type": "ExpressionStatement",
//!         "expression": {
//!             "type": "CallExpression",
//!             "callee": { "type": "Identifier", "name": "helloWorld" },
//!             "arguments": []
//!         }
//!     }]
//! });
//!
//! let graph = analyse_control::analyse(&ast)?;
//!
//! // No declarations, so flow starts at the program's enter event.
//! let start = graph.start_of_flow();
//! assert!(start.is_enter());
//!
//! // Walk forward to the terminal program exit.
//! let mut flow = start;
//! while let Some(next) = flow.forward_flows().next() {
//!     flow = next;
//! }
//! assert!(flow.is_exit());
//! assert_eq!(flow.id(), graph.end_of_flow().id());
//! # Ok::<(), analyse_control::FlowError>(())
//! ```
//!
//! # Hoisting
//!
//! Before a scope's body executes, its function declarations and `var`
//! declarators are hoisted: the graph emits one `Hoist` event per
//! declaration, chained ahead of the scope's enter event. Declarations are
//! collected syntactically — a `var` inside a never-taken branch still
//! hoists, matching the V8/IE/Safari convention.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod ast;
pub mod error;
pub mod flow;

// =============================================================================
// Public Type Re-exports
// =============================================================================

// Error types - most important for users
pub use error::{FlowError, Result};

// AST types
pub use ast::{AstArena, AstNode, NodeId, NodeKind};

// Flow graph types
pub use flow::{ControlFlowGraph, Flow, FlowEvent, FlowId, Phase};

// Rendering functions
pub use flow::render::{to_dot, to_json, to_mermaid};

// =============================================================================
// High-Level Public API Functions
// =============================================================================

/// Build the control flow graph for an ESTree `Program` value.
///
/// # Arguments
///
/// * `ast` - An ESTree ES5 document, as produced by esprima or acorn
///
/// # Errors
///
/// - [`FlowError::MalformedAst`] on unknown node kinds or missing children
/// - [`FlowError::UnresolvedJump`] on `break`/`continue` without a target,
///   or `return` outside a function
pub fn analyse(ast: &serde_json::Value) -> Result<ControlFlowGraph> {
    ControlFlowGraph::analyse(ast)
}

/// Build the control flow graph for ESTree JSON text.
///
/// Convenience wrapper over [`analyse`] for callers holding unparsed JSON.
///
/// # Errors
///
/// [`FlowError::Serde`] when the text is not valid JSON, plus everything
/// [`analyse`] reports.
pub fn analyse_json(text: &str) -> Result<ControlFlowGraph> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    analyse(&value)
}
