//! Shared helpers for the integration suite.
//!
//! ESTree fragments are built with `serde_json::json!` so no JavaScript
//! parser is needed; each helper mirrors what esprima emits for the
//! corresponding ES5 construct.

#![allow(dead_code)]

use analyse_control::{ControlFlowGraph, Flow, FlowId};
use serde_json::{json, Value};

pub fn program(body: Vec<Value>) -> Value {
    json!({ "type": "Program", "body": body })
}

pub fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

pub fn literal(value: Value, raw: &str) -> Value {
    json!({ "type": "Literal", "value": value, "raw": raw })
}

pub fn block(body: Vec<Value>) -> Value {
    json!({ "type": "BlockStatement", "body": body })
}

pub fn expr_stmt(expression: Value) -> Value {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

pub fn call(callee: &str, arguments: Vec<Value>) -> Value {
    json!({
        "type": "CallExpression",
        "callee": ident(callee),
        "arguments": arguments
    })
}

/// `name();` as a statement.
pub fn call_stmt(name: &str) -> Value {
    expr_stmt(call(name, vec![]))
}

pub fn if_stmt(test: Value, consequent: Value, alternate: Option<Value>) -> Value {
    json!({
        "type": "IfStatement",
        "test": test,
        "consequent": consequent,
        "alternate": alternate
    })
}

pub fn while_stmt(test: Value, body: Value) -> Value {
    json!({ "type": "WhileStatement", "test": test, "body": body })
}

pub fn var_decl(names: &[&str]) -> Value {
    let declarations: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "type": "VariableDeclarator",
                "id": ident(name),
                "init": null
            })
        })
        .collect();
    json!({
        "type": "VariableDeclaration",
        "kind": "var",
        "declarations": declarations
    })
}

pub fn func_decl(name: &str, body: Vec<Value>) -> Value {
    json!({
        "type": "FunctionDeclaration",
        "id": ident(name),
        "params": [],
        "body": block(body)
    })
}

pub fn return_stmt(argument: Option<Value>) -> Value {
    json!({ "type": "ReturnStatement", "argument": argument })
}

pub fn throw_stmt(argument: Value) -> Value {
    json!({ "type": "ThrowStatement", "argument": argument })
}

pub fn try_stmt(block_body: Vec<Value>, handler: Option<(&str, Vec<Value>)>, finalizer: Option<Vec<Value>>) -> Value {
    let handler = handler
        .map(|(param, body)| {
            json!({
                "type": "CatchClause",
                "param": ident(param),
                "body": block(body)
            })
        })
        .unwrap_or(Value::Null);
    let finalizer = finalizer.map(|body| block(body)).unwrap_or(Value::Null);
    json!({
        "type": "TryStatement",
        "block": block(block_body),
        "handler": handler,
        "finalizer": finalizer
    })
}

/// Count the distinct terminating paths reachable from the start of flow.
///
/// Depth-first walk that sums over forks and returns infinity when it
/// revisits an event already on the current path (a cycle). A terminal
/// event contributes one path.
pub fn count_paths(graph: &ControlFlowGraph) -> f64 {
    fn walk(flow: Flow<'_>, stack: &mut Vec<FlowId>) -> f64 {
        let id = flow.id();
        if stack.contains(&id) {
            return f64::INFINITY;
        }
        let successors: Vec<Flow<'_>> = flow.forward_flows().collect();
        if successors.is_empty() {
            return 1.0;
        }
        stack.push(id);
        let total = successors
            .into_iter()
            .map(|succ| walk(succ, stack))
            .sum();
        stack.pop();
        total
    }
    walk(graph.start_of_flow(), &mut Vec::new())
}

/// Whether `to` is reachable from `from` via forward edges.
pub fn flows_before<'g>(from: Flow<'g>, to: Flow<'g>) -> bool {
    let mut seen = Vec::new();
    let mut queue = vec![from];
    while let Some(flow) = queue.pop() {
        if flow.id() == to.id() {
            return true;
        }
        if seen.contains(&flow.id()) {
            continue;
        }
        seen.push(flow.id());
        queue.extend(flow.forward_flows());
    }
    false
}
