//! Structural invariants over whole graphs.
//!
//! The kitchen-sink program below exercises every recognized ES5 node kind
//! in one document, then the tests check the graph-level guarantees: edge
//! symmetry, phase partitioning, id uniqueness, reconstruction, and
//! deterministic reconstruction on repeated analysis.

use analyse_control::{analyse, NodeKind};
use serde_json::{json, Value};

use crate::common::*;

/// One program touching all 38 recognized node kinds.
fn kitchen_sink() -> Value {
    let with_stmt = json!({
        "type": "WithStatement",
        "object": ident("obj"),
        "body": block(vec![expr_stmt(json!({
            "type": "UpdateExpression",
            "operator": "++",
            "prefix": false,
            "argument": ident("count")
        }))])
    });

    let do_while = json!({
        "type": "DoWhileStatement",
        "body": block(vec![expr_stmt(json!({
            "type": "AssignmentExpression",
            "operator": "=",
            "left": ident("seq"),
            "right": {
                "type": "SequenceExpression",
                "expressions": [ident("a"), ident("b")]
            }
        }))]),
        "test": json!({
            "type": "BinaryExpression",
            "operator": "<",
            "left": ident("a"),
            "right": literal(json!(10), "10")
        })
    });

    let for_loop = json!({
        "type": "ForStatement",
        "init": {
            "type": "VariableDeclaration",
            "kind": "var",
            "declarations": [{
                "type": "VariableDeclarator",
                "id": ident("i"),
                "init": literal(json!(0), "0")
            }]
        },
        "test": {
            "type": "BinaryExpression",
            "operator": "<",
            "left": ident("i"),
            "right": literal(json!(3), "3")
        },
        "update": {
            "type": "UpdateExpression",
            "operator": "++",
            "prefix": false,
            "argument": ident("i")
        },
        "body": block(vec![if_stmt(
            json!({
                "type": "BinaryExpression",
                "operator": "==",
                "left": ident("i"),
                "right": literal(json!(1), "1")
            }),
            json!({ "type": "ContinueStatement", "label": null }),
            None,
        )])
    });

    let for_in = json!({
        "type": "ForInStatement",
        "left": ident("k"),
        "right": ident("obj"),
        "body": block(vec![expr_stmt(json!({
            "type": "AssignmentExpression",
            "operator": "=",
            "left": {
                "type": "MemberExpression",
                "object": ident("arr"),
                "property": ident("k"),
                "computed": true
            },
            "right": {
                "type": "ConditionalExpression",
                "test": {
                    "type": "MemberExpression",
                    "object": { "type": "ThisExpression" },
                    "property": ident("x"),
                    "computed": false
                },
                "consequent": {
                    "type": "UnaryExpression",
                    "operator": "-",
                    "prefix": true,
                    "argument": ident("k")
                },
                "alternate": {
                    "type": "NewExpression",
                    "callee": ident("Box"),
                    "arguments": [ident("k")]
                }
            }
        }))])
    });

    let labeled_loop = json!({
        "type": "LabeledStatement",
        "label": ident("outer"),
        "body": while_stmt(
            json!({
                "type": "LogicalExpression",
                "operator": "&&",
                "left": ident("a"),
                "right": ident("b")
            }),
            block(vec![json!({
                "type": "SwitchStatement",
                "discriminant": ident("a"),
                "cases": [
                    {
                        "type": "SwitchCase",
                        "test": literal(json!(1), "1"),
                        "consequent": [{
                            "type": "BreakStatement",
                            "label": ident("outer")
                        }]
                    },
                    {
                        "type": "SwitchCase",
                        "test": null,
                        "consequent": [call_stmt("r")]
                    }
                ]
            })]),
        )
    });

    let try_block = try_stmt(
        vec![throw_stmt(json!({
            "type": "ObjectExpression",
            "properties": [{
                "type": "Property",
                "key": ident("msg"),
                "value": literal(json!("bad"), "\"bad\""),
                "kind": "init"
            }]
        }))],
        Some((
            "err",
            vec![expr_stmt(json!({
                "type": "AssignmentExpression",
                "operator": "=",
                "left": ident("handler"),
                "right": {
                    "type": "FunctionExpression",
                    "id": ident("inner"),
                    "params": [],
                    "body": block(vec![return_stmt(Some(json!({
                        "type": "ArrayExpression",
                        "elements": [literal(json!(1), "1"), null, ident("err")]
                    })))])
                }
            }))],
        )),
        Some(vec![call_stmt("done")]),
    );

    program(vec![
        json!({
            "type": "VariableDeclaration",
            "kind": "var",
            "declarations": [
                {
                    "type": "VariableDeclarator",
                    "id": ident("a"),
                    "init": literal(json!(1), "1")
                },
                {
                    "type": "VariableDeclarator",
                    "id": ident("b"),
                    "init": null
                }
            ]
        }),
        func_decl(
            "main",
            vec![
                with_stmt,
                do_while,
                for_loop,
                for_in,
                labeled_loop,
                try_block,
                return_stmt(Some(ident("b"))),
            ],
        ),
        expr_stmt(call("main", vec![ident("a")])),
    ])
}

#[test]
fn test_kitchen_sink_covers_every_node_kind() {
    let ast = kitchen_sink();
    let graph = analyse(&ast).unwrap();
    let mut kinds: Vec<NodeKind> = graph.nodes().map(|(_, node)| node.kind()).collect();
    kinds.sort_by_key(|k| k.as_str());
    kinds.dedup();
    assert_eq!(kinds.len(), 38, "every recognized kind appears: {:?}", kinds);
}

#[test]
fn test_edge_symmetry_holds_everywhere() {
    let graph = analyse(&kitchen_sink()).unwrap();
    graph.validate().expect("store invariants");
    for event in graph.events() {
        for succ in event.forward_flows() {
            assert!(
                succ.backward_flows().any(|p| p.id() == event.id()),
                "forward edge {:?} -> {:?} lacks its backward twin",
                event,
                succ
            );
        }
        for pred in event.backward_flows() {
            assert!(
                pred.forward_flows().any(|s| s.id() == event.id()),
                "backward edge {:?} -> {:?} lacks its forward twin",
                pred,
                event
            );
        }
    }
}

#[test]
fn test_phase_predicates_partition_events() {
    let graph = analyse(&kitchen_sink()).unwrap();
    for event in graph.events() {
        let count = [event.is_hoist(), event.is_enter(), event.is_exit()]
            .iter()
            .filter(|&&flag| flag)
            .count();
        assert_eq!(count, 1);
    }
}

#[test]
fn test_event_ids_are_unique() {
    let graph = analyse(&kitchen_sink()).unwrap();
    let mut ids: Vec<_> = graph.events().map(|e| e.id()).collect();
    let before = ids.len();
    ids.sort_by_key(|id| format!("{}", id));
    ids.dedup();
    assert_eq!(ids.len(), before);
}

#[test]
fn test_every_event_resolves_its_node() {
    let graph = analyse(&kitchen_sink()).unwrap();
    for event in graph.events() {
        assert!(graph.get_node(event.node_id()).is_some());
    }
}

#[test]
fn test_reconstruction_equals_input() {
    let ast = kitchen_sink();
    let graph = analyse(&ast).unwrap();
    let rebuilt = graph.node_to_estree(graph.root_node()).unwrap();
    assert_eq!(rebuilt, ast);
}

#[test]
fn test_repeated_analysis_is_isomorphic() {
    let ast = kitchen_sink();
    let first = analyse(&ast).unwrap();
    let second = analyse(&ast).unwrap();
    assert_eq!(first.event_count(), second.event_count());
    for (a, b) in first.events().zip(second.events()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.phase(), b.phase());
        assert_eq!(a.node_id(), b.node_id());
        assert_eq!(
            a.forward_flows().map(|f| f.id()).collect::<Vec<_>>(),
            b.forward_flows().map(|f| f.id()).collect::<Vec<_>>(),
        );
    }
}

#[test]
fn test_program_hoists_precede_program_enter() {
    let graph = analyse(&kitchen_sink()).unwrap();
    let program_enter = graph
        .events()
        .find(|e| e.is_enter() && e.node().kind() == NodeKind::Program)
        .unwrap();
    // Program scope hoists: `var a`, `var b`, and `function main`.
    let program_scope_hoists: Vec<_> = graph
        .events()
        .filter(|e| {
            e.is_hoist()
                && matches!(
                    e.node().kind(),
                    NodeKind::FunctionDeclaration | NodeKind::VariableDeclarator
                )
        })
        .take(3)
        .collect();
    for hoist in &program_scope_hoists {
        assert!(
            flows_before(*hoist, program_enter),
            "{:?} must precede the program's enter",
            hoist
        );
    }
}

#[test]
fn test_empty_program_boundary() {
    let graph = analyse(&program(vec![])).unwrap();
    assert_eq!(graph.event_count(), 2, "just enter and exit");
    assert!(graph.start_of_flow().is_enter());
    assert!(graph.end_of_flow().is_exit());
    assert_eq!(count_paths(&graph), 1.0);
}

#[test]
fn test_unreachable_break_has_empty_backward_edges() {
    // function f() { while (x) { return; break; } }
    let ast = program(vec![func_decl(
        "f",
        vec![while_stmt(
            ident("x"),
            block(vec![
                return_stmt(None),
                json!({ "type": "BreakStatement", "label": null }),
            ]),
        )],
    )]);
    let graph = analyse(&ast).unwrap();
    let break_enter = graph
        .events()
        .find(|e| e.is_enter() && e.node().kind() == NodeKind::BreakStatement)
        .expect("break still produces events");
    assert_eq!(break_enter.backward_flows().count(), 0);
    assert!(!graph.is_reachable(break_enter));
    // The jump edge itself still exists for backward traversal from the
    // loop exit.
    assert!(break_enter.forward_flows().count() > 0);
}

#[test]
fn test_function_bodies_are_separate_regions() {
    // The body of an unevaluated function expression is present but not
    // reachable from the start of flow.
    let ast = program(vec![if_stmt(
        ident("never"),
        block(vec![expr_stmt(json!({
            "type": "FunctionExpression",
            "id": null,
            "params": [],
            "body": block(vec![call_stmt("inner")])
        }))]),
        None,
    )]);
    let graph = analyse(&ast).unwrap();
    let inner_call = graph
        .events()
        .find(|e| e.is_enter() && e.node().identifier_name() == Some("inner"))
        .unwrap();
    // Reachable: the expression is on a conditional path from the start.
    let site_enter = graph
        .events()
        .find(|e| e.is_enter() && e.node().kind() == NodeKind::FunctionExpression)
        .unwrap();
    assert!(graph.is_reachable(site_enter));
    assert!(
        graph.is_reachable(inner_call),
        "the body region hangs off the expression's enter"
    );
    // But the body contributes no extra path between site enter and exit:
    // its region terminates at the body block's exit.
    let body_exit = graph
        .events()
        .find(|e| {
            e.is_exit()
                && e.node().kind() == NodeKind::BlockStatement
                && e.forward_flows().next().is_none()
        })
        .expect("function body exit is terminal");
    assert!(graph.is_reachable(body_exit));
}
