//! End-to-end path-counting scenarios.
//!
//! Each test lowers the ESTree shape of a small ES5 program and checks the
//! number of distinct terminating paths reachable from the start of flow,
//! using the depth-first harness in `common`.

use analyse_control::{analyse, NodeKind};

use crate::common::*;

/// `{ helloWorld(); }`
#[test]
fn test_single_statement_has_one_path() {
    let ast = program(vec![block(vec![call_stmt("helloWorld")])]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), 1.0);
}

/// `if (x) { hello(); } else { world(); }`
#[test]
fn test_if_else_has_two_paths() {
    let ast = program(vec![if_stmt(
        ident("x"),
        block(vec![call_stmt("hello")]),
        Some(block(vec![call_stmt("world")])),
    )]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), 2.0);
}

/// `if (a) { p(); } if (b) { q(); } else { r(); }`
#[test]
fn test_sequential_conditionals_multiply_paths() {
    let ast = program(vec![
        if_stmt(ident("a"), block(vec![call_stmt("p")]), None),
        if_stmt(
            ident("b"),
            block(vec![call_stmt("q")]),
            Some(block(vec![call_stmt("r")])),
        ),
    ]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), 4.0);
}

/// `while (x) { f(); }` - the loop's back edge makes the path count
/// infinite; the harness detects the revisit.
#[test]
fn test_loop_has_infinite_paths() {
    let ast = program(vec![while_stmt(
        ident("x"),
        block(vec![call_stmt("f")]),
    )]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), f64::INFINITY);
}

/// `function y(){ return x; var x; } y();`
///
/// Both hoists happen before the program's enter event; inside `y` the
/// `var x` hoist precedes the lexically-earlier `return`.
#[test]
fn test_hoisting_reorders_declarations() {
    let ast = program(vec![
        func_decl(
            "y",
            vec![return_stmt(Some(ident("x"))), var_decl(&["x"])],
        ),
        call_stmt("y"),
    ]);
    let graph = analyse(&ast).unwrap();

    let start = graph.start_of_flow();
    assert!(start.is_hoist());
    assert_eq!(start.node().kind(), NodeKind::FunctionDeclaration);

    let var_hoist = graph
        .events()
        .find(|e| e.is_hoist() && e.node().kind() == NodeKind::VariableDeclarator)
        .expect("var x hoists inside y");
    let program_enter = graph
        .events()
        .find(|e| e.is_enter() && e.node().kind() == NodeKind::Program)
        .unwrap();
    let return_enter = graph
        .events()
        .find(|e| e.is_enter() && e.node().kind() == NodeKind::ReturnStatement)
        .unwrap();

    // Hoist(y) precedes Enter(Program) on the main chain.
    assert!(flows_before(start, program_enter));
    // Inside y's region, Hoist(var x) precedes the return despite the
    // return coming first lexically.
    assert!(flows_before(start, var_hoist));
    assert!(flows_before(var_hoist, return_enter));
    assert!(
        !flows_before(program_enter, return_enter),
        "the function body is not part of the program's own execution path"
    );
}

/// `try { throw e; } catch (e) { log(e); } finally { done(); }`
///
/// One path: the throw is unconditional, so the try body's
/// normal-completion branch is absent and flow runs
/// throw -> catch -> finally -> exit.
#[test]
fn test_unconditional_throw_caught_and_finalized() {
    let ast = program(vec![try_stmt(
        vec![throw_stmt(ident("e"))],
        Some(("e", vec![expr_stmt(call("log", vec![ident("e")]))])),
        Some(vec![call_stmt("done")]),
    )]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), 1.0);

    // The single path visits throw, catch, finally, then the try exit.
    let throw_enter = graph
        .events()
        .find(|e| e.is_enter() && e.node().kind() == NodeKind::ThrowStatement)
        .unwrap();
    let catch_enter = graph
        .events()
        .find(|e| e.is_enter() && e.node().kind() == NodeKind::CatchClause)
        .unwrap();
    let try_exit = graph
        .events()
        .find(|e| e.is_exit() && e.node().kind() == NodeKind::TryStatement)
        .unwrap();
    assert!(flows_before(throw_enter, catch_enter));
    assert!(flows_before(catch_enter, try_exit));
}

/// Fall-through: `switch (v) { case 1: one(); case 2: two(); }` runs both
/// consequents when case 1 matches.
#[test]
fn test_switch_fall_through_path_count() {
    let ast = program(vec![serde_json::json!({
        "type": "SwitchStatement",
        "discriminant": ident("v"),
        "cases": [
            {
                "type": "SwitchCase",
                "test": literal(serde_json::json!(1), "1"),
                "consequent": [call_stmt("one")]
            },
            {
                "type": "SwitchCase",
                "test": literal(serde_json::json!(2), "2"),
                "consequent": [call_stmt("two")]
            }
        ]
    })]);
    let graph = analyse(&ast).unwrap();
    // Three ways through: match 1 (falls through 2's consequent), match 2,
    // match nothing.
    assert_eq!(count_paths(&graph), 3.0);
}

/// `do { f(); } while (x)` - body runs at least once, then loops or exits.
#[test]
fn test_do_while_is_cyclic() {
    let ast = program(vec![serde_json::json!({
        "type": "DoWhileStatement",
        "body": block(vec![call_stmt("f")]),
        "test": ident("x")
    })]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), f64::INFINITY);
}

/// A conditional expression forks and joins like an if statement.
#[test]
fn test_conditional_expression_has_two_paths() {
    let ast = program(vec![expr_stmt(serde_json::json!({
        "type": "ConditionalExpression",
        "test": ident("c"),
        "consequent": call("yes", vec![]),
        "alternate": call("no", vec![])
    }))]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), 2.0);
}

/// `a && b` short-circuits: evaluate `b`, or skip straight past it.
#[test]
fn test_logical_and_has_two_paths() {
    let ast = program(vec![expr_stmt(serde_json::json!({
        "type": "LogicalExpression",
        "operator": "&&",
        "left": ident("a"),
        "right": ident("b")
    }))]);
    let graph = analyse(&ast).unwrap();
    assert_eq!(count_paths(&graph), 2.0);
}

/// A loop broken on its only path still terminates: `while (x) { break; }`.
#[test]
fn test_loop_with_unconditional_break_is_finite() {
    let ast = program(vec![while_stmt(
        ident("x"),
        block(vec![serde_json::json!({ "type": "BreakStatement", "label": null })]),
    )]);
    let graph = analyse(&ast).unwrap();
    // Test false -> exit, or test true -> break -> exit. No cycle remains
    // because the body cannot complete normally.
    assert_eq!(count_paths(&graph), 2.0);
}
