//! Control flow construction.
//!
//! The builder walks the lowered AST once, applying one wiring rule per node
//! kind. Every rule has the shape `wire(node, in) -> out`: the incoming
//! events are linked to the node's `Enter`, the rule wires the node's
//! interior, and the returned set is what flows onward — normally the node's
//! `Exit`, or nothing when the node cannot complete normally (jump
//! statements, or composites whose every branch jumps away).
//!
//! Hoisting runs before each scope's body: function declarations first, then
//! `var` declarators, in source order. Declarations are collected
//! syntactically (never-taken branches still hoist, the V8/IE/Safari
//! convention). Each function declaration's hoist event forks into the
//! function's own region, which is wired independently and terminates at the
//! function body's exit.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ast::{AstArena, AstNode, NodeId};
use crate::error::{FlowError, Result};
use crate::flow::context::{BuilderContext, Frame};
use crate::flow::types::{FlowEventId, FlowStore, Phase};

/// Build the flow store for a lowered program.
///
/// Returns the finished store plus the designated start and end events.
pub(crate) fn build_flow(arena: &AstArena) -> Result<(FlowStore, FlowEventId, FlowEventId)> {
    FlowBuilder::new(arena).build()
}

/// Hoistable declarations of one scope, in source order per group.
#[derive(Debug, Default)]
struct HoistSet {
    functions: Vec<NodeId>,
    var_declarators: Vec<NodeId>,
}

struct FlowBuilder<'a> {
    arena: &'a AstArena,
    store: FlowStore,
    ctx: BuilderContext,
    enters: FxHashMap<NodeId, FlowEventId>,
    exits: FxHashMap<NodeId, FlowEventId>,
}

impl<'a> FlowBuilder<'a> {
    fn new(arena: &'a AstArena) -> Self {
        Self {
            arena,
            store: FlowStore::new(),
            ctx: BuilderContext::new(),
            enters: FxHashMap::default(),
            exits: FxHashMap::default(),
        }
    }

    fn build(mut self) -> Result<(FlowStore, FlowEventId, FlowEventId)> {
        let program = self.arena.root();
        let body = match self.node(program) {
            AstNode::Program { body } => body.as_slice(),
            other => {
                return Err(FlowError::malformed(
                    other.kind().as_str(),
                    "flow construction requires a Program root",
                ))
            }
        };

        let enter = self.enter_of(program);
        let exit = self.exit_of(program);
        self.ctx.push(Frame::Program { sink: exit });

        let (hoist_head, hoist_tail) = self.emit_hoists(body)?;
        if let Some(tail) = hoist_tail {
            self.store.link(tail, enter);
        }

        let out = self.wire_sequence(body, vec![enter])?;
        self.link_all(&out, exit);
        self.ctx.pop();

        let start = hoist_head.unwrap_or(enter);
        debug!(
            events = self.store.len(),
            nodes = self.arena.len(),
            "control flow construction complete"
        );
        Ok((self.store, start, exit))
    }

    // =========================================================================
    // Shared plumbing
    // =========================================================================

    /// Fetch an AST node. The arena outlives the builder, so the reference
    /// stays valid across store mutations.
    fn node(&self, id: NodeId) -> &'a AstNode {
        self.arena.node(id)
    }

    /// The `Enter` event of a node, created on first use. Memoized so rules
    /// can pre-create jump targets (loop re-tests, finaliser entries) before
    /// the target node itself is wired.
    fn enter_of(&mut self, node: NodeId) -> FlowEventId {
        if let Some(&event) = self.enters.get(&node) {
            return event;
        }
        let event = self.store.create(Phase::Enter, node);
        self.enters.insert(node, event);
        event
    }

    /// The `Exit` event of a node, created on first use.
    fn exit_of(&mut self, node: NodeId) -> FlowEventId {
        if let Some(&event) = self.exits.get(&node) {
            return event;
        }
        let event = self.store.create(Phase::Exit, node);
        self.exits.insert(node, event);
        event
    }

    fn link_all(&mut self, from: &[FlowEventId], to: FlowEventId) {
        for &event in from {
            self.store.link(event, to);
        }
    }

    /// Link `outs` into the node's exit, then report what flows onward:
    /// the exit if anything reaches it (including jump edges created while
    /// wiring the interior), nothing otherwise.
    fn seal(&mut self, node: NodeId, outs: Vec<FlowEventId>) -> Vec<FlowEventId> {
        let exit = self.exit_of(node);
        self.link_all(&outs, exit);
        self.finish(node)
    }

    fn finish(&mut self, node: NodeId) -> Vec<FlowEventId> {
        let exit = self.exit_of(node);
        if self.store.get(exit).backward.is_empty() {
            Vec::new()
        } else {
            vec![exit]
        }
    }

    fn wire_sequence(
        &mut self,
        nodes: &[NodeId],
        mut current: Vec<FlowEventId>,
    ) -> Result<Vec<FlowEventId>> {
        for &node in nodes {
            current = self.wire(node, &current)?;
        }
        Ok(current)
    }

    /// Name of an identifier node, for labels.
    fn identifier_name(&self, node: NodeId) -> Result<String> {
        let ast = self.node(node);
        ast.identifier_name().map(str::to_owned).ok_or_else(|| {
            FlowError::malformed(ast.kind().as_str(), "expected an Identifier")
        })
    }

    /// Whether a labeled statement ultimately labels a loop or switch,
    /// seeing through stacked labels (`a: b: while (...) ...`).
    fn labels_breakable(&self, mut node: NodeId) -> bool {
        loop {
            match self.node(node) {
                AstNode::LabeledStatement { body, .. } => node = *body,
                other => return other.is_breakable(),
            }
        }
    }

    // =========================================================================
    // Per-kind wiring rules
    // =========================================================================

    fn wire(&mut self, node: NodeId, ins: &[FlowEventId]) -> Result<Vec<FlowEventId>> {
        trace!(node = %node, kind = %self.node(node).kind(), "wiring node");
        let enter = self.enter_of(node);
        self.link_all(ins, enter);

        match self.node(node) {
            AstNode::Program { .. } => Err(FlowError::malformed(
                "Program",
                "Program nodes cannot be nested",
            )),
            AstNode::SwitchCase { .. } => Err(FlowError::malformed(
                "SwitchCase",
                "switch case outside of a switch statement",
            )),

            AstNode::BlockStatement { body } => {
                let body = body.as_slice();
                let out = self.wire_sequence(body, vec![enter])?;
                Ok(self.seal(node, out))
            }

            AstNode::ExpressionStatement { expression } => {
                let out = self.wire(*expression, &[enter])?;
                Ok(self.seal(node, out))
            }

            AstNode::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let (test, consequent, alternate) = (*test, *consequent, *alternate);
                let test_out = self.wire(test, &[enter])?;
                let mut outs = self.wire(consequent, &test_out)?;
                match alternate {
                    Some(alternate) => outs.extend(self.wire(alternate, &test_out)?),
                    // No else branch: the false edge of the test skips to
                    // the statement's exit.
                    None => outs.extend_from_slice(&test_out),
                }
                Ok(self.seal(node, outs))
            }

            AstNode::LabeledStatement { label, body } => {
                let name = self.identifier_name(*label)?;
                let body = *body;
                if self.labels_breakable(body) {
                    // The loop or switch rule claims the label for its frame.
                    self.ctx.push_label(name);
                    let out = self.wire(body, &[enter])?;
                    Ok(self.seal(node, out))
                } else {
                    let exit = self.exit_of(node);
                    self.ctx.push(Frame::Labeled {
                        label: name,
                        break_to: exit,
                    });
                    let out = self.wire(body, &[enter])?;
                    self.ctx.pop();
                    Ok(self.seal(node, out))
                }
            }

            AstNode::BreakStatement { label } => {
                let label = (*label).map(|l| self.identifier_name(l)).transpose()?;
                let route = self.ctx.resolve_break(label.as_deref())?;
                let hop = self.ctx.thread(&route);
                self.store.link(enter, hop);
                self.exit_of(node);
                Ok(Vec::new())
            }

            AstNode::ContinueStatement { label } => {
                let label = (*label).map(|l| self.identifier_name(l)).transpose()?;
                let route = self.ctx.resolve_continue(label.as_deref())?;
                let hop = self.ctx.thread(&route);
                self.store.link(enter, hop);
                self.exit_of(node);
                Ok(Vec::new())
            }

            AstNode::ReturnStatement { argument } => {
                let source = match argument {
                    Some(argument) => self.wire(*argument, &[enter])?,
                    None => vec![enter],
                };
                let route = self.ctx.resolve_return()?;
                let hop = self.ctx.thread(&route);
                self.link_all(&source, hop);
                self.exit_of(node);
                Ok(Vec::new())
            }

            AstNode::ThrowStatement { argument } => {
                let source = self.wire(*argument, &[enter])?;
                let route = self.ctx.resolve_throw()?;
                let hop = self.ctx.thread(&route);
                self.link_all(&source, hop);
                self.exit_of(node);
                Ok(Vec::new())
            }

            AstNode::WithStatement { object, body } => {
                let (object, body) = (*object, *body);
                let object_out = self.wire(object, &[enter])?;
                let body_out = self.wire(body, &object_out)?;
                Ok(self.seal(node, body_out))
            }

            AstNode::WhileStatement { test, body } => {
                let (test, body) = (*test, *body);
                let exit = self.exit_of(node);
                let labels = self.ctx.take_labels();
                let test_enter = self.enter_of(test);
                let test_out = self.wire(test, &[enter])?;
                self.ctx.push(Frame::Loop {
                    labels,
                    break_to: exit,
                    continue_to: test_enter,
                });
                let body_out = self.wire(body, &test_out)?;
                self.ctx.pop();
                // Back edge into the re-test, then the loop exit fork.
                self.link_all(&body_out, test_enter);
                self.link_all(&test_out, exit);
                Ok(self.finish(node))
            }

            AstNode::DoWhileStatement { body, test } => {
                let (body, test) = (*body, *test);
                let exit = self.exit_of(node);
                let labels = self.ctx.take_labels();
                let body_enter = self.enter_of(body);
                let test_enter = self.enter_of(test);
                self.ctx.push(Frame::Loop {
                    labels,
                    break_to: exit,
                    continue_to: test_enter,
                });
                let body_out = self.wire(body, &[enter])?;
                self.ctx.pop();
                let test_out = self.wire(test, &body_out)?;
                self.link_all(&test_out, body_enter);
                self.link_all(&test_out, exit);
                Ok(self.finish(node))
            }

            AstNode::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let (init, test, update, body) = (*init, *test, *update, *body);
                let exit = self.exit_of(node);
                let labels = self.ctx.take_labels();

                let mut current = vec![enter];
                if let Some(init) = init {
                    current = self.wire(init, &current)?;
                }
                let header_out = match test {
                    Some(test) => self.wire(test, &current)?,
                    // A missing test is always true: no edge to the exit.
                    None => current,
                };

                let continue_to = match (update, test) {
                    (Some(update), _) => self.enter_of(update),
                    (None, Some(test)) => self.enter_of(test),
                    (None, None) => self.enter_of(body),
                };
                self.ctx.push(Frame::Loop {
                    labels,
                    break_to: exit,
                    continue_to,
                });
                let body_out = self.wire(body, &header_out)?;
                self.ctx.pop();

                let back_in = match update {
                    Some(update) => self.wire(update, &body_out)?,
                    None => body_out,
                };
                match test {
                    Some(test) => {
                        let test_enter = self.enter_of(test);
                        self.link_all(&back_in, test_enter);
                        self.link_all(&header_out, exit);
                    }
                    None => {
                        let body_enter = self.enter_of(body);
                        self.link_all(&back_in, body_enter);
                    }
                }
                Ok(self.finish(node))
            }

            AstNode::ForInStatement { left, right, body } => {
                let (left, right, body) = (*left, *right, *body);
                let exit = self.exit_of(node);
                let labels = self.ctx.take_labels();

                let right_out = self.wire(right, &[enter])?;
                // The loop target's enter doubles as the "has next" test:
                // it forks into the target (a key remains) or the exit.
                let left_enter = self.enter_of(left);
                let left_out = self.wire(left, &right_out)?;

                self.ctx.push(Frame::Loop {
                    labels,
                    break_to: exit,
                    continue_to: left_enter,
                });
                let body_out = self.wire(body, &left_out)?;
                self.ctx.pop();

                self.link_all(&body_out, left_enter);
                self.store.link(left_enter, exit);
                Ok(self.finish(node))
            }

            AstNode::SwitchStatement {
                discriminant,
                cases,
            } => {
                let discriminant = *discriminant;
                let cases = cases.as_slice();
                let exit = self.exit_of(node);
                let labels = self.ctx.take_labels();

                let disc_out = self.wire(discriminant, &[enter])?;
                self.ctx.push(Frame::Switch {
                    labels,
                    break_to: exit,
                });

                // Selection chain: non-default tests in source order; each
                // test's out set forks to its consequent and to the next
                // test. The last false edge reaches the default, or the
                // switch exit when there is none.
                let mut selection = disc_out;
                let mut test_outs: FxHashMap<NodeId, Vec<FlowEventId>> = FxHashMap::default();
                let mut default_case = None;
                for &case in cases {
                    let test = match self.node(case) {
                        AstNode::SwitchCase { test, .. } => *test,
                        other => {
                            return Err(FlowError::malformed(
                                other.kind().as_str(),
                                "switch cases must be SwitchCase nodes",
                            ))
                        }
                    };
                    match test {
                        Some(test) => {
                            let case_enter = self.enter_of(case);
                            self.link_all(&selection, case_enter);
                            let test_out = self.wire(test, &[case_enter])?;
                            test_outs.insert(case, test_out.clone());
                            selection = test_out;
                        }
                        None => {
                            if default_case.replace(case).is_some() {
                                return Err(FlowError::malformed(
                                    "SwitchStatement",
                                    "more than one default case",
                                ));
                            }
                        }
                    }
                }
                match default_case {
                    Some(case) => {
                        let case_enter = self.enter_of(case);
                        self.link_all(&selection, case_enter);
                    }
                    None => self.link_all(&selection, exit),
                }

                // Consequents in lexical order, including the default in its
                // lexical position; a completed consequent falls through to
                // the next one without re-testing.
                let mut fall: Vec<FlowEventId> = Vec::new();
                for &case in cases {
                    let consequent = match self.node(case) {
                        AstNode::SwitchCase { consequent, .. } => consequent.as_slice(),
                        _ => unreachable!("validated above"),
                    };
                    let mut current = match test_outs.get(&case) {
                        Some(test_out) => test_out.clone(),
                        None => vec![self.enter_of(case)],
                    };
                    current.extend_from_slice(&fall);
                    let current = self.wire_sequence(consequent, current)?;
                    let case_exit = self.exit_of(case);
                    self.link_all(&current, case_exit);
                    fall = if self.store.get(case_exit).backward.is_empty() {
                        Vec::new()
                    } else {
                        vec![case_exit]
                    };
                }
                self.link_all(&fall, exit);

                self.ctx.pop();
                Ok(self.finish(node))
            }

            AstNode::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                let (block, handler, finalizer) = (*block, *handler, *finalizer);
                let exit = self.exit_of(node);

                if let Some(finalizer) = finalizer {
                    let finally_enter = self.enter_of(finalizer);
                    self.ctx.push(Frame::Finally {
                        entry: finally_enter,
                        pending: Vec::new(),
                    });
                }
                if let Some(handler) = handler {
                    let catch_enter = self.enter_of(handler);
                    self.ctx.push(Frame::Catch { entry: catch_enter });
                }

                let block_out = self.wire(block, &[enter])?;

                if handler.is_some() {
                    self.ctx.pop();
                }
                // The handler is entered only by explicit throw edges, which
                // were linked while wiring the protected block.
                let catch_out = match handler {
                    Some(handler) => self.wire(handler, &[])?,
                    None => Vec::new(),
                };

                let pending = match finalizer {
                    Some(_) => match self.ctx.pop() {
                        Some(Frame::Finally { pending, .. }) => pending,
                        _ => unreachable!("finally frame pushed above"),
                    },
                    None => Vec::new(),
                };

                match finalizer {
                    Some(finalizer) => {
                        let mut finally_in = block_out;
                        finally_in.extend(catch_out);
                        let completes_normally = !finally_in.is_empty();
                        let finally_out = self.wire(finalizer, &finally_in)?;
                        if completes_normally {
                            self.link_all(&finally_out, exit);
                        }
                        // Jumps that crossed the finaliser resume toward
                        // their original targets. If the finaliser itself
                        // completed abnormally its out set is empty and the
                        // pending continuations are dropped.
                        for target in pending {
                            self.link_all(&finally_out, target);
                        }
                    }
                    None => {
                        let mut outs = block_out;
                        outs.extend(catch_out);
                        self.link_all(&outs, exit);
                    }
                }
                Ok(self.finish(node))
            }

            AstNode::CatchClause { param, body } => {
                let (param, body) = (*param, *body);
                let param_out = self.wire(param, &[enter])?;
                let body_out = self.wire(body, &param_out)?;
                Ok(self.seal(node, body_out))
            }

            AstNode::FunctionDeclaration { .. } => {
                // The declaration's work happened during hoisting; at its
                // site it is a no-op.
                let exit = self.exit_of(node);
                self.store.link(enter, exit);
                Ok(vec![exit])
            }

            AstNode::FunctionExpression { .. } => {
                let exit = self.exit_of(node);
                self.store.link(enter, exit);
                // Evaluating the expression makes the body's region
                // reachable; the region terminates internally.
                self.wire_function_region(node, enter)?;
                Ok(vec![exit])
            }

            AstNode::VariableDeclaration { declarations, .. } => {
                let declarations = declarations.as_slice();
                let out = self.wire_sequence(declarations, vec![enter])?;
                Ok(self.seal(node, out))
            }

            AstNode::VariableDeclarator { id, init } => {
                let (id, init) = (*id, *init);
                let target_out = self.wire(id, &[enter])?;
                let out = match init {
                    Some(init) => self.wire(init, &target_out)?,
                    None => target_out,
                };
                Ok(self.seal(node, out))
            }

            AstNode::ThisExpression | AstNode::Identifier { .. } | AstNode::Literal { .. } => {
                let exit = self.exit_of(node);
                self.store.link(enter, exit);
                Ok(vec![exit])
            }

            AstNode::ArrayExpression { elements } => {
                let elements = elements.as_slice();
                let mut current = vec![enter];
                for element in elements {
                    if let Some(element) = element {
                        current = self.wire(*element, &current)?;
                    }
                }
                Ok(self.seal(node, current))
            }

            AstNode::ObjectExpression { properties } => {
                let properties = properties.as_slice();
                let out = self.wire_sequence(properties, vec![enter])?;
                Ok(self.seal(node, out))
            }

            AstNode::Property { key, value, .. } => {
                let (key, value) = (*key, *value);
                let key_out = self.wire(key, &[enter])?;
                let value_out = self.wire(value, &key_out)?;
                Ok(self.seal(node, value_out))
            }

            AstNode::SequenceExpression { expressions } => {
                let expressions = expressions.as_slice();
                let out = self.wire_sequence(expressions, vec![enter])?;
                Ok(self.seal(node, out))
            }

            AstNode::UnaryExpression { argument, .. }
            | AstNode::UpdateExpression { argument, .. } => {
                let argument = *argument;
                let out = self.wire(argument, &[enter])?;
                Ok(self.seal(node, out))
            }

            AstNode::BinaryExpression { left, right, .. }
            | AstNode::AssignmentExpression { left, right, .. } => {
                let (left, right) = (*left, *right);
                let left_out = self.wire(left, &[enter])?;
                let right_out = self.wire(right, &left_out)?;
                Ok(self.seal(node, right_out))
            }

            AstNode::LogicalExpression { left, right, .. } => {
                let (left, right) = (*left, *right);
                let exit = self.exit_of(node);
                let left_out = self.wire(left, &[enter])?;
                // Fork after the left operand: evaluate the right operand,
                // or short-circuit straight to the exit.
                let right_out = self.wire(right, &left_out)?;
                self.link_all(&left_out, exit);
                self.link_all(&right_out, exit);
                Ok(self.finish(node))
            }

            AstNode::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                let (test, consequent, alternate) = (*test, *consequent, *alternate);
                let test_out = self.wire(test, &[enter])?;
                let mut outs = self.wire(consequent, &test_out)?;
                outs.extend(self.wire(alternate, &test_out)?);
                Ok(self.seal(node, outs))
            }

            AstNode::CallExpression { callee, arguments }
            | AstNode::NewExpression { callee, arguments } => {
                let callee = *callee;
                let arguments = arguments.as_slice();
                let callee_out = self.wire(callee, &[enter])?;
                let out = self.wire_sequence(arguments, callee_out)?;
                Ok(self.seal(node, out))
            }

            AstNode::MemberExpression {
                object, property, ..
            } => {
                let (object, property) = (*object, *property);
                let object_out = self.wire(object, &[enter])?;
                let property_out = self.wire(property, &object_out)?;
                Ok(self.seal(node, property_out))
            }
        }
    }

    // =========================================================================
    // Hoisting
    // =========================================================================

    /// Emit the hoist chain for one scope and wire function regions off
    /// their hoist events. Returns the chain's head and tail.
    fn emit_hoists(
        &mut self,
        statements: &[NodeId],
    ) -> Result<(Option<FlowEventId>, Option<FlowEventId>)> {
        let mut set = HoistSet::default();
        self.collect_from(statements, &mut set);
        if !set.functions.is_empty() || !set.var_declarators.is_empty() {
            trace!(
                functions = set.functions.len(),
                vars = set.var_declarators.len(),
                "emitting hoist chain"
            );
        }

        let mut head = None;
        let mut tail: Option<FlowEventId> = None;
        let mut function_events = Vec::with_capacity(set.functions.len());

        for &function in &set.functions {
            let event = self.store.create(Phase::Hoist, function);
            match tail {
                Some(prev) => self.store.link(prev, event),
                None => head = Some(event),
            }
            tail = Some(event);
            function_events.push((function, event));
        }
        for &declarator in &set.var_declarators {
            let event = self.store.create(Phase::Hoist, declarator);
            match tail {
                Some(prev) => self.store.link(prev, event),
                None => head = Some(event),
            }
            tail = Some(event);
        }

        // Each declaration's body is reachable only via its hoist event,
        // which forks into the function's own region.
        for (function, event) in function_events {
            self.wire_function_region(function, event)?;
        }

        Ok((head, tail))
    }

    /// Wire a function body as an independent region rooted at `root`
    /// (a declaration's hoist event, or an expression's site enter).
    fn wire_function_region(&mut self, function: NodeId, root: FlowEventId) -> Result<()> {
        let body = match self.node(function) {
            AstNode::FunctionDeclaration { body, .. }
            | AstNode::FunctionExpression { body, .. } => *body,
            other => {
                return Err(FlowError::malformed(
                    other.kind().as_str(),
                    "expected a function node",
                ))
            }
        };
        let statements = match self.node(body) {
            AstNode::BlockStatement { body } => body.as_slice(),
            other => {
                return Err(FlowError::malformed(
                    other.kind().as_str(),
                    "function body must be a BlockStatement",
                ))
            }
        };

        let body_exit = self.exit_of(body);
        self.ctx.push(Frame::Function { exit: body_exit });

        let (hoist_head, hoist_tail) = self.emit_hoists(statements)?;
        let region_in = match (hoist_head, hoist_tail) {
            (Some(head), Some(tail)) => {
                self.store.link(root, head);
                vec![tail]
            }
            _ => vec![root],
        };
        // The region terminates at the body's exit; nothing flows back into
        // the enclosing graph.
        self.wire(body, &region_in)?;
        self.ctx.pop();
        Ok(())
    }

    /// Syntactic collection of hoistable declarations, stopping at nested
    /// function boundaries.
    fn collect_from(&self, statements: &[NodeId], set: &mut HoistSet) {
        for &statement in statements {
            self.collect_statement(statement, set);
        }
    }

    fn collect_statement(&self, node: NodeId, set: &mut HoistSet) {
        match self.node(node) {
            AstNode::FunctionDeclaration { .. } => set.functions.push(node),
            AstNode::VariableDeclaration { declarations, kind } => {
                if kind == "var" {
                    set.var_declarators.extend_from_slice(declarations);
                }
            }
            AstNode::BlockStatement { body } => self.collect_from(body, set),
            AstNode::IfStatement {
                consequent,
                alternate,
                ..
            } => {
                self.collect_statement(*consequent, set);
                if let Some(alternate) = alternate {
                    self.collect_statement(*alternate, set);
                }
            }
            AstNode::LabeledStatement { body, .. } | AstNode::WithStatement { body, .. } => {
                self.collect_statement(*body, set)
            }
            AstNode::SwitchStatement { cases, .. } => {
                for &case in cases.iter() {
                    if let AstNode::SwitchCase { consequent, .. } = self.node(case) {
                        self.collect_from(consequent, set);
                    }
                }
            }
            AstNode::WhileStatement { body, .. } | AstNode::DoWhileStatement { body, .. } => {
                self.collect_statement(*body, set)
            }
            AstNode::ForStatement { init, body, .. } => {
                if let Some(init) = init {
                    self.collect_for_target(*init, set);
                }
                self.collect_statement(*body, set);
            }
            AstNode::ForInStatement { left, body, .. } => {
                self.collect_for_target(*left, set);
                self.collect_statement(*body, set);
            }
            AstNode::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                self.collect_statement(*block, set);
                if let Some(handler) = handler {
                    if let AstNode::CatchClause { body, .. } = self.node(*handler) {
                        self.collect_statement(*body, set);
                    }
                }
                if let Some(finalizer) = finalizer {
                    self.collect_statement(*finalizer, set);
                }
            }
            _ => {}
        }
    }

    /// `for`-initialisers and `for-in` targets may be declarations.
    fn collect_for_target(&self, node: NodeId, set: &mut HoistSet) {
        if let AstNode::VariableDeclaration { declarations, kind } = self.node(node) {
            if kind == "var" {
                set.var_declarators.extend_from_slice(declarations);
            }
        }
    }
}
