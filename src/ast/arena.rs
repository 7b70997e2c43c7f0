//! AST arena and ESTree lowering.
//!
//! Lowers an ESTree JSON document into a flat pool of shallow [`AstNode`]s.
//! The pool is append-only during lowering and read-only afterwards; flow
//! events reference nodes by [`NodeId`], so the graph never holds direct
//! pointers into the tree.
//!
//! Lowering is also where the ESTree shape is validated: an unknown `type`
//! string, a missing required child, or a non-object in a node position is a
//! [`FlowError::MalformedAst`]. Source metadata (`loc`, `range`, comments) is
//! dropped; [`AstArena::to_estree`] reconstructs the structural tree.

use serde_json::{Map, Value};
use tracing::debug;

use crate::ast::types::{AstNode, NodeId, NodeKind};
use crate::error::{FlowError, Result};

/// Flat pool of shallow AST nodes, rooted at a `Program`.
#[derive(Debug, Clone)]
pub struct AstArena {
    nodes: Vec<AstNode>,
    root: NodeId,
}

impl AstArena {
    /// Lower an ESTree JSON value into an arena.
    ///
    /// The root must be a `Program` node. Handles are assigned in pre-order,
    /// so the root is always `NodeId(0)`.
    ///
    /// # Errors
    ///
    /// [`FlowError::MalformedAst`] on unknown node kinds, missing required
    /// children, or structurally invalid nodes.
    pub fn from_estree(value: &Value) -> Result<AstArena> {
        let mut lowering = Lowering { slots: Vec::new() };
        let root = lowering.lower(value)?;

        let root_kind = lowering.slots[root.0]
            .as_ref()
            .map(AstNode::kind)
            .expect("root slot filled by lower()");
        if root_kind != NodeKind::Program {
            return Err(FlowError::malformed(
                root_kind.as_str(),
                "root node must be a Program",
            ));
        }

        let nodes: Vec<AstNode> = lowering
            .slots
            .into_iter()
            .map(|slot| slot.expect("all slots filled by lower()"))
            .collect();
        debug!("Lowered ESTree document into {} nodes", nodes.len());

        Ok(AstArena { nodes, root })
    }

    /// The root `Program` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty. Always false for a lowered program.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fetch a node by handle.
    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.0)
    }

    /// Fetch a node by handle, panicking on a stale id.
    ///
    /// Internal use only: ids produced by lowering are always in range.
    pub(crate) fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    /// Iterate over all `(id, node)` pairs in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AstNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i), n))
    }

    /// Reconstruct the deep ESTree value for a node.
    ///
    /// Expands child handles transitively. Applying this to the root yields a
    /// tree structurally equal to the lowered input (minus source metadata).
    pub fn to_estree(&self, id: NodeId) -> Option<Value> {
        self.get(id)?;
        Some(self.expand(id))
    }

    fn expand(&self, id: NodeId) -> Value {
        let node = self.node(id);
        let mut obj = Map::new();
        obj.insert("type".into(), Value::String(node.kind().as_str().into()));

        let mut put = |key: &str, value: Value| {
            obj.insert(key.into(), value);
        };
        let one = |id: &NodeId| self.expand(*id);
        let opt = |id: &Option<NodeId>| id.map(|n| self.expand(n)).unwrap_or(Value::Null);
        let many = |ids: &[NodeId]| Value::Array(ids.iter().map(one).collect());

        match node {
            AstNode::Program { body } => put("body", many(body)),
            AstNode::BlockStatement { body } => put("body", many(body)),
            AstNode::ExpressionStatement { expression } => put("expression", one(expression)),
            AstNode::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                put("test", one(test));
                put("consequent", one(consequent));
                put("alternate", opt(alternate));
            }
            AstNode::LabeledStatement { label, body } => {
                put("label", one(label));
                put("body", one(body));
            }
            AstNode::BreakStatement { label } => put("label", opt(label)),
            AstNode::ContinueStatement { label } => put("label", opt(label)),
            AstNode::WithStatement { object, body } => {
                put("object", one(object));
                put("body", one(body));
            }
            AstNode::SwitchStatement {
                discriminant,
                cases,
            } => {
                put("discriminant", one(discriminant));
                put("cases", many(cases));
            }
            AstNode::SwitchCase { test, consequent } => {
                put("test", opt(test));
                put("consequent", many(consequent));
            }
            AstNode::ReturnStatement { argument } => put("argument", opt(argument)),
            AstNode::ThrowStatement { argument } => put("argument", one(argument)),
            AstNode::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                put("block", one(block));
                put("handler", opt(handler));
                put("finalizer", opt(finalizer));
            }
            AstNode::CatchClause { param, body } => {
                put("param", one(param));
                put("body", one(body));
            }
            AstNode::WhileStatement { test, body } => {
                put("test", one(test));
                put("body", one(body));
            }
            AstNode::DoWhileStatement { body, test } => {
                put("body", one(body));
                put("test", one(test));
            }
            AstNode::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                put("init", opt(init));
                put("test", opt(test));
                put("update", opt(update));
                put("body", one(body));
            }
            AstNode::ForInStatement { left, right, body } => {
                put("left", one(left));
                put("right", one(right));
                put("body", one(body));
            }
            AstNode::FunctionDeclaration { id, params, body } => {
                put("id", one(id));
                put("params", many(params));
                put("body", one(body));
            }
            AstNode::VariableDeclaration { declarations, kind } => {
                put("declarations", many(declarations));
                put("kind", Value::String(kind.clone()));
            }
            AstNode::VariableDeclarator { id, init } => {
                put("id", one(id));
                put("init", opt(init));
            }
            AstNode::ThisExpression => {}
            AstNode::ArrayExpression { elements } => {
                let items = elements
                    .iter()
                    .map(|e| e.map(|n| self.expand(n)).unwrap_or(Value::Null))
                    .collect();
                put("elements", Value::Array(items));
            }
            AstNode::ObjectExpression { properties } => put("properties", many(properties)),
            AstNode::Property { key, value, kind } => {
                put("key", one(key));
                put("value", one(value));
                put("kind", Value::String(kind.clone()));
            }
            AstNode::FunctionExpression { id, params, body } => {
                put("id", opt(id));
                put("params", many(params));
                put("body", one(body));
            }
            AstNode::SequenceExpression { expressions } => put("expressions", many(expressions)),
            AstNode::UnaryExpression {
                operator,
                prefix,
                argument,
            } => {
                put("operator", Value::String(operator.clone()));
                put("prefix", Value::Bool(*prefix));
                put("argument", one(argument));
            }
            AstNode::BinaryExpression {
                operator,
                left,
                right,
            }
            | AstNode::AssignmentExpression {
                operator,
                left,
                right,
            }
            | AstNode::LogicalExpression {
                operator,
                left,
                right,
            } => {
                put("operator", Value::String(operator.clone()));
                put("left", one(left));
                put("right", one(right));
            }
            AstNode::UpdateExpression {
                operator,
                prefix,
                argument,
            } => {
                put("operator", Value::String(operator.clone()));
                put("prefix", Value::Bool(*prefix));
                put("argument", one(argument));
            }
            AstNode::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                put("test", one(test));
                put("consequent", one(consequent));
                put("alternate", one(alternate));
            }
            AstNode::CallExpression { callee, arguments }
            | AstNode::NewExpression { callee, arguments } => {
                put("callee", one(callee));
                put("arguments", many(arguments));
            }
            AstNode::MemberExpression {
                object,
                property,
                computed,
            } => {
                put("object", one(object));
                put("property", one(property));
                put("computed", Value::Bool(*computed));
            }
            AstNode::Identifier { name } => put("name", Value::String(name.clone())),
            AstNode::Literal { value, raw } => {
                put("value", value.clone());
                put(
                    "raw",
                    raw.as_ref()
                        .map(|r| Value::String(r.clone()))
                        .unwrap_or(Value::Null),
                );
            }
        }

        Value::Object(obj)
    }
}

/// One-shot lowering state. Slots are allocated in pre-order and filled as
/// each node's children finish lowering.
struct Lowering {
    slots: Vec<Option<AstNode>>,
}

impl Lowering {
    fn alloc(&mut self) -> NodeId {
        self.slots.push(None);
        NodeId(self.slots.len() - 1)
    }

    fn lower(&mut self, value: &Value) -> Result<NodeId> {
        let obj = value.as_object().ok_or_else(|| {
            FlowError::malformed("<non-object>", "AST node must be a JSON object")
        })?;
        let type_str = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| FlowError::malformed("<untyped>", "AST node has no `type` field"))?;
        let kind = NodeKind::from_type(type_str).ok_or_else(|| {
            FlowError::malformed(type_str, "unknown node kind for ES5")
        })?;

        let id = self.alloc();
        let node = self.lower_kind(kind, obj)?;
        self.slots[id.0] = Some(node);
        Ok(id)
    }

    fn lower_kind(&mut self, kind: NodeKind, obj: &Map<String, Value>) -> Result<AstNode> {
        Ok(match kind {
            NodeKind::Program => AstNode::Program {
                body: self.node_list(obj, "body", kind)?,
            },
            NodeKind::BlockStatement => AstNode::BlockStatement {
                body: self.node_list(obj, "body", kind)?,
            },
            NodeKind::ExpressionStatement => AstNode::ExpressionStatement {
                expression: self.child(obj, "expression", kind)?,
            },
            NodeKind::IfStatement => AstNode::IfStatement {
                test: self.child(obj, "test", kind)?,
                consequent: self.child(obj, "consequent", kind)?,
                alternate: self.opt_child(obj, "alternate")?,
            },
            NodeKind::LabeledStatement => AstNode::LabeledStatement {
                label: self.child(obj, "label", kind)?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::BreakStatement => AstNode::BreakStatement {
                label: self.opt_child(obj, "label")?,
            },
            NodeKind::ContinueStatement => AstNode::ContinueStatement {
                label: self.opt_child(obj, "label")?,
            },
            NodeKind::WithStatement => AstNode::WithStatement {
                object: self.child(obj, "object", kind)?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::SwitchStatement => AstNode::SwitchStatement {
                discriminant: self.child(obj, "discriminant", kind)?,
                cases: self.node_list(obj, "cases", kind)?,
            },
            NodeKind::SwitchCase => AstNode::SwitchCase {
                test: self.opt_child(obj, "test")?,
                consequent: self.node_list(obj, "consequent", kind)?,
            },
            NodeKind::ReturnStatement => AstNode::ReturnStatement {
                argument: self.opt_child(obj, "argument")?,
            },
            NodeKind::ThrowStatement => AstNode::ThrowStatement {
                argument: self.child(obj, "argument", kind)?,
            },
            NodeKind::TryStatement => {
                let node = AstNode::TryStatement {
                    block: self.child(obj, "block", kind)?,
                    handler: self.opt_child(obj, "handler")?,
                    finalizer: self.opt_child(obj, "finalizer")?,
                };
                if let AstNode::TryStatement {
                    handler: None,
                    finalizer: None,
                    ..
                } = node
                {
                    return Err(FlowError::malformed(
                        kind.as_str(),
                        "try statement requires a handler or a finalizer",
                    ));
                }
                node
            }
            NodeKind::CatchClause => AstNode::CatchClause {
                param: self.child(obj, "param", kind)?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::WhileStatement => AstNode::WhileStatement {
                test: self.child(obj, "test", kind)?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::DoWhileStatement => AstNode::DoWhileStatement {
                body: self.child(obj, "body", kind)?,
                test: self.child(obj, "test", kind)?,
            },
            NodeKind::ForStatement => AstNode::ForStatement {
                init: self.opt_child(obj, "init")?,
                test: self.opt_child(obj, "test")?,
                update: self.opt_child(obj, "update")?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::ForInStatement => AstNode::ForInStatement {
                left: self.child(obj, "left", kind)?,
                right: self.child(obj, "right", kind)?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::FunctionDeclaration => AstNode::FunctionDeclaration {
                id: self.child(obj, "id", kind)?,
                params: self.node_list(obj, "params", kind)?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::VariableDeclaration => {
                let declarations = self.node_list(obj, "declarations", kind)?;
                if declarations.is_empty() {
                    return Err(FlowError::malformed(
                        kind.as_str(),
                        "variable declaration requires at least one declarator",
                    ));
                }
                AstNode::VariableDeclaration {
                    declarations,
                    kind: str_or(obj, "kind", "var"),
                }
            }
            NodeKind::VariableDeclarator => AstNode::VariableDeclarator {
                id: self.child(obj, "id", kind)?,
                init: self.opt_child(obj, "init")?,
            },
            NodeKind::ThisExpression => AstNode::ThisExpression,
            NodeKind::ArrayExpression => {
                let raw = list_field(obj, "elements", kind)?;
                let mut elements = Vec::with_capacity(raw.len());
                for item in raw {
                    if item.is_null() {
                        elements.push(None);
                    } else {
                        elements.push(Some(self.lower(item)?));
                    }
                }
                AstNode::ArrayExpression { elements }
            }
            NodeKind::ObjectExpression => AstNode::ObjectExpression {
                properties: self.node_list(obj, "properties", kind)?,
            },
            NodeKind::Property => AstNode::Property {
                key: self.child(obj, "key", kind)?,
                value: self.child(obj, "value", kind)?,
                kind: str_or(obj, "kind", "init"),
            },
            NodeKind::FunctionExpression => AstNode::FunctionExpression {
                id: self.opt_child(obj, "id")?,
                params: self.node_list(obj, "params", kind)?,
                body: self.child(obj, "body", kind)?,
            },
            NodeKind::SequenceExpression => {
                let expressions = self.node_list(obj, "expressions", kind)?;
                if expressions.is_empty() {
                    return Err(FlowError::malformed(
                        kind.as_str(),
                        "sequence expression requires at least one expression",
                    ));
                }
                AstNode::SequenceExpression { expressions }
            }
            NodeKind::UnaryExpression => AstNode::UnaryExpression {
                operator: str_field(obj, "operator", kind)?,
                prefix: bool_or(obj, "prefix", true),
                argument: self.child(obj, "argument", kind)?,
            },
            NodeKind::BinaryExpression => AstNode::BinaryExpression {
                operator: str_field(obj, "operator", kind)?,
                left: self.child(obj, "left", kind)?,
                right: self.child(obj, "right", kind)?,
            },
            NodeKind::AssignmentExpression => AstNode::AssignmentExpression {
                operator: str_field(obj, "operator", kind)?,
                left: self.child(obj, "left", kind)?,
                right: self.child(obj, "right", kind)?,
            },
            NodeKind::UpdateExpression => AstNode::UpdateExpression {
                operator: str_field(obj, "operator", kind)?,
                prefix: bool_or(obj, "prefix", false),
                argument: self.child(obj, "argument", kind)?,
            },
            NodeKind::LogicalExpression => AstNode::LogicalExpression {
                operator: str_field(obj, "operator", kind)?,
                left: self.child(obj, "left", kind)?,
                right: self.child(obj, "right", kind)?,
            },
            NodeKind::ConditionalExpression => AstNode::ConditionalExpression {
                test: self.child(obj, "test", kind)?,
                consequent: self.child(obj, "consequent", kind)?,
                alternate: self.child(obj, "alternate", kind)?,
            },
            NodeKind::CallExpression => AstNode::CallExpression {
                callee: self.child(obj, "callee", kind)?,
                arguments: self.node_list(obj, "arguments", kind)?,
            },
            NodeKind::NewExpression => AstNode::NewExpression {
                callee: self.child(obj, "callee", kind)?,
                arguments: self.node_list(obj, "arguments", kind)?,
            },
            NodeKind::MemberExpression => AstNode::MemberExpression {
                object: self.child(obj, "object", kind)?,
                property: self.child(obj, "property", kind)?,
                computed: bool_or(obj, "computed", false),
            },
            NodeKind::Identifier => AstNode::Identifier {
                name: str_field(obj, "name", kind)?,
            },
            NodeKind::Literal => AstNode::Literal {
                value: obj.get("value").cloned().unwrap_or(Value::Null),
                raw: obj.get("raw").and_then(Value::as_str).map(str::to_owned),
            },
        })
    }

    /// Required child node.
    fn child(&mut self, obj: &Map<String, Value>, name: &str, kind: NodeKind) -> Result<NodeId> {
        match obj.get(name) {
            Some(v) if !v.is_null() => self.lower(v),
            _ => Err(FlowError::malformed(
                kind.as_str(),
                format!("missing required child `{}`", name),
            )),
        }
    }

    /// Optional child node; absent and `null` are equivalent.
    fn opt_child(&mut self, obj: &Map<String, Value>, name: &str) -> Result<Option<NodeId>> {
        match obj.get(name) {
            Some(v) if !v.is_null() => Ok(Some(self.lower(v)?)),
            _ => Ok(None),
        }
    }

    /// Required list of child nodes. Absent is treated as empty.
    fn node_list(
        &mut self,
        obj: &Map<String, Value>,
        name: &str,
        kind: NodeKind,
    ) -> Result<Vec<NodeId>> {
        let raw = list_field(obj, name, kind)?;
        let mut out = Vec::with_capacity(raw.len());
        for item in raw {
            out.push(self.lower(item)?);
        }
        Ok(out)
    }
}

fn list_field<'v>(
    obj: &'v Map<String, Value>,
    name: &str,
    kind: NodeKind,
) -> Result<&'v [Value]> {
    match obj.get(name) {
        Some(Value::Array(items)) => Ok(items),
        None | Some(Value::Null) => Ok(&[]),
        Some(_) => Err(FlowError::malformed(
            kind.as_str(),
            format!("child `{}` must be an array", name),
        )),
    }
}

fn str_field(obj: &Map<String, Value>, name: &str, kind: NodeKind) -> Result<String> {
    obj.get(name)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            FlowError::malformed(kind.as_str(), format!("missing string field `{}`", name))
        })
}

fn str_or(obj: &Map<String, Value>, name: &str, default: &str) -> String {
    obj.get(name)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_owned()
}

fn bool_or(obj: &Map<String, Value>, name: &str, default: bool) -> bool {
    obj.get(name).and_then(Value::as_bool).unwrap_or(default)
}
