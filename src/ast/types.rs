//! AST type definitions.
//!
//! A read-only, arena-resident view of an ESTree ES5 program. Each node is
//! *shallow*: children are [`NodeId`] handles into the owning
//! [`AstArena`](crate::ast::AstArena) rather than nested values. This is the
//! same representation the public API exposes as the "node projection" —
//! serializing an [`AstNode`] yields the ESTree object with child references
//! replaced by numeric handles.

use serde::{Deserialize, Serialize};

/// Unique identifier for an AST node within its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed enumeration of the ES5 ESTree node kinds this crate recognizes.
///
/// Unknown kinds are rejected during lowering with
/// [`FlowError::MalformedAst`](crate::FlowError::MalformedAst) rather than
/// silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    BlockStatement,
    ExpressionStatement,
    IfStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    WithStatement,
    SwitchStatement,
    SwitchCase,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForInStatement,
    FunctionDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    ThisExpression,
    ArrayExpression,
    ObjectExpression,
    Property,
    FunctionExpression,
    SequenceExpression,
    UnaryExpression,
    BinaryExpression,
    AssignmentExpression,
    UpdateExpression,
    LogicalExpression,
    ConditionalExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    Identifier,
    Literal,
}

impl NodeKind {
    /// The ESTree `type` string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::LabeledStatement => "LabeledStatement",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::WithStatement => "WithStatement",
            NodeKind::SwitchStatement => "SwitchStatement",
            NodeKind::SwitchCase => "SwitchCase",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::ThrowStatement => "ThrowStatement",
            NodeKind::TryStatement => "TryStatement",
            NodeKind::CatchClause => "CatchClause",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoWhileStatement => "DoWhileStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::ForInStatement => "ForInStatement",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::VariableDeclarator => "VariableDeclarator",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::ArrayExpression => "ArrayExpression",
            NodeKind::ObjectExpression => "ObjectExpression",
            NodeKind::Property => "Property",
            NodeKind::FunctionExpression => "FunctionExpression",
            NodeKind::SequenceExpression => "SequenceExpression",
            NodeKind::UnaryExpression => "UnaryExpression",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::AssignmentExpression => "AssignmentExpression",
            NodeKind::UpdateExpression => "UpdateExpression",
            NodeKind::LogicalExpression => "LogicalExpression",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::NewExpression => "NewExpression",
            NodeKind::MemberExpression => "MemberExpression",
            NodeKind::Identifier => "Identifier",
            NodeKind::Literal => "Literal",
        }
    }

    /// Look up a kind by its ESTree `type` string.
    pub fn from_type(s: &str) -> Option<NodeKind> {
        Some(match s {
            "Program" => NodeKind::Program,
            "BlockStatement" => NodeKind::BlockStatement,
            "ExpressionStatement" => NodeKind::ExpressionStatement,
            "IfStatement" => NodeKind::IfStatement,
            "LabeledStatement" => NodeKind::LabeledStatement,
            "BreakStatement" => NodeKind::BreakStatement,
            "ContinueStatement" => NodeKind::ContinueStatement,
            "WithStatement" => NodeKind::WithStatement,
            "SwitchStatement" => NodeKind::SwitchStatement,
            "SwitchCase" => NodeKind::SwitchCase,
            "ReturnStatement" => NodeKind::ReturnStatement,
            "ThrowStatement" => NodeKind::ThrowStatement,
            "TryStatement" => NodeKind::TryStatement,
            "CatchClause" => NodeKind::CatchClause,
            "WhileStatement" => NodeKind::WhileStatement,
            "DoWhileStatement" => NodeKind::DoWhileStatement,
            "ForStatement" => NodeKind::ForStatement,
            "ForInStatement" => NodeKind::ForInStatement,
            "FunctionDeclaration" => NodeKind::FunctionDeclaration,
            "VariableDeclaration" => NodeKind::VariableDeclaration,
            "VariableDeclarator" => NodeKind::VariableDeclarator,
            "ThisExpression" => NodeKind::ThisExpression,
            "ArrayExpression" => NodeKind::ArrayExpression,
            "ObjectExpression" => NodeKind::ObjectExpression,
            "Property" => NodeKind::Property,
            "FunctionExpression" => NodeKind::FunctionExpression,
            "SequenceExpression" => NodeKind::SequenceExpression,
            "UnaryExpression" => NodeKind::UnaryExpression,
            "BinaryExpression" => NodeKind::BinaryExpression,
            "AssignmentExpression" => NodeKind::AssignmentExpression,
            "UpdateExpression" => NodeKind::UpdateExpression,
            "LogicalExpression" => NodeKind::LogicalExpression,
            "ConditionalExpression" => NodeKind::ConditionalExpression,
            "CallExpression" => NodeKind::CallExpression,
            "NewExpression" => NodeKind::NewExpression,
            "MemberExpression" => NodeKind::MemberExpression,
            "Identifier" => NodeKind::Identifier,
            "Literal" => NodeKind::Literal,
            _ => return None,
        })
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shallow AST node: ESTree fields with children replaced by [`NodeId`]
/// handles.
///
/// Serializing a node yields the ESTree object shape with a `"type"` tag and
/// numeric handles in child positions, which is exactly the projection the
/// graph facade hands to external consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AstNode {
    Program {
        body: Vec<NodeId>,
    },
    BlockStatement {
        body: Vec<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    IfStatement {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    LabeledStatement {
        label: NodeId,
        body: NodeId,
    },
    BreakStatement {
        label: Option<NodeId>,
    },
    ContinueStatement {
        label: Option<NodeId>,
    },
    WithStatement {
        object: NodeId,
        body: NodeId,
    },
    SwitchStatement {
        discriminant: NodeId,
        cases: Vec<NodeId>,
    },
    SwitchCase {
        test: Option<NodeId>,
        consequent: Vec<NodeId>,
    },
    ReturnStatement {
        argument: Option<NodeId>,
    },
    ThrowStatement {
        argument: NodeId,
    },
    TryStatement {
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    },
    CatchClause {
        param: NodeId,
        body: NodeId,
    },
    WhileStatement {
        test: NodeId,
        body: NodeId,
    },
    DoWhileStatement {
        body: NodeId,
        test: NodeId,
    },
    ForStatement {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForInStatement {
        left: NodeId,
        right: NodeId,
        body: NodeId,
    },
    FunctionDeclaration {
        id: NodeId,
        params: Vec<NodeId>,
        body: NodeId,
    },
    VariableDeclaration {
        declarations: Vec<NodeId>,
        kind: String,
    },
    VariableDeclarator {
        id: NodeId,
        init: Option<NodeId>,
    },
    ThisExpression,
    ArrayExpression {
        /// `None` entries are elisions (`[1, , 3]`).
        elements: Vec<Option<NodeId>>,
    },
    ObjectExpression {
        properties: Vec<NodeId>,
    },
    Property {
        key: NodeId,
        value: NodeId,
        kind: String,
    },
    FunctionExpression {
        id: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
    },
    SequenceExpression {
        expressions: Vec<NodeId>,
    },
    UnaryExpression {
        operator: String,
        prefix: bool,
        argument: NodeId,
    },
    BinaryExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    AssignmentExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: NodeId,
    },
    LogicalExpression {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    ConditionalExpression {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    CallExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    NewExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    MemberExpression {
        object: NodeId,
        property: NodeId,
        computed: bool,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: serde_json::Value,
        raw: Option<String>,
    },
}

impl AstNode {
    /// The kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Program { .. } => NodeKind::Program,
            AstNode::BlockStatement { .. } => NodeKind::BlockStatement,
            AstNode::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            AstNode::IfStatement { .. } => NodeKind::IfStatement,
            AstNode::LabeledStatement { .. } => NodeKind::LabeledStatement,
            AstNode::BreakStatement { .. } => NodeKind::BreakStatement,
            AstNode::ContinueStatement { .. } => NodeKind::ContinueStatement,
            AstNode::WithStatement { .. } => NodeKind::WithStatement,
            AstNode::SwitchStatement { .. } => NodeKind::SwitchStatement,
            AstNode::SwitchCase { .. } => NodeKind::SwitchCase,
            AstNode::ReturnStatement { .. } => NodeKind::ReturnStatement,
            AstNode::ThrowStatement { .. } => NodeKind::ThrowStatement,
            AstNode::TryStatement { .. } => NodeKind::TryStatement,
            AstNode::CatchClause { .. } => NodeKind::CatchClause,
            AstNode::WhileStatement { .. } => NodeKind::WhileStatement,
            AstNode::DoWhileStatement { .. } => NodeKind::DoWhileStatement,
            AstNode::ForStatement { .. } => NodeKind::ForStatement,
            AstNode::ForInStatement { .. } => NodeKind::ForInStatement,
            AstNode::FunctionDeclaration { .. } => NodeKind::FunctionDeclaration,
            AstNode::VariableDeclaration { .. } => NodeKind::VariableDeclaration,
            AstNode::VariableDeclarator { .. } => NodeKind::VariableDeclarator,
            AstNode::ThisExpression => NodeKind::ThisExpression,
            AstNode::ArrayExpression { .. } => NodeKind::ArrayExpression,
            AstNode::ObjectExpression { .. } => NodeKind::ObjectExpression,
            AstNode::Property { .. } => NodeKind::Property,
            AstNode::FunctionExpression { .. } => NodeKind::FunctionExpression,
            AstNode::SequenceExpression { .. } => NodeKind::SequenceExpression,
            AstNode::UnaryExpression { .. } => NodeKind::UnaryExpression,
            AstNode::BinaryExpression { .. } => NodeKind::BinaryExpression,
            AstNode::AssignmentExpression { .. } => NodeKind::AssignmentExpression,
            AstNode::UpdateExpression { .. } => NodeKind::UpdateExpression,
            AstNode::LogicalExpression { .. } => NodeKind::LogicalExpression,
            AstNode::ConditionalExpression { .. } => NodeKind::ConditionalExpression,
            AstNode::CallExpression { .. } => NodeKind::CallExpression,
            AstNode::NewExpression { .. } => NodeKind::NewExpression,
            AstNode::MemberExpression { .. } => NodeKind::MemberExpression,
            AstNode::Identifier { .. } => NodeKind::Identifier,
            AstNode::Literal { .. } => NodeKind::Literal,
        }
    }

    /// Whether this node is a loop or switch, i.e. a valid target for an
    /// unlabeled `break` (and, for loops, `continue`).
    pub fn is_breakable(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::WhileStatement
                | NodeKind::DoWhileStatement
                | NodeKind::ForStatement
                | NodeKind::ForInStatement
                | NodeKind::SwitchStatement
        )
    }

    /// The identifier name, when this node is an `Identifier`.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            AstNode::Identifier { name } => Some(name.as_str()),
            _ => None,
        }
    }
}
