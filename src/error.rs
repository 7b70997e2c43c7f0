//! Central error types for analyse-control.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic
//! `Display` and `From` implementations.

use thiserror::Error;

/// Main error type for the library.
///
/// All errors are reported at construction time; querying a finished
/// graph is infallible.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The input AST violates the ESTree ES5 shape: unknown node kind,
    /// missing required child, wrong child type, or a non-`Program` root.
    #[error("Malformed AST at {kind}: {message}")]
    MalformedAst { kind: String, message: String },

    /// A jump statement has no resolvable target: `break`/`continue` with
    /// an unmatched label, unlabeled `break`/`continue` outside any loop or
    /// switch, or `return` outside a function.
    #[error("Unresolved jump: {0}")]
    UnresolvedJump(String),

    /// The input was not valid JSON.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience type alias for Results using FlowError.
pub type Result<T> = std::result::Result<T, FlowError>;

impl FlowError {
    /// Create a malformed-AST error with node-kind context.
    ///
    /// Use this when lowering or wiring encounters a structural violation,
    /// so the message names the offending node kind.
    #[inline]
    pub fn malformed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        FlowError::MalformedAst {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
