//! ESTree ES5 AST model.
//!
//! - [`types`]: shallow node definitions and the closed kind enumeration
//! - [`arena`]: the node pool and ESTree JSON lowering
//!
//! The AST is read-only for the lifetime of a graph; the flow layer refers
//! to nodes exclusively through [`NodeId`] handles.

pub mod arena;
pub mod types;

pub use arena::AstArena;
pub use types::{AstNode, NodeId, NodeKind};
