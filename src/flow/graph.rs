//! The public graph facade.
//!
//! [`ControlFlowGraph`] owns the AST arena and the flow store. After
//! construction it is immutable: traversal hands out lightweight
//! [`Flow`] handles that borrow the graph, so a finished graph can be
//! shared freely across threads.

use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::ast::{AstArena, AstNode, NodeId};
use crate::error::Result;
use crate::flow::builder::build_flow;
use crate::flow::types::{FlowEvent, FlowEventId, FlowId, FlowStore, Phase, StoreError};

/// A control flow graph over an ES5 program.
///
/// Vertices are flow events (hoisting, entering, or exiting one AST node);
/// edges connect each event to the events that may execute immediately
/// after it. The graph over-approximates runtime control flow: every
/// concrete execution trace is a path here, and both branches of every
/// conditional are present.
#[derive(Debug)]
pub struct ControlFlowGraph {
    arena: AstArena,
    store: FlowStore,
    start: FlowEventId,
    end: FlowEventId,
    /// Lazily-built set of events reachable from the start; rebuilt on
    /// demand after a clone.
    reachable: OnceCell<FxHashSet<FlowEventId>>,
}

impl Clone for ControlFlowGraph {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            store: self.store.clone(),
            start: self.start,
            end: self.end,
            // Reset cache on clone - rebuilt lazily if needed
            reachable: OnceCell::new(),
        }
    }
}

impl ControlFlowGraph {
    /// Build the control flow graph for an ESTree `Program` document.
    ///
    /// # Errors
    ///
    /// - [`FlowError::MalformedAst`](crate::FlowError::MalformedAst) for
    ///   structural violations in the input AST
    /// - [`FlowError::UnresolvedJump`](crate::FlowError::UnresolvedJump)
    ///   for jump statements without a target
    pub fn analyse(ast: &Value) -> Result<Self> {
        let arena = AstArena::from_estree(ast)?;
        let (store, start, end) = build_flow(&arena)?;
        Ok(Self {
            arena,
            store,
            start,
            end,
            reachable: OnceCell::new(),
        })
    }

    /// The first event of the program: its first hoist, or its enter when
    /// nothing hoists.
    pub fn start_of_flow(&self) -> Flow<'_> {
        self.flow(self.start)
    }

    /// The program's exit event. Terminal: no forward edges.
    pub fn end_of_flow(&self) -> Flow<'_> {
        self.flow(self.end)
    }

    /// Shallow projection of an AST node: its ESTree fields with child
    /// references replaced by [`NodeId`] handles.
    pub fn get_node(&self, id: NodeId) -> Option<&AstNode> {
        self.arena.get(id)
    }

    /// The root `Program` node.
    pub fn root_node(&self) -> NodeId {
        self.arena.root()
    }

    /// Expand a node back into a deep ESTree value. Applied to the root
    /// this reconstructs the (structural) input document.
    pub fn node_to_estree(&self, id: NodeId) -> Option<Value> {
        self.arena.to_estree(id)
    }

    /// Iterate all AST nodes in handle order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &AstNode)> {
        self.arena.iter()
    }

    /// Iterate all flow events in creation order.
    pub fn events(&self) -> impl Iterator<Item = Flow<'_>> {
        self.store.iter().map(move |event| Flow { graph: self, event })
    }

    /// Number of flow events in the graph.
    pub fn event_count(&self) -> usize {
        self.store.len()
    }

    /// Whether an event is reachable from the start of flow via forward
    /// edges. Unreachable events (code after a `return`/`throw`, and
    /// function bodies hanging off unevaluated expressions) are a modeling
    /// outcome, not an error.
    pub fn is_reachable(&self, flow: Flow<'_>) -> bool {
        self.reachable_set().contains(&flow.event.id)
    }

    /// Check the graph's structural invariants. A graph produced by
    /// [`analyse`](Self::analyse) always validates.
    pub fn validate(&self) -> std::result::Result<(), StoreError> {
        self.store.validate()
    }

    fn flow(&self, id: FlowEventId) -> Flow<'_> {
        Flow {
            graph: self,
            event: self.store.get(id),
        }
    }

    /// Breadth-first forward sweep from the start event.
    ///
    /// First call: O(V + E); subsequent calls O(1) via `OnceCell`.
    fn reachable_set(&self) -> &FxHashSet<FlowEventId> {
        self.reachable.get_or_init(|| {
            let mut reachable = FxHashSet::default();
            let mut queue = vec![self.start];
            while let Some(id) = queue.pop() {
                if reachable.insert(id) {
                    queue.extend(self.store.get(id).forward.iter().copied());
                }
            }
            reachable
        })
    }
}

/// A borrowed handle onto one flow event.
///
/// Cheap to copy; traversal methods return further handles onto the same
/// graph.
#[derive(Clone, Copy)]
pub struct Flow<'g> {
    graph: &'g ControlFlowGraph,
    event: &'g FlowEvent,
}

impl<'g> Flow<'g> {
    /// Stable identifier of this event.
    ///
    /// Integers in practice; consumers must tolerate the string form, which
    /// the identifier contract reserves for id-space exhaustion.
    pub fn id(&self) -> FlowId {
        self.event.flow_id()
    }

    /// The event's phase.
    pub fn phase(&self) -> Phase {
        self.event.phase
    }

    pub fn is_hoist(&self) -> bool {
        self.event.phase == Phase::Hoist
    }

    pub fn is_enter(&self) -> bool {
        self.event.phase == Phase::Enter
    }

    pub fn is_exit(&self) -> bool {
        self.event.phase == Phase::Exit
    }

    /// Handle of the AST node this event belongs to.
    pub fn node_id(&self) -> NodeId {
        self.event.ast_ref
    }

    /// Shallow projection of the AST node this event belongs to.
    pub fn node(&self) -> &'g AstNode {
        self.graph.arena.node(self.event.ast_ref)
    }

    /// Events that may execute immediately after this one, in edge
    /// insertion order.
    pub fn forward_flows(&self) -> impl Iterator<Item = Flow<'g>> + 'g {
        let graph = self.graph;
        let event = self.event;
        event.forward.iter().map(move |&id| graph.flow(id))
    }

    /// Events that may execute immediately before this one.
    pub fn backward_flows(&self) -> impl Iterator<Item = Flow<'g>> + 'g {
        let graph = self.graph;
        let event = self.event;
        event.backward.iter().map(move |&id| graph.flow(id))
    }
}

impl std::fmt::Debug for Flow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Flow({} {} {})",
            self.id(),
            self.phase(),
            self.node().kind()
        )
    }
}
