//! Flow event type definitions.
//!
//! The flow node store is an append-only arena of *flow events*: entering,
//! exiting, or hoisting one AST node. Events reference each other only by
//! id, so graph cycles (loops) carry no ownership hazards — the store owns
//! every event, and adjacency lists are plain id vectors.

use serde::Serialize;
use thiserror::Error;

use crate::ast::NodeId;

/// Execution phase of a flow event.
///
/// `Hoist` events model the ES5 declaration-hoisting pass that runs before a
/// scope's body; `Enter`/`Exit` bracket the evaluation of one AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Hoist,
    Enter,
    Exit,
}

impl Phase {
    /// Display label used by the renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Hoist => "hoist",
            Phase::Enter => "enter",
            Phase::Exit => "exit",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dense internal index of a flow event within its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FlowEventId(pub usize);

impl std::fmt::Display for FlowEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public identifier of a flow event.
///
/// Identifiers are integers today. The `Key` variant exists because the
/// identifier contract only guarantees uniqueness: should the integer space
/// ever be exhausted, identifiers extend to strings, so consumers must not
/// assume the integer form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FlowId {
    Index(u64),
    Key(String),
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowId::Index(n) => write!(f, "{}", n),
            FlowId::Key(s) => f.write_str(s),
        }
    }
}

/// A vertex in the control flow graph.
///
/// `forward` lists the events that may execute immediately after this one;
/// `backward` is the symmetric inverse. Sizes 0/1/2+ correspond to terminal,
/// linear, and forking events. Insertion order is preserved and observable.
#[derive(Debug, Clone, Serialize)]
pub struct FlowEvent {
    /// Dense event id within the store.
    pub id: FlowEventId,
    /// Hoist, enter, or exit.
    pub phase: Phase,
    /// The AST node this event belongs to.
    pub ast_ref: NodeId,
    /// Successor event ids, in insertion order.
    pub forward: Vec<FlowEventId>,
    /// Predecessor event ids, in insertion order.
    pub backward: Vec<FlowEventId>,
}

impl FlowEvent {
    /// Public identifier for this event.
    pub fn flow_id(&self) -> FlowId {
        FlowId::Index(self.id.0 as u64)
    }

    /// Whether this event is terminal (no successors).
    pub fn is_terminal(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Errors surfaced by [`FlowStore::validate`].
///
/// These indicate internal construction bugs, not bad input; a store built
/// by the flow builder always validates.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An adjacency list references an event that does not exist.
    #[error("Edge references non-existent event {0}")]
    DanglingEdge(FlowEventId),

    /// `v` is listed in `forward(u)` but `u` is missing from `backward(v)`,
    /// or vice versa.
    #[error("Asymmetric edge between {0} and {1}")]
    AsymmetricEdge(FlowEventId, FlowEventId),
}

/// Append-only arena of flow events.
///
/// Events are created only during construction; afterwards the store is
/// immutable and safe to share across threads.
#[derive(Debug, Default, Clone)]
pub struct FlowStore {
    events: Vec<FlowEvent>,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new event with empty adjacency.
    pub fn create(&mut self, phase: Phase, ast_ref: NodeId) -> FlowEventId {
        let id = FlowEventId(self.events.len());
        self.events.push(FlowEvent {
            id,
            phase,
            ast_ref,
            forward: Vec::new(),
            backward: Vec::new(),
        });
        id
    }

    /// Connect `from -> to`, maintaining edge symmetry.
    ///
    /// A join after a branch may legitimately route the same edge through
    /// two sub-paths; repeated insertions are suppressed to keep degrees
    /// small.
    pub fn link(&mut self, from: FlowEventId, to: FlowEventId) {
        if self.events[from.0].forward.contains(&to) {
            return;
        }
        self.events[from.0].forward.push(to);
        self.events[to.0].backward.push(from);
    }

    /// Read-only access to one event.
    pub fn get(&self, id: FlowEventId) -> &FlowEvent {
        &self.events[id.0]
    }

    /// Number of events in the store.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &FlowEvent> {
        self.events.iter()
    }

    /// Check the store's structural invariants: every adjacency entry names
    /// an existing event, and every edge is recorded symmetrically.
    pub fn validate(&self) -> Result<(), StoreError> {
        for event in &self.events {
            for &succ in &event.forward {
                let other = self
                    .events
                    .get(succ.0)
                    .ok_or(StoreError::DanglingEdge(succ))?;
                if !other.backward.contains(&event.id) {
                    return Err(StoreError::AsymmetricEdge(event.id, succ));
                }
            }
            for &pred in &event.backward {
                let other = self
                    .events
                    .get(pred.0)
                    .ok_or(StoreError::DanglingEdge(pred))?;
                if !other.forward.contains(&event.id) {
                    return Err(StoreError::AsymmetricEdge(pred, event.id));
                }
            }
        }
        Ok(())
    }
}
