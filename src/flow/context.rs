//! Builder context: the stack of enclosing constructs.
//!
//! `break`, `continue`, `return`, and `throw` locate their targets by
//! walking this stack lexically, innermost frame first. A `Function` frame
//! is a hard boundary: jumps never cross into an enclosing function's
//! constructs.
//!
//! `Finally` frames add the one indirection in the model: a jump that
//! crosses a `try`/`finally` first edges into the finaliser's entry event,
//! and the finaliser's exit later fans out to every *pending* continuation
//! recorded here. That fan-out is the only mechanism by which one source
//! jump produces multiple concrete edges.

use crate::error::{FlowError, Result};
use crate::flow::types::FlowEventId;

/// One enclosing construct that can act as a jump target.
#[derive(Debug)]
pub(crate) enum Frame {
    /// `while` / `do-while` / `for` / `for-in`, with any labels that name it.
    Loop {
        labels: Vec<String>,
        break_to: FlowEventId,
        continue_to: FlowEventId,
    },
    /// `switch`, with any labels that name it.
    Switch {
        labels: Vec<String>,
        break_to: FlowEventId,
    },
    /// A labeled non-loop statement; `break label` targets its exit.
    Labeled {
        label: String,
        break_to: FlowEventId,
    },
    /// A `try` with a finaliser. `pending` collects the continuations of
    /// jumps that crossed this frame; the finaliser's exit links to them.
    Finally {
        entry: FlowEventId,
        pending: Vec<FlowEventId>,
    },
    /// A `try` with a handler; `throw` targets the handler's entry.
    Catch { entry: FlowEventId },
    /// A function body. `return` (and an uncaught `throw`) target `exit`;
    /// `break`/`continue` may not cross this frame.
    Function { exit: FlowEventId },
    /// The program scope. Top-level `throw` targets `sink`.
    Program { sink: FlowEventId },
}

/// A resolved jump: the `Finally` frames it crosses (innermost first, as
/// stack indices) and its ultimate target.
#[derive(Debug)]
pub(crate) struct JumpRoute {
    finally_frames: Vec<usize>,
    target: FlowEventId,
}

impl JumpRoute {
    fn direct(target: FlowEventId) -> Self {
        JumpRoute {
            finally_frames: Vec::new(),
            target,
        }
    }
}

/// Stack of enclosing constructs plus the labels waiting to attach to the
/// next loop or switch.
#[derive(Debug, Default)]
pub(crate) struct BuilderContext {
    frames: Vec<Frame>,
    pending_labels: Vec<String>,
}

impl BuilderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Record a label for the next loop/switch rule to claim.
    pub fn push_label(&mut self, label: String) {
        self.pending_labels.push(label);
    }

    /// Claim all labels recorded since the last claim.
    pub fn take_labels(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_labels)
    }

    /// Resolve a `break` (optionally labeled) to its loop, switch, or
    /// labeled-statement exit.
    pub fn resolve_break(&self, label: Option<&str>) -> Result<JumpRoute> {
        let mut finallys = Vec::new();
        for (idx, frame) in self.frames.iter().enumerate().rev() {
            match frame {
                Frame::Finally { .. } => finallys.push(idx),
                Frame::Function { .. } => break,
                Frame::Loop {
                    labels, break_to, ..
                } if matches_label(label, labels) => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *break_to,
                    });
                }
                Frame::Switch { labels, break_to } if matches_label(label, labels) => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *break_to,
                    });
                }
                Frame::Labeled {
                    label: frame_label,
                    break_to,
                } if label == Some(frame_label.as_str()) => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *break_to,
                    });
                }
                _ => {}
            }
        }
        Err(unresolved("break", label))
    }

    /// Resolve a `continue` (optionally labeled) to its loop's re-test
    /// event.
    pub fn resolve_continue(&self, label: Option<&str>) -> Result<JumpRoute> {
        let mut finallys = Vec::new();
        for (idx, frame) in self.frames.iter().enumerate().rev() {
            match frame {
                Frame::Finally { .. } => finallys.push(idx),
                Frame::Function { .. } => break,
                Frame::Loop {
                    labels,
                    continue_to,
                    ..
                } if matches_label(label, labels) => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *continue_to,
                    });
                }
                _ => {}
            }
        }
        Err(unresolved("continue", label))
    }

    /// Resolve a `return` to the nearest enclosing function's exit.
    pub fn resolve_return(&self) -> Result<JumpRoute> {
        let mut finallys = Vec::new();
        for (idx, frame) in self.frames.iter().enumerate().rev() {
            match frame {
                Frame::Finally { .. } => finallys.push(idx),
                Frame::Function { exit } => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *exit,
                    });
                }
                _ => {}
            }
        }
        Err(FlowError::UnresolvedJump(
            "`return` outside of a function".into(),
        ))
    }

    /// Resolve a `throw` to the nearest enclosing catch clause, or the
    /// function exit, or the program sink.
    pub fn resolve_throw(&self) -> Result<JumpRoute> {
        let mut finallys = Vec::new();
        for (idx, frame) in self.frames.iter().enumerate().rev() {
            match frame {
                Frame::Finally { .. } => finallys.push(idx),
                Frame::Catch { entry } => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *entry,
                    });
                }
                Frame::Function { exit } => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *exit,
                    });
                }
                Frame::Program { sink } => {
                    return Ok(JumpRoute {
                        finally_frames: finallys,
                        target: *sink,
                    });
                }
                _ => {}
            }
        }
        Err(FlowError::UnresolvedJump(
            "`throw` outside of a program scope".into(),
        ))
    }

    /// Thread a resolved jump through its intervening finalisers.
    ///
    /// Returns the event the jump statement should edge into: the innermost
    /// finaliser's entry, or the target directly when none intervene. Each
    /// crossed finaliser records the next hop as a pending continuation.
    pub fn thread(&mut self, route: &JumpRoute) -> FlowEventId {
        if route.finally_frames.is_empty() {
            return route.target;
        }

        let first_hop = self.finally_entry(route.finally_frames[0]);
        for pair in route.finally_frames.windows(2) {
            let next_entry = self.finally_entry(pair[1]);
            self.add_pending(pair[0], next_entry);
        }
        let last = *route.finally_frames.last().expect("non-empty");
        self.add_pending(last, route.target);
        first_hop
    }

    fn finally_entry(&self, idx: usize) -> FlowEventId {
        match &self.frames[idx] {
            Frame::Finally { entry, .. } => *entry,
            other => unreachable!("finally frame index points at {:?}", other),
        }
    }

    fn add_pending(&mut self, idx: usize, continuation: FlowEventId) {
        if let Frame::Finally { pending, .. } = &mut self.frames[idx] {
            if !pending.contains(&continuation) {
                pending.push(continuation);
            }
        }
    }
}

fn matches_label(label: Option<&str>, labels: &[String]) -> bool {
    match label {
        None => true,
        Some(l) => labels.iter().any(|candidate| candidate == l),
    }
}

fn unresolved(kind: &str, label: Option<&str>) -> FlowError {
    match label {
        Some(l) => FlowError::UnresolvedJump(format!("`{} {}` has no matching label", kind, l)),
        None => FlowError::UnresolvedJump(format!(
            "`{}` outside of an enclosing loop or switch",
            kind
        )),
    }
}
