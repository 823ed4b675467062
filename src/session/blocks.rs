//! Tracks the content block currently open in a streamed turn.
//!
//! `Idle --start(kind)--> Open(kind) --stop--> Idle`. Deltas and stops that
//! arrive while `Idle` are ignored: the runtime's stream is event-sourced and
//! duplicated or partial events must not take the consumer down.

use crate::types::{BlockDelta, BlockKind};

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Idle,
    Open(BlockKind),
}

/// Fragments a delta produced, in write order (text before thinking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeltaOutput<'a> {
    pub text: Option<&'a str>,
    pub thinking: Option<&'a str>,
}

impl<'a> DeltaOutput<'a> {
    pub fn fragments(&self) -> impl Iterator<Item = &'a str> {
        self.text.into_iter().chain(self.thinking)
    }
}

/// A block that just closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedBlock {
    pub kind: BlockKind,
    /// Accumulated reasoning text; empty for non-thinking blocks.
    pub thinking: String,
}

/// Per-session open-block state machine.
#[derive(Debug, Default)]
pub struct ContentBlockTracker {
    state: BlockState,
    thinking: String,
}

impl ContentBlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == BlockState::Idle
    }

    /// Reasoning accumulated in the open thinking block so far.
    pub fn thinking(&self) -> &str {
        &self.thinking
    }

    /// Open a block. A block still open is dropped in favor of the new one.
    ///
    /// Returns the kind of the dropped block, if any.
    pub fn start(&mut self, kind: BlockKind) -> Option<BlockKind> {
        let replaced = match self.state {
            BlockState::Open(previous) => Some(previous),
            BlockState::Idle => None,
        };
        self.thinking.clear();
        self.state = BlockState::Open(kind);
        replaced
    }

    /// Apply a delta. Returns `None` when no block is open.
    pub fn delta<'a>(&mut self, delta: &'a BlockDelta) -> Option<DeltaOutput<'a>> {
        let BlockState::Open(kind) = self.state else {
            return None;
        };
        let text = delta.text.as_deref().filter(|t| !t.is_empty());
        let thinking = delta.thinking.as_deref().filter(|t| !t.is_empty());
        if kind == BlockKind::Thinking {
            if let Some(fragment) = thinking {
                self.thinking.push_str(fragment);
            }
        }
        Some(DeltaOutput { text, thinking })
    }

    /// Close the open block. Returns `None` when already idle.
    pub fn stop(&mut self) -> Option<ClosedBlock> {
        let BlockState::Open(kind) = self.state else {
            return None;
        };
        self.state = BlockState::Idle;
        Some(ClosedBlock {
            kind,
            thinking: std::mem::take(&mut self.thinking),
        })
    }

    /// Drop any open block without reporting it.
    pub fn release(&mut self) {
        self.state = BlockState::Idle;
        self.thinking.clear();
    }
}
