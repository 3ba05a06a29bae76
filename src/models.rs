//! Core data types shared across the engine
//!
//! These are the value types flowing between the provider layer, the
//! trigger-resolution engine, and the host editor: trigger candidates,
//! resolution inputs, and the events the host pushes at us.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a buffer owned by the host editor.
///
/// Opaque to the engine; only used to route per-buffer queries (editability,
/// filetype, active snippet session) back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// A resolved match between typed text and an available snippet.
///
/// Produced by a [`SnippetProvider`](crate::provider::SnippetProvider) for a
/// specific cursor context. Immutable once produced; lives for the duration
/// of one resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerCandidate {
    /// The literal text the user typed that identifies the snippet.
    pub prefix: String,
    /// Optional human-readable description for menu display.
    pub description: Option<String>,
    /// Registration id of the provider that produced this candidate.
    pub provider_id: String,
    /// Whether this snippet may be expanded without an explicit command.
    pub auto_triggerable: bool,
    /// Opaque snippet body payload, interpreted only by the host inserter.
    pub body: serde_json::Value,
}

/// Transient input to a single resolution call. Not retained.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// Text of the current line up to the cursor.
    pub line_prefix: String,
    /// Host filetype of the buffer being edited.
    pub filetype: String,
    /// When set, candidates not flagged [`TriggerCandidate::auto_triggerable`]
    /// are filtered out before deduplication.
    pub auto_only: bool,
}

/// Cursor position information supplied by the host for manual expansion.
#[derive(Debug, Clone)]
pub struct CursorContext {
    pub buffer: BufferId,
    pub line_prefix: String,
    pub filetype: String,
}

/// Buffer and insert-mode events pushed by the host editor.
///
/// Delivery is FIFO per event kind; cross-kind ordering is not guaranteed,
/// which is why the auto-trigger monitor re-checks timing and line suffix
/// instead of trusting event order.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// A single character is about to be inserted (fires before the buffer
    /// is modified).
    CharInsert(char),
    /// The user left insert mode.
    InsertLeave,
    /// Buffer content changed; `pre_line` is the changed line's text before
    /// the cursor at the time the change was applied.
    BufferChanged { buffer: BufferId, pre_line: String },
}

/// Outcome of classifying a resolution result for expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No provider matched; the caller falls back to its default action.
    NoMatch,
    /// Exactly one match; insert it without further ranking.
    Single(TriggerCandidate),
    /// Several matches, in stable registration order. Manual expansion
    /// presents them all; automatic expansion takes the first and warns.
    Choice(Vec<TriggerCandidate>),
}

impl Resolution {
    /// Classify an already ordered, deduplicated candidate list.
    pub fn from_candidates(mut candidates: Vec<TriggerCandidate>) -> Self {
        match candidates.len() {
            0 => Resolution::NoMatch,
            1 => Resolution::Single(candidates.remove(0)),
            _ => Resolution::Choice(candidates),
        }
    }
}
