//! Host editor capability contracts
//!
//! Everything the engine needs from its embedder: buffer introspection,
//! snippet insertion, the pick UI, completion fallback, MRU persistence,
//! and user-visible notifications. The engine treats all of these as
//! opaque asynchronous operations.

use async_trait::async_trait;

use tracing::{error, info, warn};

use crate::errors::InsertError;
use crate::models::{BufferId, CursorContext, TriggerCandidate};

/// Editing and UI operations supplied by the host editor.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Whether the buffer is a regular editable document (not a menu,
    /// preview, or other special buffer).
    async fn is_editable(&self, buffer: BufferId) -> bool;

    /// Filetype of the buffer, or `None` if the buffer is gone.
    async fn filetype(&self, buffer: BufferId) -> Option<String>;

    /// Buffer, line prefix, and filetype at the current cursor, or `None`
    /// when no document is active.
    async fn cursor_context(&self) -> Option<CursorContext>;

    /// Expand the candidate's body at the cursor. Placeholder and tabstop
    /// semantics are entirely the host's concern.
    async fn insert_snippet(&self, candidate: &TriggerCandidate) -> Result<(), InsertError>;

    /// Present a choice of candidates and return the selected index, or
    /// `None` if the user dismissed the menu.
    async fn pick(&self, candidates: &[TriggerCandidate]) -> Option<usize>;

    /// Fallback action when manual expansion finds no trigger.
    async fn start_completion(&self);

    /// Whether a snippet-insertion session with placeholder fields is
    /// active for the buffer.
    async fn has_active_session(&self, buffer: BufferId) -> bool;

    /// Drop any pending completion state before jumping placeholders.
    async fn cancel_pending_completion(&self);

    /// Advance to the next placeholder of the active snippet session.
    async fn jump_to_next_placeholder(&self);
}

/// Persistence for the most-recently-used trigger list.
///
/// Called after every successful expansion; the engine keeps its own
/// bounded in-memory copy and never reads back through this interface.
#[async_trait]
pub trait MruStore: Send + Sync {
    async fn add(&self, prefix: &str);
}

/// User-visible status and diagnostic display.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that routes messages to the tracing subscriber only.
///
/// Useful for embedders without a status line and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}
