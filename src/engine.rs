//! Engine facade: wiring, manual expansion entry points, and the event pump
//!
//! `SnippetEngine` owns the provider manager, the MRU list, and the
//! auto-trigger monitor, and exposes the operations a host editor binds to
//! commands: `expand`, `expand_or_jump`, and the `expandable` predicate.
//! Host events arrive either through [`SnippetEngine::handle_event`] or
//! through a spawned pump draining an mpsc channel in FIFO order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::auto_trigger::AutoTriggerMonitor;
use crate::config::Settings;
use crate::errors::RegistrationError;
use crate::host::{EditorHost, MruStore, Notifier};
use crate::manager::ProviderManager;
use crate::models::{CursorContext, EditorEvent, Resolution, ResolutionContext, TriggerCandidate};
use crate::mru::RecentTriggers;
use crate::provider::SnippetProvider;

/// Aggregates snippet providers and decides what to expand at the cursor.
pub struct SnippetEngine {
    manager: Arc<ProviderManager>,
    host: Arc<dyn EditorHost>,
    recent: Arc<RecentTriggers>,
    store: Arc<dyn MruStore>,
    notifier: Arc<dyn Notifier>,
    monitor: AutoTriggerMonitor,
}

impl SnippetEngine {
    pub fn new(
        settings: Settings,
        host: Arc<dyn EditorHost>,
        store: Arc<dyn MruStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let manager = Arc::new(ProviderManager::new());
        let recent = Arc::new(RecentTriggers::new(settings.mru_capacity));
        let monitor = AutoTriggerMonitor::new(
            settings,
            Arc::clone(&manager),
            Arc::clone(&host),
            Arc::clone(&recent),
            Arc::clone(&store),
            Arc::clone(&notifier),
        );
        Self { manager, host, recent, store, notifier, monitor }
    }

    /// Register a snippet-format provider. Registration order is priority
    /// order for candidate merging.
    pub fn register_provider(
        &self,
        id: impl Into<String>,
        provider: Arc<dyn SnippetProvider>,
    ) -> Result<(), RegistrationError> {
        self.manager.register(id, provider)
    }

    /// Load every registered provider. Failures disable the affected
    /// provider and are surfaced once; initialization never aborts.
    pub async fn initialize(&self) {
        self.manager.initialize(self.notifier.as_ref()).await;
    }

    /// Dispose all providers.
    pub async fn shutdown(&self) {
        self.manager.dispose().await;
    }

    /// Whether any provider is registered at all. Hosts use this to decide
    /// whether to advertise trigger-based expansion.
    pub fn has_any_provider(&self) -> bool {
        self.manager.has_any_provider()
    }

    /// Enable or disable one registered provider.
    pub fn set_provider_enabled(&self, id: &str, enabled: bool) -> bool {
        self.manager.set_enabled(id, enabled)
    }

    /// Recently expanded prefixes, most recent first, for the host's menu
    /// display ordering.
    pub fn recent_triggers(&self) -> Vec<String> {
        self.recent.snapshot()
    }

    /// Dispatch one host event to the auto-trigger monitor.
    pub async fn handle_event(&self, event: EditorEvent) {
        match event {
            EditorEvent::CharInsert(ch) => self.monitor.on_char_insert(ch),
            EditorEvent::InsertLeave => self.monitor.on_insert_leave(),
            EditorEvent::BufferChanged { buffer, pre_line } => {
                self.monitor.on_buffer_changed(buffer, &pre_line).await;
            }
        }
    }

    /// Drain host events from `receiver` in FIFO order on one task.
    pub fn spawn_event_pump(
        self: Arc<Self>,
        receiver: mpsc::Receiver<EditorEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut events = ReceiverStream::new(receiver);
            while let Some(event) = events.next().await {
                self.handle_event(event).await;
            }
            debug!("Editor event channel closed; stopping snippet event pump");
        })
    }

    /// Manual expansion. Resolves triggers at the cursor; with no match the
    /// host's generic completion-start action runs instead. Returns whether
    /// a snippet was inserted.
    pub async fn expand(&self) -> bool {
        let Some(cursor) = self.active_cursor().await else {
            return false;
        };
        match self.resolve_at(&cursor).await {
            Resolution::NoMatch => {
                debug!("No snippet trigger before cursor; starting completion instead");
                self.host.start_completion().await;
                false
            }
            Resolution::Single(candidate) => self.insert_and_record(&candidate).await,
            Resolution::Choice(candidates) => self.pick_and_insert(candidates).await,
        }
    }

    /// Manual expand-or-jump. Like [`expand`](Self::expand), except that
    /// with no match and an active snippet session in the buffer, pending
    /// completion state is cancelled and the cursor advances to the next
    /// placeholder instead of falling back.
    pub async fn expand_or_jump(&self) -> bool {
        let Some(cursor) = self.active_cursor().await else {
            return false;
        };
        match self.resolve_at(&cursor).await {
            Resolution::NoMatch => {
                if self.host.has_active_session(cursor.buffer).await {
                    debug!("No trigger matched; jumping to next placeholder in {}", cursor.buffer);
                    self.host.cancel_pending_completion().await;
                    self.host.jump_to_next_placeholder().await;
                } else {
                    self.host.start_completion().await;
                }
                false
            }
            Resolution::Single(candidate) => self.insert_and_record(&candidate).await,
            Resolution::Choice(candidates) => self.pick_and_insert(candidates).await,
        }
    }

    /// Whether at least one trigger candidate resolves at the cursor.
    ///
    /// External UI calls this to decide whether to show an expand
    /// affordance; failures are reported as `false`, never propagated.
    pub async fn expandable(&self) -> bool {
        let Some(cursor) = self.host.cursor_context().await else {
            debug!("expandable(): no active document");
            return false;
        };
        !matches!(self.resolve_at(&cursor).await, Resolution::NoMatch)
    }

    /// Cursor context for a manual command. A missing active document is
    /// the one failure surfaced directly to the user.
    async fn active_cursor(&self) -> Option<CursorContext> {
        let cursor = self.host.cursor_context().await;
        if cursor.is_none() {
            self.notifier.error("No active document to expand a snippet in");
        }
        cursor
    }

    async fn resolve_at(&self, cursor: &CursorContext) -> Resolution {
        let context = ResolutionContext {
            line_prefix: cursor.line_prefix.clone(),
            filetype: cursor.filetype.clone(),
            auto_only: false,
        };
        Resolution::from_candidates(self.manager.resolve_triggers(&context).await)
    }

    async fn pick_and_insert(&self, candidates: Vec<TriggerCandidate>) -> bool {
        match self.host.pick(&candidates).await {
            Some(index) if index < candidates.len() => {
                self.insert_and_record(&candidates[index]).await
            }
            Some(index) => {
                warn!("Pick UI returned out-of-range index {} of {}", index, candidates.len());
                false
            }
            None => false,
        }
    }

    async fn insert_and_record(&self, candidate: &TriggerCandidate) -> bool {
        match self.host.insert_snippet(candidate).await {
            Ok(()) => {
                info!("Expanded snippet `{}` from `{}`", candidate.prefix, candidate.provider_id);
                self.recent.record(&candidate.prefix);
                self.store.add(&candidate.prefix).await;
                true
            }
            Err(e) => {
                warn!("Snippet insertion for `{}` failed: {}", candidate.prefix, e);
                false
            }
        }
    }
}
