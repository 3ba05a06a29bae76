//! Auto-trigger heuristic state machine
//!
//! Watches the host's character-insert and buffer-change events and decides
//! from timing and content signals alone whether to resolve and expand a
//! snippet without an explicit command. The host does not join typed-character
//! and buffer-change notifications atomically, so the decision point
//! re-checks a staleness window and the line suffix to reject change events
//! that belong to something other than a plain keystroke (completion-menu
//! rewrites, pastes, external edits).
//!
//! The state is an explicit value type transitioned by pure functions, which
//! keeps every guard independently testable with synthetic timestamps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::Settings;
use crate::host::{EditorHost, MruStore, Notifier};
use crate::manager::ProviderManager;
use crate::models::{BufferId, ResolutionContext};
use crate::mru::RecentTriggers;

/// Record of the most recent single-character insertion, awaiting
/// confirmation by the next buffer-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedInsert {
    pub at: Instant,
    pub ch: char,
}

/// Mutable state of the monitor. One instance per engine.
#[derive(Debug, Clone, Default)]
pub struct AutoTriggerState {
    armed: Option<ArmedInsert>,
    insert_left_at: Option<Instant>,
    expanding: bool,
}

/// Decision for a buffer-change event against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmVerdict {
    /// All guards passed; resolution may proceed.
    Proceed,
    Rejected(RejectReason),
}

/// Why a buffer-change event did not lead to resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// An expansion attempt is already in flight.
    Busy,
    /// No character insertion armed this decision.
    NotArmed,
    /// The armed insertion is older than the staleness window.
    StaleArm,
    /// The pre-change line does not end with the armed character, so the
    /// change was not a plain single-character insert.
    SuffixMismatch,
    /// Insert mode was left after the character was armed.
    LeftInsertMode,
}

impl AutoTriggerState {
    /// Record a pre-insert notification for a single typed character.
    pub fn note_char_insert(&mut self, ch: char, now: Instant) {
        self.armed = Some(ArmedInsert { at: now, ch });
    }

    /// Record that insert mode was left.
    pub fn note_insert_leave(&mut self, now: Instant) {
        self.insert_left_at = Some(now);
    }

    /// Evaluate a buffer-change event, consuming the armed record.
    ///
    /// The armed timestamp is cleared unconditionally on entry: a given
    /// key-press can arm at most one decision, whatever the outcome.
    pub fn take_arm_verdict(
        &mut self,
        now: Instant,
        pre_line: &str,
        staleness: Duration,
    ) -> ArmVerdict {
        let armed = self.armed.take();
        if self.expanding {
            return ArmVerdict::Rejected(RejectReason::Busy);
        }
        let Some(armed) = armed else {
            return ArmVerdict::Rejected(RejectReason::NotArmed);
        };
        if now.duration_since(armed.at) > staleness {
            return ArmVerdict::Rejected(RejectReason::StaleArm);
        }
        if !pre_line.ends_with(armed.ch) {
            return ArmVerdict::Rejected(RejectReason::SuffixMismatch);
        }
        if let Some(left_at) = self.insert_left_at {
            if left_at > armed.at {
                return ArmVerdict::Rejected(RejectReason::LeftInsertMode);
            }
        }
        ArmVerdict::Proceed
    }

    pub fn begin_expansion(&mut self) {
        self.expanding = true;
    }

    pub fn finish_expansion(&mut self) {
        self.expanding = false;
    }

    pub fn is_expanding(&self) -> bool {
        self.expanding
    }
}

/// Event-driven monitor deciding when to auto-expand.
pub struct AutoTriggerMonitor {
    state: Mutex<AutoTriggerState>,
    manager: Arc<ProviderManager>,
    host: Arc<dyn EditorHost>,
    recent: Arc<RecentTriggers>,
    store: Arc<dyn MruStore>,
    notifier: Arc<dyn Notifier>,
    settings: Settings,
}

impl AutoTriggerMonitor {
    pub fn new(
        settings: Settings,
        manager: Arc<ProviderManager>,
        host: Arc<dyn EditorHost>,
        recent: Arc<RecentTriggers>,
        store: Arc<dyn MruStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            state: Mutex::new(AutoTriggerState::default()),
            manager,
            host,
            recent,
            store,
            notifier,
            settings,
        }
    }

    /// Handle a pre-insert notification for one typed character.
    pub fn on_char_insert(&self, ch: char) {
        self.state.lock().note_char_insert(ch, Instant::now());
    }

    /// Handle the user leaving insert mode.
    pub fn on_insert_leave(&self) {
        self.state.lock().note_insert_leave(Instant::now());
    }

    /// Decision point: one buffer-change event per keystroke edit.
    ///
    /// Applies the arm guards, resolves auto-triggerable candidates for the
    /// pre-change line, and expands the first match. The busy flag is
    /// released on every exit path, including a failed insertion, so the
    /// monitor can never get permanently stuck refusing further triggers.
    pub async fn on_buffer_changed(&self, buffer: BufferId, pre_line: &str) {
        if !self.settings.auto_trigger {
            return;
        }

        let verdict =
            self.state
                .lock()
                .take_arm_verdict(Instant::now(), pre_line, self.settings.staleness());
        if let ArmVerdict::Rejected(reason) = verdict {
            trace!("Auto-trigger skipped for {}: {:?}", buffer, reason);
            return;
        }

        if !self.host.is_editable(buffer).await {
            debug!("Auto-trigger skipped: {} is not a regular editable buffer", buffer);
            return;
        }
        let Some(filetype) = self.host.filetype(buffer).await else {
            debug!("Auto-trigger skipped: {} has no filetype", buffer);
            return;
        };

        let context = ResolutionContext {
            line_prefix: pre_line.to_string(),
            filetype,
            auto_only: true,
        };
        let candidates = self.manager.resolve_triggers(&context).await;
        if candidates.is_empty() {
            return;
        }

        self.state.lock().begin_expansion();
        let _release = scopeguard::guard((), |()| {
            self.state.lock().finish_expansion();
        });

        if candidates.len() > 1 {
            let prefixes: Vec<&str> = candidates.iter().map(|c| c.prefix.as_str()).collect();
            let advisory = format!(
                "Multiple snippets match automatically ({}); expanding `{}`",
                prefixes.join(", "),
                prefixes[0]
            );
            warn!("{}", advisory);
            self.notifier.warn(&advisory);
        }

        let chosen = &candidates[0];
        match self.host.insert_snippet(chosen).await {
            Ok(()) => {
                info!("Auto-expanded snippet `{}` from `{}`", chosen.prefix, chosen.provider_id);
                self.recent.record(&chosen.prefix);
                self.store.add(&chosen.prefix).await;
            }
            Err(e) => {
                warn!("Auto-expansion of `{}` failed: {}", chosen.prefix, e);
            }
        }
    }
}
