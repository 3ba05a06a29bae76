//! Shared test doubles: a scripted snippet provider and a recording host.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use snippet_engine::config::Settings;
use snippet_engine::engine::SnippetEngine;
use snippet_engine::errors::{InsertError, ProviderInitError, ResolutionError};
use snippet_engine::host::{EditorHost, MruStore, Notifier};
use snippet_engine::models::{BufferId, CursorContext, ResolutionContext, TriggerCandidate};
use snippet_engine::provider::SnippetProvider;

pub const BUFFER: BufferId = BufferId(1);

/// Provider that matches any of its trigger texts as a suffix of the line
/// prefix, the way a real dialect provider matches typed text.
pub struct MockProvider {
    id: String,
    triggers: Vec<(String, bool)>,
    fail_init: bool,
    fail_query: bool,
    queries: AtomicUsize,
}

impl MockProvider {
    pub fn new(id: &str, triggers: &[(&str, bool)]) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            triggers: triggers.iter().map(|(t, auto)| (t.to_string(), *auto)).collect(),
            fail_init: false,
            fail_query: false,
            queries: AtomicUsize::new(0),
        })
    }

    pub fn failing_init(id: &str, triggers: &[(&str, bool)]) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            triggers: triggers.iter().map(|(t, auto)| (t.to_string(), *auto)).collect(),
            fail_init: true,
            fail_query: false,
            queries: AtomicUsize::new(0),
        })
    }

    pub fn failing_query(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            triggers: vec![],
            fail_init: false,
            fail_query: true,
            queries: AtomicUsize::new(0),
        })
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnippetProvider for MockProvider {
    async fn init(&self) -> Result<(), ProviderInitError> {
        if self.fail_init {
            Err(ProviderInitError::new("snippet file failed to parse"))
        } else {
            Ok(())
        }
    }

    async fn trigger_snippets(
        &self,
        context: &ResolutionContext,
    ) -> Result<Vec<TriggerCandidate>, ResolutionError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_query {
            return Err(ResolutionError::new("query failed"));
        }
        Ok(self
            .triggers
            .iter()
            .filter(|(trigger, _)| context.line_prefix.ends_with(trigger.as_str()))
            .map(|(trigger, auto)| TriggerCandidate {
                prefix: trigger.clone(),
                description: Some(format!("{} snippet", trigger)),
                provider_id: self.id.clone(),
                auto_triggerable: *auto,
                body: json!({ "text": format!("{} body", trigger) }),
            })
            .collect())
    }
}

/// Host that records everything the engine asks it to do.
pub struct MockHost {
    pub editable: AtomicBool,
    pub filetype: Mutex<Option<String>>,
    pub cursor: Mutex<Option<CursorContext>>,
    /// Successful insertions as (provider_id, prefix).
    pub insertions: Mutex<Vec<(String, String)>>,
    pub fail_insert: AtomicBool,
    pub insert_delay: Mutex<Option<Duration>>,
    pub pick_choice: Mutex<Option<usize>>,
    /// Prefix lists offered to the pick UI, in call order.
    pub picks_offered: Mutex<Vec<Vec<String>>>,
    pub completion_starts: AtomicUsize,
    pub active_session: AtomicBool,
    pub cancelled_completions: AtomicUsize,
    pub placeholder_jumps: AtomicUsize,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            editable: AtomicBool::new(true),
            filetype: Mutex::new(Some("rust".to_string())),
            cursor: Mutex::new(None),
            insertions: Mutex::new(Vec::new()),
            fail_insert: AtomicBool::new(false),
            insert_delay: Mutex::new(None),
            pick_choice: Mutex::new(None),
            picks_offered: Mutex::new(Vec::new()),
            completion_starts: AtomicUsize::new(0),
            active_session: AtomicBool::new(false),
            cancelled_completions: AtomicUsize::new(0),
            placeholder_jumps: AtomicUsize::new(0),
        })
    }

    pub fn set_cursor(&self, line_prefix: &str) {
        *self.cursor.lock() = Some(CursorContext {
            buffer: BUFFER,
            line_prefix: line_prefix.to_string(),
            filetype: "rust".to_string(),
        });
    }

    pub fn clear_cursor(&self) {
        *self.cursor.lock() = None;
    }

    pub fn inserted_prefixes(&self) -> Vec<String> {
        self.insertions.lock().iter().map(|(_, prefix)| prefix.clone()).collect()
    }
}

#[async_trait]
impl EditorHost for MockHost {
    async fn is_editable(&self, _buffer: BufferId) -> bool {
        self.editable.load(Ordering::SeqCst)
    }

    async fn filetype(&self, _buffer: BufferId) -> Option<String> {
        self.filetype.lock().clone()
    }

    async fn cursor_context(&self) -> Option<CursorContext> {
        self.cursor.lock().clone()
    }

    async fn insert_snippet(&self, candidate: &TriggerCandidate) -> Result<(), InsertError> {
        let delay = *self.insert_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(InsertError::new("host rejected the edit"));
        }
        self.insertions.lock().push((candidate.provider_id.clone(), candidate.prefix.clone()));
        Ok(())
    }

    async fn pick(&self, candidates: &[TriggerCandidate]) -> Option<usize> {
        self.picks_offered
            .lock()
            .push(candidates.iter().map(|c| c.prefix.clone()).collect());
        *self.pick_choice.lock()
    }

    async fn start_completion(&self) {
        self.completion_starts.fetch_add(1, Ordering::SeqCst);
    }

    async fn has_active_session(&self, _buffer: BufferId) -> bool {
        self.active_session.load(Ordering::SeqCst)
    }

    async fn cancel_pending_completion(&self) {
        self.cancelled_completions.fetch_add(1, Ordering::SeqCst);
    }

    async fn jump_to_next_placeholder(&self) {
        self.placeholder_jumps.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct RecordingMru {
    pub added: Mutex<Vec<String>>,
}

impl RecordingMru {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { added: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl MruStore for RecordingMru {
    async fn add(&self, prefix: &str) {
        self.added.lock().push(prefix.to_string());
    }
}

pub struct RecordingNotifier {
    pub infos: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            infos: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        })
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

/// Engine wired to fresh recording collaborators.
pub struct TestRig {
    pub engine: Arc<SnippetEngine>,
    pub host: Arc<MockHost>,
    pub mru: Arc<RecordingMru>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn rig_with_settings(settings: Settings) -> TestRig {
    let host = MockHost::new();
    let mru = RecordingMru::new();
    let notifier = RecordingNotifier::new();
    let engine = Arc::new(SnippetEngine::new(
        settings,
        Arc::clone(&host) as Arc<dyn EditorHost>,
        Arc::clone(&mru) as Arc<dyn MruStore>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    ));
    TestRig { engine, host, mru, notifier }
}

pub fn rig() -> TestRig {
    rig_with_settings(Settings::default())
}
