//! Engine settings
//!
//! The engine consumes a plain settings value; reading it from disk or from
//! the host editor's configuration system is the embedder's job. All fields
//! have defaults so a partial configuration deserializes cleanly.

use std::time::Duration;

use serde::Deserialize;

/// Tunable knobs for trigger resolution and auto-expansion.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Expand snippets automatically while typing. When off, only the
    /// manual expand operations resolve triggers.
    pub auto_trigger: bool,
    /// How long an armed keystroke stays valid before the matching
    /// buffer-change event is considered stale, in milliseconds.
    pub staleness_ms: u64,
    /// Maximum number of remembered recently-expanded prefixes.
    pub mru_capacity: usize,
}

impl Settings {
    /// Staleness window as a [`Duration`].
    pub fn staleness(&self) -> Duration {
        Duration::from_millis(self.staleness_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_trigger: true,
            staleness_ms: 100,
            mru_capacity: 50,
        }
    }
}
