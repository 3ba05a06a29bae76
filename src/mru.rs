//! Bounded most-recently-used trigger list
//!
//! Remembers which prefixes were expanded, most recent first, so the host's
//! candidate menu can bias its display ordering. Automatic resolution never
//! consults this list; registration order stays authoritative there.
//! Cross-session persistence is the host's job via
//! [`MruStore`](crate::host::MruStore).

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

/// In-memory MRU list of expanded trigger prefixes.
pub struct RecentTriggers {
    entries: Mutex<LruCache<String, ()>>,
}

impl RecentTriggers {
    /// Create a list holding at most `capacity` prefixes. A capacity of
    /// zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { entries: Mutex::new(LruCache::new(capacity)) }
    }

    /// Record an expanded prefix, promoting it if already present.
    pub fn record(&self, prefix: &str) {
        self.entries.lock().put(prefix.to_string(), ());
    }

    /// Prefixes in most-recent-first order.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(prefix, _)| prefix.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
