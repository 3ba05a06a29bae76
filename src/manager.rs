//! Provider registry and trigger resolution
//!
//! The `ProviderManager` is the single point of query across all registered
//! snippet providers. Registration order is the priority order: results are
//! concatenated in that order and duplicate prefixes keep their earliest
//! occurrence, so an earlier-registered dialect always wins a tie.
//!
//! Failure semantics: a provider that fails `init` is disabled and reported
//! once through the diagnostic channel; a provider whose query errors is
//! logged and treated as returning nothing. One failing provider must never
//! block the others or the caller.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::errors::RegistrationError;
use crate::host::Notifier;
use crate::models::{ResolutionContext, TriggerCandidate};
use crate::provider::SnippetProvider;

/// A provider slot owned by the manager.
///
/// Created when a snippet format is enabled by configuration; after that
/// only `enabled` ever changes.
struct ProviderRegistration {
    id: String,
    provider: Arc<dyn SnippetProvider>,
    enabled: bool,
}

/// Ordered set of registered snippet providers.
pub struct ProviderManager {
    registrations: RwLock<Vec<ProviderRegistration>>,
}

impl ProviderManager {
    pub fn new() -> Self {
        Self { registrations: RwLock::new(Vec::new()) }
    }

    /// Register a provider under a unique id.
    ///
    /// Providers rank by registration order when candidates collide.
    /// Registering an id twice fails without touching the existing slot.
    pub fn register(
        &self,
        id: impl Into<String>,
        provider: Arc<dyn SnippetProvider>,
    ) -> Result<(), RegistrationError> {
        let id = id.into();
        let mut registrations = self.registrations.write();
        if registrations.iter().any(|r| r.id == id) {
            return Err(RegistrationError::DuplicateProvider { id });
        }
        debug!("Registered snippet provider `{}`", id);
        registrations.push(ProviderRegistration { id, provider, enabled: true });
        Ok(())
    }

    /// True once at least one provider is registered.
    ///
    /// Used to decide whether to advertise trigger-based completion at all.
    pub fn has_any_provider(&self) -> bool {
        !self.registrations.read().is_empty()
    }

    /// Enable or disable a registration. Returns `false` for unknown ids.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        let mut registrations = self.registrations.write();
        match registrations.iter_mut().find(|r| r.id == id) {
            Some(registration) => {
                registration.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Initialize every registered provider concurrently.
    ///
    /// Each provider loads its snippet sources independently; a failure
    /// disables that provider and is surfaced once through `notifier`
    /// without aborting the others.
    pub async fn initialize(&self, notifier: &dyn Notifier) {
        let snapshot: Vec<(String, Arc<dyn SnippetProvider>)> = self
            .registrations
            .read()
            .iter()
            .map(|r| (r.id.clone(), Arc::clone(&r.provider)))
            .collect();

        let results = join_all(snapshot.iter().map(|(id, provider)| {
            let id = id.clone();
            let provider = Arc::clone(provider);
            async move { (id, provider.init().await) }
        }))
        .await;

        for (id, result) in results {
            if let Err(e) = result {
                warn!("Snippet provider `{}` failed to initialize: {}", id, e);
                notifier.warn(&format!("Snippet provider `{}` disabled: {}", id, e));
                self.set_enabled(&id, false);
            }
        }
    }

    /// Query every enabled provider and merge the results.
    ///
    /// Candidates are concatenated in registration order; with
    /// `context.auto_only` set, candidates lacking the auto-trigger flag are
    /// dropped before deduplication; duplicate prefixes keep the first
    /// occurrence. A provider returning an error contributes nothing.
    pub async fn resolve_triggers(&self, context: &ResolutionContext) -> Vec<TriggerCandidate> {
        let snapshot: Vec<(String, Arc<dyn SnippetProvider>)> = self
            .registrations
            .read()
            .iter()
            .filter(|r| r.enabled)
            .map(|r| (r.id.clone(), Arc::clone(&r.provider)))
            .collect();

        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut merged = Vec::new();
        for (id, provider) in snapshot {
            let candidates = match provider.trigger_snippets(context).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Snippet provider `{}` query failed: {}", id, e);
                    continue;
                }
            };
            for candidate in candidates {
                if context.auto_only && !candidate.auto_triggerable {
                    continue;
                }
                if seen.insert(candidate.prefix.clone()) {
                    merged.push(candidate);
                }
            }
        }
        merged
    }

    /// Dispose every registered provider. Errors are the providers' own.
    pub async fn dispose(&self) {
        let snapshot: Vec<Arc<dyn SnippetProvider>> = self
            .registrations
            .read()
            .iter()
            .map(|r| Arc::clone(&r.provider))
            .collect();
        for provider in snapshot {
            provider.dispose().await;
        }
    }
}

impl Default for ProviderManager {
    fn default() -> Self {
        Self::new()
    }
}
