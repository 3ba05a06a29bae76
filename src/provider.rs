//! Snippet provider capability contract
//!
//! One implementation exists per snippet-format dialect (each with its own
//! on-disk syntax and parser). The engine is polymorphic over the capability
//! set and never looks inside a dialect: it registers providers, initializes
//! them, queries them for trigger candidates, and disposes them.

use async_trait::async_trait;

use crate::errors::{ProviderInitError, ResolutionError};
use crate::models::{ResolutionContext, TriggerCandidate};

/// A source of trigger candidates for one snippet-format dialect.
///
/// `init` is called once before any query and may perform file I/O; a
/// failure disables the provider without affecting the others. Queries are
/// issued with the text immediately preceding the cursor and the buffer's
/// filetype, and may legitimately return no, one, or several candidates
/// (prefix ambiguity within one dialect).
#[async_trait]
pub trait SnippetProvider: Send + Sync {
    /// Load the provider's snippet sources.
    async fn init(&self) -> Result<(), ProviderInitError>;

    /// Trigger candidates matching the given cursor context.
    async fn trigger_snippets(
        &self,
        context: &ResolutionContext,
    ) -> Result<Vec<TriggerCandidate>, ResolutionError>;

    /// Release any resources held by the provider.
    async fn dispose(&self) {}
}
