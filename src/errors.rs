//! Error taxonomy for provider registration, loading, and resolution
//!
//! Failures here are isolated close to their source: a failing provider is
//! disabled or treated as an empty result, never allowed to abort the other
//! providers or to escape into the host editor's own error handling.

use thiserror::Error;

/// Configuration error raised when registering a provider.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Each provider id must be unique across the manager.
    #[error("snippet provider `{id}` is already registered")]
    DuplicateProvider { id: String },
}

/// A provider failed to load its snippet sources.
///
/// Disables that provider only; manager initialization continues.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A provider's trigger query failed.
///
/// Isolated per provider and treated as an empty result by the manager.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ResolutionError {
    message: String,
}

impl ResolutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// The host editor failed to insert a snippet body.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InsertError {
    message: String,
}

impl InsertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
