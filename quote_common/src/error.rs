//! Error types shared between the CLI and the sync daemon.
//!
//! The `QuoteError` enum unifies the failure cases of the quote store: rejected
//! input, unreadable payloads, remote failures, and the I/O and locking problems
//! underneath them, so every crate can propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the CLI and the sync daemon.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// A required field was empty after trimming.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Import or storage payload could not be read as quote data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Remote fetch or push failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("Remote returned status {0}")]
    RemoteStatus(u16),

    /// I/O error from the storage directory or an import/export file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The process signal handler could not be installed.
    #[error("Signal handler error: {0}")]
    Signal(String),

    /// A poisoned mutex guarding the shared store was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
