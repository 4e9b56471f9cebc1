//! Error handling types for emmet-lsp
//!
//! This module provides the error type shared by configuration loading and
//! command argument handling.

use std::sync::PoisonError;
use thiserror::Error;

/// Error type for emmet-lsp operations
#[derive(Debug, Error)]
pub enum EmmetError {
    /// Command arguments did not have the expected shape
    #[error("Invalid command arguments: {message}")]
    InvalidArguments { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration file failed to parse
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON payload failed to (de)serialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for emmet-lsp operations
pub type EmmetResult<T> = Result<T, EmmetError>;

/// Helper trait to convert PoisonError into a recovered guard
pub trait LockResultExt<T> {
    /// Recover the guard from a poisoned lock, logging which operation hit it.
    fn recover_poison(self, context: &str) -> Result<T, EmmetError>;
}

impl<T> LockResultExt<T> for Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> Result<T, EmmetError> {
        match self {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                log::warn!(
                    target: "emmet_lsp::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                Ok(poisoned.into_inner())
            }
        }
    }
}

impl EmmetError {
    /// Create an invalid arguments error
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        EmmetError::InvalidArguments {
            message: message.into(),
        }
    }
}
