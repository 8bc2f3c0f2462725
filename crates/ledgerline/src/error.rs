//! Error types for the client facade.

use ledgerline_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::keys::KeyError;
use crate::transport::TransportError;

/// Errors that can occur while building, signing or submitting.
#[derive(Debug, Error)]
pub enum LedgerlineError {
    /// The request is malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Encoding, decoding or signature failure.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Key material could not be obtained or imported.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// The transport failed to deliver or answer.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, LedgerlineError>;
