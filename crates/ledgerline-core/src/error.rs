//! Error types for Ledgerline Core.

use thiserror::Error;

/// Errors raised while encoding, decoding or signing.
///
/// These are the "cannot process" failures, kept apart from
/// [`ValidationError`] which reports a malformed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("{what} has wrong size: expected {expected} bytes, got {actual}")]
    KeySize {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("unsupported payload version: {0}")]
    UnsupportedVersion(u64),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("payload is not in canonical form")]
    NonCanonical,

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Stateless validation failures.
///
/// Every variant names the offending field as a path, e.g.
/// `commands[1].transfer_asset.amount`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: malformed value {value:?}")]
    GrammarViolation { field: String, value: String },

    #[error("{field}: {reason}")]
    BoundViolation { field: String, reason: String },

    #[error("created_time {created_time} outside freshness window [{earliest}, {latest}]")]
    EnvelopeStale {
        created_time: u64,
        earliest: u64,
        latest: u64,
    },

    #[error("empty structure: {0}")]
    EmptyStructure(String),

    #[error("{field}: expected {expected} bytes, got {actual}")]
    KeySizeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("{field}: unknown permission {value:?}")]
    UnknownPermission { field: String, value: String },

    #[error("signature verification failed: {0}")]
    SignatureFailed(String),
}

impl ValidationError {
    pub(crate) fn grammar(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::GrammarViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn bound(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BoundViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The field path this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::GrammarViolation { field, .. }
            | Self::BoundViolation { field, .. }
            | Self::KeySizeMismatch { field, .. }
            | Self::UnknownPermission { field, .. } => Some(field),
            Self::EnvelopeStale { .. } => Some("created_time"),
            Self::EmptyStructure(_) | Self::SignatureFailed(_) => None,
        }
    }
}
