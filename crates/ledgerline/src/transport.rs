//! Transport abstraction for submitting signed artifacts.
//!
//! The transport carries encoded artifacts to a ledger service and reports
//! what became of them. Implementations own timeouts, retries and framing;
//! the client only sees terminal statuses.

use async_trait::async_trait;
use bytes::Bytes;
use ledgerline_core::{CoreError, Sha3Hash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote end could not be reached.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// The remote end could not decode the artifact.
    #[error("artifact rejected before validation: {0}")]
    Undecodable(#[from] CoreError),

    /// No terminal status arrived in time.
    #[error("timed out waiting for status of {0}")]
    Timeout(Sha3Hash),
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// What the ledger service reports about a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// The service has not seen this transaction.
    NotReceived,
    /// Accepted, awaiting commit.
    Pending,
    /// Committed to the ledger.
    Committed,
    /// Refused by the service.
    Rejected { reason: String },
}

impl TxStatus {
    /// Committed or rejected; nothing further will happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Committed | TxStatus::Rejected { .. })
    }
}

/// What the ledger service reports about a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    /// The query passed the service's checks.
    Accepted { hash: Sha3Hash },
    /// The query was refused.
    Rejected { reason: String },
}

/// Carries encoded signed artifacts to a ledger service.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit an encoded signed transaction. Returns its hash.
    async fn submit_transaction(&self, artifact: Bytes) -> Result<Sha3Hash>;

    /// Current status of a submitted transaction.
    async fn status(&self, hash: &Sha3Hash) -> Result<TxStatus>;

    /// Submit an encoded signed query.
    async fn send_query(&self, artifact: Bytes) -> Result<QueryStatus>;
}

/// An in-memory transport for testing.
///
/// Runs the same stateless checks a service would: decode, field
/// validation and signature verification.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;
    use tracing::{info, warn};

    use ledgerline_core::{FieldValidator, SignedQuery, SignedTransaction};

    /// In-memory transport for tests.
    ///
    /// Keeps every submitted status and accepted query hash for the life of
    /// the value. Neither log is bounded or trimmed.
    #[derive(Debug)]
    pub struct MemoryTransport {
        validator: FieldValidator,
        statuses: RwLock<HashMap<Sha3Hash, TxStatus>>,
        /// Accepted query hashes in arrival order. Unbounded.
        queries: RwLock<Vec<Sha3Hash>>,
    }

    impl MemoryTransport {
        pub fn new(validator: FieldValidator) -> Self {
            Self {
                validator,
                statuses: RwLock::new(HashMap::new()),
                queries: RwLock::new(Vec::new()),
            }
        }

        /// Number of transactions received so far.
        pub async fn transaction_count(&self) -> usize {
            self.statuses.read().await.len()
        }

        /// Hashes of accepted queries, in arrival order.
        pub async fn accepted_queries(&self) -> Vec<Sha3Hash> {
            self.queries.read().await.clone()
        }
    }

    impl Default for MemoryTransport {
        fn default() -> Self {
            Self::new(FieldValidator::default())
        }
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn submit_transaction(&self, artifact: Bytes) -> Result<Sha3Hash> {
            let signed = SignedTransaction::from_bytes(&artifact)?;
            let hash = signed.hash();

            let mut statuses = self.statuses.write().await;
            if let Some(existing) = statuses.get(&hash) {
                warn!(%hash, status = ?existing, "duplicate transaction ignored");
                return Ok(hash);
            }

            let status = match self.validator.validate_signed_transaction(&signed) {
                Ok(()) => TxStatus::Committed,
                Err(err) => TxStatus::Rejected {
                    reason: err.to_string(),
                },
            };
            info!(%hash, status = ?status, "transaction received");
            statuses.insert(hash, status);
            Ok(hash)
        }

        async fn status(&self, hash: &Sha3Hash) -> Result<TxStatus> {
            let statuses = self.statuses.read().await;
            Ok(statuses.get(hash).cloned().unwrap_or(TxStatus::NotReceived))
        }

        async fn send_query(&self, artifact: Bytes) -> Result<QueryStatus> {
            let signed = SignedQuery::from_bytes(&artifact)?;
            let hash = signed.hash();
            match self.validator.validate_signed_query(&signed) {
                Ok(()) => {
                    self.queries.write().await.push(hash);
                    info!(%hash, query = signed.value().request().name(), "query accepted");
                    Ok(QueryStatus::Accepted { hash })
                }
                Err(err) => {
                    info!(%hash, error = %err, "query rejected");
                    Ok(QueryStatus::Rejected {
                        reason: err.to_string(),
                    })
                }
            }
        }
    }
}
