//! High-level client tying an account, a key provider and a transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, instrument};

use ledgerline_core::{
    Clock, FieldValidator, Query, QueryBuilder, Sha3Hash, SignedQuery, SignedTransaction,
    SystemClock, Transaction, TransactionBuilder,
};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::keys::KeyProvider;
use crate::transport::{QueryStatus, Transport, TransportError, TxStatus};

/// A client acting on behalf of one account.
///
/// Builders handed out by the client come pre-filled with the account id,
/// the current time and the configured quorum. Queries get a fresh counter
/// each time.
pub struct Client<K, T> {
    account_id: String,
    keys: K,
    transport: T,
    config: ClientConfig,
    validator: FieldValidator,
    counter: AtomicU64,
}

impl<K: KeyProvider, T: Transport> Client<K, T> {
    pub fn new(account_id: impl Into<String>, keys: K, transport: T, config: ClientConfig) -> Self {
        Self::with_clock(account_id, keys, transport, config, Arc::new(SystemClock))
    }

    /// Create a client reading time from `clock`.
    pub fn with_clock(
        account_id: impl Into<String>,
        keys: K,
        transport: T,
        config: ClientConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let validator = FieldValidator::with_clock(config.validator.clone(), clock);
        Self {
            account_id: account_id.into(),
            keys,
            transport,
            config,
            validator,
            counter: AtomicU64::new(0),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A transaction builder for this account.
    pub fn transaction(&self) -> TransactionBuilder {
        TransactionBuilder::with_validator(self.validator.clone())
            .creator_account_id(self.account_id.clone())
            .created_time(self.validator.now_ms())
            .quorum(self.config.default_quorum)
    }

    /// A query builder for this account with the next counter value.
    pub fn query(&self) -> QueryBuilder {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        QueryBuilder::with_validator(self.validator.clone())
            .creator_account_id(self.account_id.clone())
            .created_time(self.validator.now_ms())
            .query_counter(counter)
    }

    /// Sign with the provider's key.
    pub fn sign_transaction(&self, tx: Transaction) -> Result<SignedTransaction> {
        let keypair = self.keys.keypair()?;
        Ok(tx.sign(&keypair))
    }

    /// Sign with the provider's key.
    pub fn sign_query(&self, query: Query) -> Result<SignedQuery> {
        let keypair = self.keys.keypair()?;
        Ok(query.sign(&keypair))
    }

    /// Submit a signed transaction. Returns its hash.
    #[instrument(skip_all, fields(hash = %signed.hash()))]
    pub async fn submit(&self, signed: &SignedTransaction) -> Result<Sha3Hash> {
        self.validator.validate_signed_transaction(signed)?;
        let hash = self
            .transport
            .submit_transaction(Bytes::from(signed.to_bytes()))
            .await?;
        info!(commands = signed.value().commands().len(), "transaction submitted");
        Ok(hash)
    }

    pub async fn status(&self, hash: &Sha3Hash) -> Result<TxStatus> {
        Ok(self.transport.status(hash).await?)
    }

    /// Poll until the transaction is committed or rejected.
    ///
    /// Fails with [`TransportError::Timeout`] once the configured status
    /// timeout elapses.
    #[instrument(skip(self))]
    pub async fn wait_for_commit(&self, hash: &Sha3Hash) -> Result<TxStatus> {
        let deadline = tokio::time::Instant::now() + self.config.status_timeout();
        loop {
            let status = self.transport.status(hash).await?;
            if status.is_terminal() {
                debug!(?status, "terminal status");
                return Ok(status);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(TransportError::Timeout(*hash).into());
            }
            tokio::time::sleep(self.config.status_poll_interval()).await;
        }
    }

    /// Build-sign-submit-wait in one call.
    pub async fn execute(&self, tx: Transaction) -> Result<TxStatus> {
        let signed = self.sign_transaction(tx)?;
        let hash = self.submit(&signed).await?;
        self.wait_for_commit(&hash).await
    }

    /// Send a signed query.
    #[instrument(skip_all, fields(hash = %signed.hash(), query = signed.value().request().name()))]
    pub async fn send_query(&self, signed: &SignedQuery) -> Result<QueryStatus> {
        self.validator.validate_signed_query(signed)?;
        Ok(self
            .transport
            .send_query(Bytes::from(signed.to_bytes()))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StaticKeyProvider;
    use crate::transport::memory::MemoryTransport;
    use crate::LedgerlineError;
    use async_trait::async_trait;
    use ledgerline_core::{FixedClock, Keypair, ValidationError, ValidatorConfig};

    const NOW: u64 = 1_700_000_000_000;

    fn client() -> Client<StaticKeyProvider, MemoryTransport> {
        let clock = Arc::new(FixedClock::new(NOW));
        let validator = FieldValidator::with_clock(ValidatorConfig::default(), clock.clone());
        Client::with_clock(
            "admin@test",
            StaticKeyProvider::new(Keypair::from_seed(&[9u8; 32])),
            MemoryTransport::new(validator),
            ClientConfig::default(),
            clock,
        )
    }

    #[test]
    fn test_transaction_prefilled() {
        let c = client();
        let tx = c.transaction().create_domain("test", "user").build().unwrap();
        assert_eq!(tx.creator_account_id(), "admin@test");
        assert_eq!(tx.created_time(), NOW);
        assert_eq!(tx.quorum(), 1);
    }

    #[test]
    fn test_query_counter_increments() {
        let c = client();
        let first = c.query().get_roles().build().unwrap();
        let second = c.query().get_roles().build().unwrap();
        assert_eq!(first.counter(), 1);
        assert_eq!(second.counter(), 2);
    }

    #[tokio::test]
    async fn test_execute_commits() {
        let c = client();
        let tx = c.transaction().create_domain("test", "user").build().unwrap();
        let status = c.execute(tx).await.unwrap();
        assert_eq!(status, TxStatus::Committed);
        assert_eq!(c.transport().transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_submit_unsigned_rejected_locally() {
        let c = client();
        let tx = c.transaction().create_domain("test", "user").build().unwrap();
        let unsigned = SignedTransaction::new(tx);
        let err = c.submit(&unsigned).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerlineError::Validation(ValidationError::EmptyStructure(_))
        ));
        assert_eq!(c.transport().transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_query_accepted() {
        let c = client();
        let query = c.query().get_account("admin@test").build().unwrap();
        let signed = c.sign_query(query).unwrap();
        let status = c.send_query(&signed).await.unwrap();
        assert_eq!(
            status,
            QueryStatus::Accepted {
                hash: signed.hash()
            }
        );
    }

    /// A transport that never settles.
    struct Stalled;

    #[async_trait]
    impl Transport for Stalled {
        async fn submit_transaction(
            &self,
            artifact: Bytes,
        ) -> std::result::Result<Sha3Hash, TransportError> {
            Ok(Sha3Hash::hash(&artifact))
        }

        async fn status(&self, _hash: &Sha3Hash) -> std::result::Result<TxStatus, TransportError> {
            Ok(TxStatus::Pending)
        }

        async fn send_query(
            &self,
            _artifact: Bytes,
        ) -> std::result::Result<QueryStatus, TransportError> {
            Err(TransportError::Unavailable("stalled".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_commit_times_out() {
        let c = Client::new(
            "admin@test",
            StaticKeyProvider::generate(),
            Stalled,
            ClientConfig {
                status_timeout_ms: 500,
                ..ClientConfig::default()
            },
        );
        let err = c
            .wait_for_commit(&Sha3Hash::hash(b"tx"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerlineError::Transport(TransportError::Timeout(_))
        ));
    }
}
