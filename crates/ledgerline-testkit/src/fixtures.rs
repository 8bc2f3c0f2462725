//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use ledgerline_core::{
    Clock, FieldValidator, FixedClock, Keypair, PublicKey, QueryBuilder, SignedTransaction,
    Timestamp, TransactionBuilder, ValidationError, ValidatorConfig,
};

/// Wall-clock value every fixture starts at (2023-11-14T22:13:20Z).
pub const FIXTURE_NOW: Timestamp = 1_700_000_000_000;

/// A test fixture with a signing account and a controllable clock.
#[derive(Debug)]
pub struct TestFixture {
    pub account_id: String,
    pub keypair: Keypair,
    pub clock: Arc<FixedClock>,
    pub validator: FieldValidator,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::with_keypair("admin@test", Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_keypair("admin@test", Keypair::from_seed(&seed))
    }

    pub fn with_keypair(account_id: impl Into<String>, keypair: Keypair) -> Self {
        Self::with_config(account_id, keypair, ValidatorConfig::default())
    }

    pub fn with_config(
        account_id: impl Into<String>,
        keypair: Keypair,
        config: ValidatorConfig,
    ) -> Self {
        let clock = Arc::new(FixedClock::new(FIXTURE_NOW));
        let validator = FieldValidator::with_clock(config, clock.clone());
        Self {
            account_id: account_id.into(),
            keypair,
            clock,
            validator,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now_ms()
    }

    /// Move the fixture clock forward.
    pub fn advance(&self, delta_ms: u64) {
        self.clock.advance(delta_ms);
    }

    /// A transaction builder stamped with this account and the fixture time.
    pub fn tx_builder(&self) -> TransactionBuilder {
        TransactionBuilder::with_validator(self.validator.clone())
            .creator_account_id(self.account_id.clone())
            .created_time(self.now())
    }

    /// A query builder stamped with this account and the fixture time.
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::with_validator(self.validator.clone())
            .creator_account_id(self.account_id.clone())
            .created_time(self.now())
    }

    /// Build and sign in one step.
    pub fn sign(&self, builder: TransactionBuilder) -> Result<SignedTransaction, ValidationError> {
        Ok(builder.build()?.sign(&self.keypair))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures for multi-signature tests.
///
/// Party `i` is `user{i}@test` with a key derived from seed byte `i`.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_keypair(format!("user{}@test", i), Keypair::from_seed(&seed))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_builds_valid_transaction() {
        let fixture = TestFixture::new();
        let signed = fixture
            .sign(fixture.tx_builder().create_domain("test", "user"))
            .unwrap();

        assert_eq!(signed.value().created_time(), FIXTURE_NOW);
        assert!(fixture.validator.validate_signed_transaction(&signed).is_ok());
    }

    #[test]
    fn test_fixture_clock_moves_window() {
        let fixture = TestFixture::with_seed([7u8; 32]);
        let signed = fixture
            .sign(fixture.tx_builder().create_domain("test", "user"))
            .unwrap();

        fixture.advance(25 * 60 * 60 * 1000);
        assert!(matches!(
            fixture.validator.validate_signed_transaction(&signed),
            Err(ValidationError::EnvelopeStale { .. })
        ));
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_fixtures(3);

        let pks: Vec<_> = parties.iter().map(|p| p.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
        assert_eq!(parties[2].account_id, "user2@test");
    }
}
