//! End-to-end scenarios through the public API.

use std::sync::Arc;

use anyhow::Result;
use proptest::prelude::*;

use ledgerline::core::{
    decode_query, grammar, Clock, FixedClock, QueryRequest, SystemClock, ValidationError,
};
use ledgerline::transport::memory::MemoryTransport;
use ledgerline::{
    blob, Client, ClientConfig, FieldValidator, Keypair, LedgerlineError, QueryBuilder,
    QueryStatus, SignedQuery, SignedTransaction, StaticKeyProvider, TransactionBuilder, TxStatus,
    ValidatorConfig,
};
use ledgerline_testkit::{multi_party_fixtures, TestFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn fresh_builder() -> TransactionBuilder {
    TransactionBuilder::new()
        .creator_account_id("admin@test")
        .created_time(SystemClock.now_ms())
}

#[test]
fn test_create_domain_and_asset_signed() -> Result<()> {
    let tx = fresh_builder()
        .create_domain("ru", "user")
        .create_asset("dollar", "ru", 2)
        .build()?;

    let signed = tx.sign(&Keypair::generate());
    assert_eq!(signed.signatures().len(), 1);
    assert_eq!(signed.hash().as_bytes().len(), 32);

    let decoded = SignedTransaction::from_bytes(&signed.to_bytes())?;
    assert_eq!(decoded.value().commands().len(), 2);
    decoded.verify()?;
    Ok(())
}

#[test]
fn test_asset_info_query_decodes() -> Result<()> {
    let query = QueryBuilder::new()
        .creator_account_id("admin@test")
        .created_time(SystemClock.now_ms())
        .query_counter(1)
        .get_asset_info("dollar#ru")
        .build()?;

    let signed = query.sign(&Keypair::generate());
    let decoded = SignedQuery::from_bytes(&signed.to_bytes())?;
    assert_eq!(
        decoded.value().request(),
        &QueryRequest::GetAssetInfo {
            asset_id: "dollar#ru".into()
        }
    );
    assert_eq!(decoded.value().counter(), 1);

    let payload_only = decode_query(decoded.payload())?;
    assert_eq!(&payload_only, decoded.value());
    Ok(())
}

#[test]
fn test_zero_amount_is_bound_violation() {
    let err = fresh_builder()
        .add_asset_quantity("admin@test", "asset#domain", "0")
        .build()
        .unwrap_err();
    assert!(
        matches!(err, ValidationError::BoundViolation { .. }),
        "got {:?}",
        err
    );
}

#[test]
fn test_envelope_only_is_empty_structure() {
    let err = fresh_builder().build().unwrap_err();
    assert!(matches!(err, ValidationError::EmptyStructure(_)), "got {:?}", err);
}

#[test]
fn test_account_name_examples() {
    let all_underscore = "_".repeat(32);
    for name in ["a", "_123", all_underscore.as_str()] {
        assert!(grammar::is_valid_name(name), "{:?} should be valid", name);
        let built = fresh_builder()
            .create_account(name, "test", [7u8; 32])
            .build();
        assert!(built.is_ok(), "{:?} rejected: {:?}", name, built);
    }

    let too_long = "a".repeat(34);
    for name in ["", "A", "ab%c", "ab^c", "userName", too_long.as_str()] {
        assert!(!grammar::is_valid_name(name), "{:?} should be invalid", name);
        let err = fresh_builder()
            .create_account(name, "test", [7u8; 32])
            .build()
            .unwrap_err();
        assert!(
            matches!(&err, ValidationError::GrammarViolation { field, .. }
                if field == "commands[0].create_account.account_name"),
            "{:?} gave {:?}",
            name,
            err
        );
    }
}

#[test]
fn test_report_collects_every_violation() {
    let fixture = TestFixture::new();
    let report = fixture
        .tx_builder()
        .quorum(0)
        .add_asset_quantity("admin@test", "asset#domain", "0")
        .create_domain("Bad Domain", "user")
        .report();

    assert!(!report.is_ok());
    assert!(report.envelope_violations().count() >= 1);
    assert_eq!(report.command_violations(0).count(), 1);
    assert_eq!(report.command_violations(1).count(), 1);
}

#[test]
fn test_multisig_artifact() -> Result<()> {
    let parties = multi_party_fixtures(3);
    let lead = &parties[0];
    let tx = lead
        .tx_builder()
        .quorum(3)
        .set_account_quorum("user0@test", 3)
        .build()?;

    let mut signed = tx.sign(&lead.keypair);
    for party in &parties[1..] {
        let cosigned = SignedTransaction::from_bytes(&signed.to_bytes())?.sign(&party.keypair);
        signed = cosigned;
    }

    assert_eq!(signed.signatures().len(), 3);
    lead.validator.validate_signed_transaction(&signed)?;
    Ok(())
}

#[test]
fn test_tampered_signature_rejected() -> Result<()> {
    let fixture = TestFixture::new();
    let signed = fixture.sign(fixture.tx_builder().create_domain("ru", "user"))?;

    let mut bytes = signed.to_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;

    let err = blob::validate_transaction(&bytes, &fixture.validator).unwrap_err();
    assert!(
        matches!(
            err,
            LedgerlineError::Validation(ValidationError::SignatureFailed(_))
        ),
        "got {:?}",
        err
    );
    Ok(())
}

#[tokio::test]
async fn test_client_transport_flow() -> Result<()> {
    init_tracing();

    let clock = Arc::new(FixedClock::new(1_700_000_000_000));
    let validator = FieldValidator::with_clock(ValidatorConfig::default(), clock.clone());
    let client = Client::with_clock(
        "admin@test",
        StaticKeyProvider::new(Keypair::from_seed(&[5u8; 32])),
        MemoryTransport::new(validator),
        ClientConfig::default(),
        clock,
    );

    let tx = client
        .transaction()
        .create_domain("ru", "user")
        .create_asset("dollar", "ru", 2)
        .build()?;
    assert_eq!(client.execute(tx).await?, TxStatus::Committed);

    let query = client.query().get_asset_info("dollar#ru").build()?;
    let signed = client.sign_query(query)?;
    assert!(matches!(
        client.send_query(&signed).await?,
        QueryStatus::Accepted { .. }
    ));
    assert_eq!(client.transport().accepted_queries().await, vec![signed.hash()]);
    Ok(())
}

#[tokio::test]
async fn test_client_rejects_invalid_before_transport() -> Result<()> {
    init_tracing();

    let client = Client::new(
        "admin@test",
        StaticKeyProvider::generate(),
        MemoryTransport::default(),
        ClientConfig::default(),
    );

    let err = client
        .transaction()
        .add_asset_quantity("admin@test", "asset#domain", "0")
        .build()
        .map_err(LedgerlineError::from)
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerlineError::Validation(ValidationError::BoundViolation { .. })
    ));
    assert_eq!(client.transport().transaction_count().await, 0);
    Ok(())
}

proptest! {
    #[test]
    fn test_names_over_limit_rejected(name in "[a-z_0-9]{33,48}") {
        let result = fresh_builder().create_account(name, "test", [7u8; 32]).build();
        let is_grammar_violation = matches!(result, Err(ValidationError::GrammarViolation { .. }));
        prop_assert!(is_grammar_violation);
    }
}
