//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation must produce identical:
//! - canonical payload bytes
//! - SHA3-256 digest of the payload
//! - Ed25519 signature over the digest (deterministic)
//! - encoded signed artifact

use std::sync::Arc;

use ledgerline::blob;
use ledgerline::core::{
    decode_transaction, FieldValidator, FixedClock, Keypair, SignedQuery, SignedTransaction,
    ValidatorConfig,
};
use ledgerline_testkit::vectors::{all_vectors, generate_from_vector, vectors_json, VectorBody};

#[test]
fn test_vectors_verify() {
    for v in all_vectors() {
        let out = generate_from_vector(&v).unwrap();

        match &v.body {
            VectorBody::Transaction { .. } => {
                let signed = SignedTransaction::from_bytes(&out.artifact).unwrap();
                assert!(signed.verify().is_ok(), "verify failed for {}", v.name);
                assert_eq!(signed.hash(), out.hash, "hash mismatch for {}", v.name);
                assert_eq!(
                    blob::hash_transaction(&out.payload).unwrap(),
                    out.hash,
                    "blob hash mismatch for {}",
                    v.name
                );
            }
            VectorBody::Query { .. } => {
                let signed = SignedQuery::from_bytes(&out.artifact).unwrap();
                assert!(signed.verify().is_ok(), "verify failed for {}", v.name);
                assert_eq!(signed.hash(), out.hash, "hash mismatch for {}", v.name);
                assert_eq!(blob::hash_query(&out.payload).unwrap(), out.hash);
            }
        }
    }
}

#[test]
fn test_blob_signing_matches_typed_signing() {
    for v in all_vectors() {
        let out = generate_from_vector(&v).unwrap();
        let keypair = Keypair::from_seed(&v.seed);
        let validator = FieldValidator::with_clock(
            ValidatorConfig::default(),
            Arc::new(FixedClock::new(v.created_time)),
        );

        let artifact = match &v.body {
            VectorBody::Transaction { .. } => {
                blob::sign_transaction(&out.payload, &keypair, &validator)
            }
            VectorBody::Query { .. } => blob::sign_query(&out.payload, &keypair, &validator),
        }
        .unwrap();
        assert_eq!(artifact, out.artifact, "artifact mismatch for {}", v.name);
    }
}

#[test]
fn test_payload_reencodes_identically() {
    for v in all_vectors() {
        let out = generate_from_vector(&v).unwrap();
        if let VectorBody::Transaction { .. } = v.body {
            let tx = decode_transaction(&out.payload).unwrap();
            assert_eq!(tx.payload(), out.payload, "re-encode mismatch for {}", v.name);
        }
    }
}

// =============================================================================
// REJECTION TEST VECTORS
// =============================================================================

#[test]
fn test_reject_trailing_bytes() {
    let out = generate_from_vector(&all_vectors()[0]).unwrap();
    let mut payload = out.payload.clone();
    payload.push(0x00);
    assert!(blob::hash_transaction(&payload).is_err());
}

#[test]
fn test_reject_query_payload_as_transaction() {
    let query = all_vectors()
        .into_iter()
        .find(|v| matches!(v.body, VectorBody::Query { .. }))
        .unwrap();
    let out = generate_from_vector(&query).unwrap();
    assert!(blob::hash_transaction(&out.payload).is_err());
}

#[test]
fn print_golden_vectors_json() {
    let json = vectors_json().unwrap();
    println!("{}", json);
}
