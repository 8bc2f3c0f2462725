//! Operations on encoded artifacts.
//!
//! These work on raw bytes for callers that receive payloads from outside
//! and never hold the typed values.

use ledgerline_core::{
    decode_query, decode_transaction, FieldValidator, Keypair, Query, Sha3Hash, SignedQuery,
    SignedTransaction, Transaction,
};

use crate::error::Result;

/// Hash a canonical transaction payload. The payload must decode.
pub fn hash_transaction(payload: &[u8]) -> Result<Sha3Hash> {
    decode_transaction(payload)?;
    Ok(Sha3Hash::hash(payload))
}

/// Hash a canonical query payload. The payload must decode.
pub fn hash_query(payload: &[u8]) -> Result<Sha3Hash> {
    decode_query(payload)?;
    Ok(Sha3Hash::hash(payload))
}

/// Decode and field-check a transaction payload, then return the encoded
/// signed artifact. Nothing is signed if a check fails.
pub fn sign_transaction(
    payload: &[u8],
    keypair: &Keypair,
    validator: &FieldValidator,
) -> Result<Vec<u8>> {
    let tx: Transaction = decode_transaction(payload)?;
    validator.validate_transaction(&tx)?;
    Ok(tx.sign(keypair).to_bytes())
}

/// Decode and field-check a query payload, then return the encoded signed
/// artifact. Nothing is signed if a check fails.
pub fn sign_query(payload: &[u8], keypair: &Keypair, validator: &FieldValidator) -> Result<Vec<u8>> {
    let query: Query = decode_query(payload)?;
    validator.validate_query(&query)?;
    Ok(query.sign(keypair).to_bytes())
}

/// Field-check and verify an encoded signed transaction.
pub fn validate_transaction(artifact: &[u8], validator: &FieldValidator) -> Result<SignedTransaction> {
    let signed = SignedTransaction::from_bytes(artifact)?;
    validator.validate_signed_transaction(&signed)?;
    Ok(signed)
}

/// Field-check and verify an encoded signed query.
pub fn validate_query(artifact: &[u8], validator: &FieldValidator) -> Result<SignedQuery> {
    let signed = SignedQuery::from_bytes(artifact)?;
    validator.validate_signed_query(&signed)?;
    Ok(signed)
}
