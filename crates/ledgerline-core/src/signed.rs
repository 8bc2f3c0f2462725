//! Signed artifacts ready for submission.
//!
//! A signed artifact carries the canonical payload, its SHA3-256 digest and
//! an append-only list of signatures over that digest.

use bytes::Bytes;
use tracing::debug;

use crate::canonical;
use crate::crypto::{Keypair, PublicKey, Sha3Hash, Signature};
use crate::error::{CoreError, ValidationError};
use crate::query::Query;
use crate::transaction::Transaction;

/// A payload type that can be wrapped in a [`Signed`] artifact.
pub trait Payload: Sized {
    /// Label used in logs and errors.
    const LABEL: &'static str;

    /// Canonical bytes of the payload.
    fn canonical_payload(&self) -> Vec<u8>;

    /// Decode from canonical bytes.
    fn decode_payload(bytes: &[u8]) -> Result<Self, CoreError>;
}

impl Payload for Transaction {
    const LABEL: &'static str = "transaction";

    fn canonical_payload(&self) -> Vec<u8> {
        canonical::transaction_payload(self)
    }

    fn decode_payload(bytes: &[u8]) -> Result<Self, CoreError> {
        canonical::decode_transaction(bytes)
    }
}

impl Payload for Query {
    const LABEL: &'static str = "query";

    fn canonical_payload(&self) -> Vec<u8> {
        canonical::query_payload(self)
    }

    fn decode_payload(bytes: &[u8]) -> Result<Self, CoreError> {
        canonical::decode_query(bytes)
    }
}

/// One signer's public key and signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureEntry {
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl SignatureEntry {
    /// Verify this signature against a digest.
    pub fn verify(&self, hash: &Sha3Hash) -> Result<(), CoreError> {
        self.public_key.verify(hash.as_bytes(), &self.signature)
    }
}

/// A payload plus its digest and signatures.
#[derive(Debug, Clone)]
pub struct Signed<T> {
    value: T,
    payload: Bytes,
    hash: Sha3Hash,
    signatures: Vec<SignatureEntry>,
}

/// A signed transaction.
pub type SignedTransaction = Signed<Transaction>;

/// A signed query.
pub type SignedQuery = Signed<Query>;

impl<T: Payload> Signed<T> {
    /// Wrap a value with no signatures yet.
    pub fn new(value: T) -> Self {
        let payload = Bytes::from(value.canonical_payload());
        let hash = Sha3Hash::hash(&payload);
        Self {
            value,
            payload,
            hash,
            signatures: Vec::new(),
        }
    }

    /// Sign the digest and append the signature.
    pub fn sign(mut self, keypair: &Keypair) -> Self {
        let entry = SignatureEntry {
            public_key: keypair.public_key(),
            signature: keypair.sign(self.hash.as_bytes()),
        };
        debug!(
            kind = T::LABEL,
            hash = %self.hash,
            signer = ?entry.public_key,
            "signed payload"
        );
        self.signatures.push(entry);
        self
    }

    /// Append an externally produced signature.
    pub fn add_signature(&mut self, entry: SignatureEntry) {
        self.signatures.push(entry);
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// The canonical payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// SHA3-256 over the payload.
    pub fn hash(&self) -> Sha3Hash {
        self.hash
    }

    /// Signatures in the order they were added.
    pub fn signatures(&self) -> &[SignatureEntry] {
        &self.signatures
    }

    /// Check there is at least one signature and that all of them verify.
    pub fn verify(&self) -> Result<(), ValidationError> {
        if self.signatures.is_empty() {
            return Err(ValidationError::EmptyStructure(format!(
                "{} has no signatures",
                T::LABEL
            )));
        }
        for (i, entry) in self.signatures.iter().enumerate() {
            entry.verify(&self.hash).map_err(|e| {
                ValidationError::SignatureFailed(format!(
                    "signatures[{}] by {}: {}",
                    i,
                    entry.public_key.to_hex(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Encode the whole artifact.
    pub fn to_bytes(&self) -> Vec<u8> {
        canonical::signed_bytes(&self.payload, &self.hash, &self.signatures)
    }

    /// Decode an artifact. Signatures are not verified.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let parts = canonical::decode_signed(bytes)?;
        let value = T::decode_payload(&parts.payload)?;
        Ok(Self {
            value,
            payload: Bytes::from(parts.payload),
            hash: parts.hash,
            signatures: parts.signatures,
        })
    }
}

impl<T: PartialEq> PartialEq for Signed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload && self.signatures == other.signatures
    }
}

impl<T: Eq> Eq for Signed<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::query::QueryRequest;
    use crate::types::Envelope;

    fn tx() -> Transaction {
        Transaction::new(
            Envelope::new("admin@test", 1_700_000_000_000),
            1,
            vec![Command::AppendRole {
                account_id: "alice@test".into(),
                role_name: "user".into(),
            }],
        )
    }

    #[test]
    fn test_unsigned_fails_verification() {
        let signed = SignedTransaction::new(tx());
        assert!(matches!(
            signed.verify(),
            Err(ValidationError::EmptyStructure(_))
        ));
    }

    #[test]
    fn test_signatures_accumulate_in_order() {
        let a = Keypair::from_seed(&[1u8; 32]);
        let b = Keypair::from_seed(&[2u8; 32]);
        let signed = SignedTransaction::new(tx()).sign(&a).sign(&b);
        assert_eq!(signed.signatures().len(), 2);
        assert_eq!(signed.signatures()[0].public_key, a.public_key());
        assert_eq!(signed.signatures()[1].public_key, b.public_key());
        assert!(signed.verify().is_ok());
    }

    #[test]
    fn test_bad_signature_reported() {
        let a = Keypair::from_seed(&[1u8; 32]);
        let b = Keypair::from_seed(&[2u8; 32]);
        let mut signed = SignedTransaction::new(tx()).sign(&a);
        signed.add_signature(SignatureEntry {
            public_key: b.public_key(),
            signature: a.sign(signed.hash().as_bytes()),
        });
        let err = signed.verify().unwrap_err();
        assert!(matches!(err, ValidationError::SignatureFailed(ref m) if m.starts_with("signatures[1]")));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let kp = Keypair::from_seed(&[5u8; 32]);
        let signed = SignedTransaction::new(tx()).sign(&kp);
        let decoded = SignedTransaction::from_bytes(&signed.to_bytes()).unwrap();
        assert_eq!(signed, decoded);
        assert_eq!(decoded.value(), signed.value());
        assert!(decoded.verify().is_ok());
    }

    #[test]
    fn test_query_artifact_rejected_as_transaction() {
        let kp = Keypair::from_seed(&[5u8; 32]);
        let query = Query::new(Envelope::new("admin@test", 1), 1, QueryRequest::GetRoles);
        let bytes = SignedQuery::new(query).sign(&kp).to_bytes();
        assert!(SignedTransaction::from_bytes(&bytes).is_err());
    }
}
