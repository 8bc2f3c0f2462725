//! Finalized transactions.

use crate::canonical;
use crate::command::Command;
use crate::crypto::{Keypair, Sha3Hash};
use crate::signed::SignedTransaction;
use crate::types::{Envelope, Timestamp};

/// An immutable, validated transaction.
///
/// Produced by [`crate::builder::TransactionBuilder::build`] or by decoding
/// canonical bytes. There is no serde path into this type. Commands keep
/// the order they were appended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    envelope: Envelope,
    quorum: u32,
    commands: Vec<Command>,
}

impl Transaction {
    pub(crate) fn new(envelope: Envelope, quorum: u32, commands: Vec<Command>) -> Self {
        Self {
            envelope,
            quorum,
            commands,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn creator_account_id(&self) -> &str {
        &self.envelope.creator_account_id
    }

    pub fn created_time(&self) -> Timestamp {
        self.envelope.created_time
    }

    /// Number of signatures the creator account requires.
    pub fn quorum(&self) -> u32 {
        self.quorum
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Canonical CBOR encoding of this transaction (the reduced payload).
    pub fn payload(&self) -> Vec<u8> {
        canonical::transaction_payload(self)
    }

    /// SHA3-256 over the reduced payload; the transaction identifier.
    pub fn hash(&self) -> Sha3Hash {
        Sha3Hash::hash(&self.payload())
    }

    /// Wrap in a signed artifact carrying one signature.
    pub fn sign(self, keypair: &Keypair) -> SignedTransaction {
        SignedTransaction::new(self).sign(keypair)
    }
}
