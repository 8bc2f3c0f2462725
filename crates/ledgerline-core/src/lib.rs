//! # Ledgerline Core
//!
//! Pure primitives for building, validating, encoding and signing ledger
//! transactions and queries.
//!
//! This crate contains no I/O and no networking. Everything here is
//! deterministic computation over in-memory values, apart from the clock
//! injected into [`FieldValidator`].
//!
//! ## Key Types
//!
//! - [`TransactionBuilder`] / [`QueryBuilder`] - accumulate a draft
//! - [`Transaction`] / [`Query`] - immutable, validated values
//! - [`SignedTransaction`] / [`SignedQuery`] - payload, digest and signatures
//! - [`FieldValidator`] - stateless field checks with a configurable window
//!
//! ## Pipeline
//!
//! builder → `build()` (validation) → canonical CBOR payload → SHA3-256
//! digest → Ed25519 signature over the digest. See [`canonical`].

pub mod amount;
pub mod builder;
pub mod canonical;
pub mod command;
pub mod crypto;
pub mod error;
pub mod grammar;
pub mod permission;
pub mod query;
pub mod signed;
pub mod transaction;
pub mod types;
pub mod validation;

pub use amount::{Amount, AmountError};
pub use builder::{BuilderState, QueryBuilder, TransactionBuilder};
pub use canonical::{decode_query, decode_transaction, PAYLOAD_VERSION};
pub use command::{Command, CommandKind};
pub use crypto::{Keypair, PublicKey, Sha3Hash, Signature};
pub use error::{CoreError, ValidationError};
pub use permission::{GrantablePermission, RolePermission, UnknownPermissionError};
pub use query::{Query, QueryKind, QueryRequest};
pub use signed::{Payload, SignatureEntry, Signed, SignedQuery, SignedTransaction};
pub use transaction::Transaction;
pub use types::{AccountId, AssetId, Envelope, IdParseError, Timestamp};
pub use validation::{
    Clock, FieldValidator, FixedClock, SystemClock, ValidationReport, ValidatorConfig,
};
