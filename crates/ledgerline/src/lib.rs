//! # Ledgerline
//!
//! Client-side toolkit for a permissioned ledger: build transactions and
//! queries, check every field against the ledger grammar, encode them
//! canonically, hash with SHA3-256 and sign with Ed25519.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ledgerline::{Client, ClientConfig, StaticKeyProvider};
//! use ledgerline::transport::memory::MemoryTransport;
//!
//! let client = Client::new(
//!     "admin@test",
//!     StaticKeyProvider::generate(),
//!     MemoryTransport::default(),
//!     ClientConfig::default(),
//! );
//!
//! let tx = client
//!     .transaction()
//!     .create_domain("ru", "user")
//!     .create_asset("dollar", "ru", 2)
//!     .build()?;
//! let status = client.execute(tx).await?;
//! ```
//!
//! ## Crate Structure
//!
//! - [`core`]: builders, validation, canonical encoding, signing
//! - [`transport`]: async delivery of signed artifacts
//! - [`keys`]: key providers
//! - [`blob`]: operations on encoded artifacts

pub use ledgerline_core as core;

pub mod blob;
pub mod client;
pub mod config;
pub mod error;
pub mod keys;
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{LedgerlineError, Result};
pub use keys::{KeyError, KeyMaterial, KeyProvider, StaticKeyProvider};
pub use transport::{QueryStatus, Transport, TransportError, TxStatus};

pub use ledgerline_core::{
    Amount, Command, FieldValidator, Keypair, PublicKey, Query, QueryBuilder, QueryRequest,
    Sha3Hash, SignedQuery, SignedTransaction, Transaction, TransactionBuilder, ValidationError,
    ValidatorConfig,
};
