//! # Ledgerline Testkit
//!
//! Testing utilities for Ledgerline.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: pinned payloads, digests and signatures
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ledgerline_testkit::vectors::{all_vectors, generate_from_vector};
//!
//! for vector in all_vectors() {
//!     let out = generate_from_vector(&vector).unwrap();
//!     println!("{}: {}", vector.name, out.hash.to_hex());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledgerline_testkit::generators::{transaction_from_params, TransactionParams};
//!
//! proptest! {
//!     #[test]
//!     fn hash_is_deterministic(params: TransactionParams) {
//!         let a = transaction_from_params(&params);
//!         let b = transaction_from_params(&params);
//!         prop_assert_eq!(a.hash(), b.hash());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ledgerline_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let signed = fixture
//!     .sign(fixture.tx_builder().create_domain("ru", "user"))
//!     .unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture, FIXTURE_NOW};
pub use generators::{transaction_from_params, TransactionParams};
pub use vectors::{
    all_vectors, generate_from_vector, vectors_json, verify_all_vectors, GoldenVector, VectorOutput,
};
