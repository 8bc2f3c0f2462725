//! Read-only queries.

use serde::{Deserialize, Serialize};

use crate::canonical;
use crate::crypto::{Keypair, Sha3Hash};
use crate::signed::SignedQuery;
use crate::types::{Envelope, Timestamp};

/// Discriminator for query variants on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum QueryKind {
    GetAccount = 0x0001,
    GetSignatories = 0x0002,
    GetAccountTransactions = 0x0003,
    GetAccountAssetTransactions = 0x0004,
    GetAccountAssets = 0x0005,
    GetAccountDetail = 0x0006,
    GetRoles = 0x0100,
    GetRolePermissions = 0x0101,
    GetAssetInfo = 0x0200,
    GetTransactions = 0x0300,
}

impl QueryKind {
    /// Convert to u16 for serialization.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Try to parse from u16.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0001 => Some(Self::GetAccount),
            0x0002 => Some(Self::GetSignatories),
            0x0003 => Some(Self::GetAccountTransactions),
            0x0004 => Some(Self::GetAccountAssetTransactions),
            0x0005 => Some(Self::GetAccountAssets),
            0x0006 => Some(Self::GetAccountDetail),
            0x0100 => Some(Self::GetRoles),
            0x0101 => Some(Self::GetRolePermissions),
            0x0200 => Some(Self::GetAssetInfo),
            0x0300 => Some(Self::GetTransactions),
            _ => None,
        }
    }

    /// Snake-case name used in field paths and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetAccount => "get_account",
            Self::GetSignatories => "get_signatories",
            Self::GetAccountTransactions => "get_account_transactions",
            Self::GetAccountAssetTransactions => "get_account_asset_transactions",
            Self::GetAccountAssets => "get_account_assets",
            Self::GetAccountDetail => "get_account_detail",
            Self::GetRoles => "get_roles",
            Self::GetRolePermissions => "get_role_permissions",
            Self::GetAssetInfo => "get_asset_info",
            Self::GetTransactions => "get_transactions",
        }
    }
}

/// The body of a query. Exactly one per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryRequest {
    GetAccount {
        account_id: String,
    },
    GetSignatories {
        account_id: String,
    },
    GetAccountTransactions {
        account_id: String,
    },
    GetAccountAssetTransactions {
        account_id: String,
        asset_id: String,
    },
    GetAccountAssets {
        account_id: String,
        asset_id: String,
    },
    /// Details of an account, optionally narrowed to one key.
    GetAccountDetail {
        account_id: String,
        key: Option<String>,
    },
    GetRoles,
    GetRolePermissions {
        role_id: String,
    },
    GetAssetInfo {
        asset_id: String,
    },
    /// Transactions by hash. Each hash must be 32 bytes.
    GetTransactions {
        hashes: Vec<Vec<u8>>,
    },
}

impl QueryRequest {
    pub fn kind(&self) -> QueryKind {
        match self {
            Self::GetAccount { .. } => QueryKind::GetAccount,
            Self::GetSignatories { .. } => QueryKind::GetSignatories,
            Self::GetAccountTransactions { .. } => QueryKind::GetAccountTransactions,
            Self::GetAccountAssetTransactions { .. } => QueryKind::GetAccountAssetTransactions,
            Self::GetAccountAssets { .. } => QueryKind::GetAccountAssets,
            Self::GetAccountDetail { .. } => QueryKind::GetAccountDetail,
            Self::GetRoles => QueryKind::GetRoles,
            Self::GetRolePermissions { .. } => QueryKind::GetRolePermissions,
            Self::GetAssetInfo { .. } => QueryKind::GetAssetInfo,
            Self::GetTransactions { .. } => QueryKind::GetTransactions,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// An immutable, validated query.
///
/// Produced by [`crate::builder::QueryBuilder::build`] or by decoding
/// canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    envelope: Envelope,
    counter: u64,
    request: QueryRequest,
}

impl Query {
    pub(crate) fn new(envelope: Envelope, counter: u64, request: QueryRequest) -> Self {
        Self {
            envelope,
            counter,
            request,
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

    /// Per-creator query counter, used by the receiver for replay protection.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    /// Canonical CBOR encoding of this query.
    pub fn payload(&self) -> Vec<u8> {
        canonical::query_payload(self)
    }

    pub fn hash(&self) -> Sha3Hash {
        Sha3Hash::hash(&self.payload())
    }

    /// Wrap in a signed artifact carrying one signature.
    pub fn sign(self, keypair: &Keypair) -> SignedQuery {
        SignedQuery::new(self).sign(keypair)
    }
}
