//! Ledger commands carried by a transaction.
//!
//! Commands hold the raw values the caller supplied. Nothing is checked
//! when a command is constructed; [`crate::validation::FieldValidator`]
//! checks every field when the transaction is built.

use serde::{Deserialize, Serialize};

/// Discriminator for command variants on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CommandKind {
    // Network (0x0000 - 0x00FF)
    AddPeer = 0x0001,

    // Domains and assets (0x0100 - 0x01FF)
    CreateDomain = 0x0100,
    CreateAsset = 0x0101,
    AddAssetQuantity = 0x0102,
    SubtractAssetQuantity = 0x0103,
    TransferAsset = 0x0104,

    // Accounts (0x0200 - 0x02FF)
    CreateAccount = 0x0200,
    AddSignatory = 0x0201,
    RemoveSignatory = 0x0202,
    SetAccountQuorum = 0x0203,
    SetAccountDetail = 0x0204,

    // Roles and permissions (0x0300 - 0x03FF)
    CreateRole = 0x0300,
    AppendRole = 0x0301,
    DetachRole = 0x0302,
    GrantPermission = 0x0303,
    RevokePermission = 0x0304,
}

impl CommandKind {
    /// Convert to u16 for serialization.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Try to parse from u16.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0001 => Some(Self::AddPeer),
            0x0100 => Some(Self::CreateDomain),
            0x0101 => Some(Self::CreateAsset),
            0x0102 => Some(Self::AddAssetQuantity),
            0x0103 => Some(Self::SubtractAssetQuantity),
            0x0104 => Some(Self::TransferAsset),
            0x0200 => Some(Self::CreateAccount),
            0x0201 => Some(Self::AddSignatory),
            0x0202 => Some(Self::RemoveSignatory),
            0x0203 => Some(Self::SetAccountQuorum),
            0x0204 => Some(Self::SetAccountDetail),
            0x0300 => Some(Self::CreateRole),
            0x0301 => Some(Self::AppendRole),
            0x0302 => Some(Self::DetachRole),
            0x0303 => Some(Self::GrantPermission),
            0x0304 => Some(Self::RevokePermission),
            _ => None,
        }
    }

    /// Snake-case name used in field paths and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::AddPeer => "add_peer",
            Self::CreateDomain => "create_domain",
            Self::CreateAsset => "create_asset",
            Self::AddAssetQuantity => "add_asset_quantity",
            Self::SubtractAssetQuantity => "subtract_asset_quantity",
            Self::TransferAsset => "transfer_asset",
            Self::CreateAccount => "create_account",
            Self::AddSignatory => "add_signatory",
            Self::RemoveSignatory => "remove_signatory",
            Self::SetAccountQuorum => "set_account_quorum",
            Self::SetAccountDetail => "set_account_detail",
            Self::CreateRole => "create_role",
            Self::AppendRole => "append_role",
            Self::DetachRole => "detach_role",
            Self::GrantPermission => "grant_permission",
            Self::RevokePermission => "revoke_permission",
        }
    }
}

/// A single ledger command.
///
/// Account and asset ids are kept as `name@domain` / `name#domain` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    AddPeer {
        address: String,
        public_key: Vec<u8>,
    },
    AddSignatory {
        account_id: String,
        public_key: Vec<u8>,
    },
    RemoveSignatory {
        account_id: String,
        public_key: Vec<u8>,
    },
    CreateAccount {
        account_name: String,
        domain_id: String,
        public_key: Vec<u8>,
    },
    CreateDomain {
        domain_id: String,
        default_role: String,
    },
    CreateAsset {
        asset_name: String,
        domain_id: String,
        precision: u8,
    },
    CreateRole {
        role_name: String,
        permissions: Vec<String>,
    },
    AddAssetQuantity {
        account_id: String,
        asset_id: String,
        amount: String,
    },
    SubtractAssetQuantity {
        account_id: String,
        asset_id: String,
        amount: String,
    },
    TransferAsset {
        src_account_id: String,
        dest_account_id: String,
        asset_id: String,
        description: String,
        amount: String,
    },
    SetAccountDetail {
        account_id: String,
        key: String,
        value: String,
    },
    SetAccountQuorum {
        account_id: String,
        quorum: u32,
    },
    AppendRole {
        account_id: String,
        role_name: String,
    },
    DetachRole {
        account_id: String,
        role_name: String,
    },
    GrantPermission {
        account_id: String,
        permission: String,
    },
    RevokePermission {
        account_id: String,
        permission: String,
    },
}

impl Command {
    /// The wire discriminator for this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::AddPeer { .. } => CommandKind::AddPeer,
            Self::AddSignatory { .. } => CommandKind::AddSignatory,
            Self::RemoveSignatory { .. } => CommandKind::RemoveSignatory,
            Self::CreateAccount { .. } => CommandKind::CreateAccount,
            Self::CreateDomain { .. } => CommandKind::CreateDomain,
            Self::CreateAsset { .. } => CommandKind::CreateAsset,
            Self::CreateRole { .. } => CommandKind::CreateRole,
            Self::AddAssetQuantity { .. } => CommandKind::AddAssetQuantity,
            Self::SubtractAssetQuantity { .. } => CommandKind::SubtractAssetQuantity,
            Self::TransferAsset { .. } => CommandKind::TransferAsset,
            Self::SetAccountDetail { .. } => CommandKind::SetAccountDetail,
            Self::SetAccountQuorum { .. } => CommandKind::SetAccountQuorum,
            Self::AppendRole { .. } => CommandKind::AppendRole,
            Self::DetachRole { .. } => CommandKind::DetachRole,
            Self::GrantPermission { .. } => CommandKind::GrantPermission,
            Self::RevokePermission { .. } => CommandKind::RevokePermission,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}
