//! Fixed permission enumerations.
//!
//! Role permissions and grantable permissions are separate sets. A token
//! valid in one is not automatically valid in the other: `can_read_assets`
//! is a role permission and cannot be granted account-to-account.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A token that is not a member of the requested enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {set} permission {token:?}")]
pub struct UnknownPermissionError {
    pub set: &'static str,
    pub token: String,
}

macro_rules! permission_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $set:literal {
            $($variant:ident => $token:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The wire token.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownPermissionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(UnknownPermissionError {
                        set: $set,
                        token: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

permission_enum! {
    /// Permissions that can be attached to a role via `CreateRole`.
    RolePermission, "role" {
        AppendRole => "can_append_role",
        CreateRole => "can_create_role",
        DetachRole => "can_detach_role",
        AddAssetQty => "can_add_asset_qty",
        SubtractAssetQty => "can_subtract_asset_qty",
        AddPeer => "can_add_peer",
        AddSignatory => "can_add_signatory",
        RemoveSignatory => "can_remove_signatory",
        SetQuorum => "can_set_quorum",
        CreateAccount => "can_create_account",
        SetDetail => "can_set_detail",
        CreateAsset => "can_create_asset",
        Transfer => "can_transfer",
        Receive => "can_receive",
        CreateDomain => "can_create_domain",
        ReadAssets => "can_read_assets",
        GetRoles => "can_get_roles",
        GetMyAccount => "can_get_my_account",
        GetAllAccounts => "can_get_all_accounts",
        GetDomainAccounts => "can_get_domain_accounts",
        GetMySignatories => "can_get_my_signatories",
        GetAllSignatories => "can_get_all_signatories",
        GetDomainSignatories => "can_get_domain_signatories",
        GetMyAccAst => "can_get_my_acc_ast",
        GetAllAccAst => "can_get_all_acc_ast",
        GetDomainAccAst => "can_get_domain_acc_ast",
        GetMyAccDetail => "can_get_my_acc_detail",
        GetAllAccDetail => "can_get_all_acc_detail",
        GetDomainAccDetail => "can_get_domain_acc_detail",
        GetMyAccTxs => "can_get_my_acc_txs",
        GetAllAccTxs => "can_get_all_acc_txs",
        GetDomainAccTxs => "can_get_domain_acc_txs",
        GetMyAccAstTxs => "can_get_my_acc_ast_txs",
        GetAllAccAstTxs => "can_get_all_acc_ast_txs",
        GetDomainAccAstTxs => "can_get_domain_acc_ast_txs",
        GetMyTxs => "can_get_my_txs",
        GetAllTxs => "can_get_all_txs",
        GrantSetQuorum => "can_grant_can_set_quorum",
        GrantAddSignatory => "can_grant_can_add_signatory",
        GrantRemoveSignatory => "can_grant_can_remove_signatory",
        GrantTransfer => "can_grant_can_transfer",
        GrantSetDetail => "can_grant_can_set_detail",
    }
}

permission_enum! {
    /// Permissions one account can grant to another over its own resources.
    GrantablePermission, "grantable" {
        AddMySignatory => "can_add_my_signatory",
        RemoveMySignatory => "can_remove_my_signatory",
        SetMyQuorum => "can_set_my_quorum",
        SetMyAccountDetail => "can_set_my_account_detail",
        TransferMyAssets => "can_transfer_my_assets",
    }
}

impl GrantablePermission {
    /// The role permission needed to grant this permission.
    pub fn grant_permission(&self) -> RolePermission {
        match self {
            Self::AddMySignatory => RolePermission::GrantAddSignatory,
            Self::RemoveMySignatory => RolePermission::GrantRemoveSignatory,
            Self::SetMyQuorum => RolePermission::GrantSetQuorum,
            Self::SetMyAccountDetail => RolePermission::GrantSetDetail,
            Self::TransferMyAssets => RolePermission::GrantTransfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::is_valid_name;

    #[test]
    fn test_role_permission_tokens_roundtrip() {
        for perm in RolePermission::ALL {
            let parsed: RolePermission = perm.as_str().parse().unwrap();
            assert_eq!(parsed, *perm);
        }
        assert_eq!(RolePermission::ALL.len(), 42);
    }

    #[test]
    fn test_grantable_tokens_are_names() {
        for perm in GrantablePermission::ALL {
            assert!(is_valid_name(perm.as_str()), "{}", perm);
        }
    }

    #[test]
    fn test_sets_are_distinct() {
        assert!("can_read_assets".parse::<GrantablePermission>().is_err());
        assert!("can_set_my_quorum".parse::<RolePermission>().is_err());
        for perm in GrantablePermission::ALL {
            assert!(perm.as_str().parse::<RolePermission>().is_err());
        }
    }

    #[test]
    fn test_unknown_tokens() {
        for bad in ["", "random", "CAN_READ_ASSETS", "can_read_assets "] {
            let err = bad.parse::<RolePermission>().unwrap_err();
            assert_eq!(err.token, bad);
            assert_eq!(err.set, "role");
        }
    }

    #[test]
    fn test_grant_permission_mapping() {
        assert_eq!(
            GrantablePermission::SetMyQuorum.grant_permission(),
            RolePermission::GrantSetQuorum
        );
        assert_eq!(
            GrantablePermission::TransferMyAssets
                .grant_permission()
                .as_str(),
            "can_grant_can_transfer"
        );
    }

    #[test]
    fn test_grant_tokens_prefix_role_permission() {
        for perm in GrantablePermission::ALL {
            let token = perm.grant_permission().as_str();
            let granted = token.strip_prefix("can_grant_").unwrap();
            assert!(granted.parse::<RolePermission>().is_ok(), "{}", token);
        }
        for token in [
            "can_grant_can_set_quorum",
            "can_grant_can_add_signatory",
            "can_grant_can_remove_signatory",
            "can_grant_can_transfer",
            "can_grant_can_set_detail",
        ] {
            assert!(token.parse::<RolePermission>().is_ok(), "{}", token);
        }
        assert!("can_grant_can_set_my_quorum".parse::<RolePermission>().is_err());
    }
}
