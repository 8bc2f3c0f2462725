//! Proptest generators for property-based testing.
//!
//! Every strategy here yields values the field validator accepts.

use std::sync::Arc;

use proptest::prelude::*;

use ledgerline_core::{
    Command, FieldValidator, FixedClock, GrantablePermission, Keypair, RolePermission,
    SignedTransaction, Timestamp, TransactionBuilder, ValidatorConfig,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate raw public key bytes.
pub fn public_key_bytes() -> impl Strategy<Value = Vec<u8>> {
    keypair().prop_map(|kp| kp.public_key().as_bytes().to_vec())
}

/// Account, asset and role names.
pub fn name() -> impl Strategy<Value = String> {
    "[a-z_0-9]{1,32}".prop_map(String::from)
}

/// Domains of one or two labels.
pub fn domain() -> impl Strategy<Value = String> {
    "[a-z]([a-z0-9-]{0,14}[a-z0-9])?(\\.[a-z][a-z0-9]{0,8})?".prop_map(String::from)
}

pub fn account_id() -> impl Strategy<Value = String> {
    (name(), domain()).prop_map(|(n, d)| format!("{}@{}", n, d))
}

pub fn asset_id() -> impl Strategy<Value = String> {
    (name(), domain()).prop_map(|(n, d)| format!("{}#{}", n, d))
}

/// Non-zero decimal amounts.
pub fn amount() -> impl Strategy<Value = String> {
    (1u64..=u64::MAX, 0u32..=18).prop_map(|(value, scale)| {
        let digits = value.to_string();
        let scale = scale as usize;
        if scale == 0 {
            digits
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            format!("{}.{}", int, frac)
        } else {
            format!("0.{:0>width$}", digits, width = scale)
        }
    })
}

pub fn quorum() -> impl Strategy<Value = u32> {
    1u32..=128
}

pub fn role_permission() -> impl Strategy<Value = RolePermission> {
    prop::sample::select(RolePermission::ALL.to_vec())
}

pub fn grantable_permission() -> impl Strategy<Value = GrantablePermission> {
    prop::sample::select(GrantablePermission::ALL.to_vec())
}

/// A command with valid fields, drawn from every command kind.
pub fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (any::<u8>(), any::<u8>(), any::<u16>(), public_key_bytes()).prop_map(
            |(a, b, port, public_key)| Command::AddPeer {
                address: format!("10.{}.{}.1:{}", a, b, port),
                public_key,
            }
        ),
        (account_id(), public_key_bytes())
            .prop_map(|(account_id, public_key)| Command::AddSignatory { account_id, public_key }),
        (account_id(), public_key_bytes()).prop_map(|(account_id, public_key)| {
            Command::RemoveSignatory { account_id, public_key }
        }),
        (name(), domain(), public_key_bytes()).prop_map(|(account_name, domain_id, public_key)| {
            Command::CreateAccount { account_name, domain_id, public_key }
        }),
        (domain(), name())
            .prop_map(|(domain_id, default_role)| Command::CreateDomain { domain_id, default_role }),
        (name(), domain(), any::<u8>()).prop_map(|(asset_name, domain_id, precision)| {
            Command::CreateAsset { asset_name, domain_id, precision }
        }),
        (name(), prop::collection::vec(role_permission(), 1..8)).prop_map(|(role_name, perms)| {
            Command::CreateRole {
                role_name,
                permissions: perms.iter().map(|p| p.as_str().to_string()).collect(),
            }
        }),
        (account_id(), asset_id(), amount()).prop_map(|(account_id, asset_id, amount)| {
            Command::AddAssetQuantity { account_id, asset_id, amount }
        }),
        (account_id(), asset_id(), amount()).prop_map(|(account_id, asset_id, amount)| {
            Command::SubtractAssetQuantity { account_id, asset_id, amount }
        }),
        (account_id(), account_id(), asset_id(), "[ -~]{0,64}", amount()).prop_map(
            |(src_account_id, dest_account_id, asset_id, description, amount)| {
                Command::TransferAsset {
                    src_account_id,
                    dest_account_id,
                    asset_id,
                    description,
                    amount,
                }
            }
        ),
        (account_id(), "[A-Za-z0-9_]{1,64}", "[ -~]{0,256}")
            .prop_map(|(account_id, key, value)| Command::SetAccountDetail { account_id, key, value }),
        (account_id(), quorum())
            .prop_map(|(account_id, quorum)| Command::SetAccountQuorum { account_id, quorum }),
        (account_id(), name())
            .prop_map(|(account_id, role_name)| Command::AppendRole { account_id, role_name }),
        (account_id(), name())
            .prop_map(|(account_id, role_name)| Command::DetachRole { account_id, role_name }),
        (account_id(), grantable_permission()).prop_map(|(account_id, p)| {
            Command::GrantPermission { account_id, permission: p.as_str().to_string() }
        }),
        (account_id(), grantable_permission()).prop_map(|(account_id, p)| {
            Command::RevokePermission { account_id, permission: p.as_str().to_string() }
        }),
    ]
}

/// Parameters for generating a signed transaction.
#[derive(Debug, Clone)]
pub struct TransactionParams {
    pub keypair: Keypair,
    pub creator_account_id: String,
    pub created_time: Timestamp,
    pub quorum: u32,
    pub commands: Vec<Command>,
}

impl Arbitrary for TransactionParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // seed
            account_id(),
            1_600_000_000_000u64..=1_900_000_000_000u64,
            quorum(),
            prop::collection::vec(command(), 1..6),
        )
            .prop_map(|(seed, creator, ts, quorum, commands)| TransactionParams {
                keypair: Keypair::from_seed(&seed),
                creator_account_id: creator,
                created_time: ts,
                quorum,
                commands,
            })
            .boxed()
    }
}

impl TransactionParams {
    /// A validator whose clock reads the transaction's own creation time.
    pub fn validator(&self) -> FieldValidator {
        FieldValidator::with_clock(
            ValidatorConfig::default(),
            Arc::new(FixedClock::new(self.created_time)),
        )
    }
}

/// Build and sign a transaction from parameters.
///
/// Panics if the parameters do not validate; the strategies above never
/// produce such parameters.
pub fn transaction_from_params(params: &TransactionParams) -> SignedTransaction {
    let builder = params.commands.iter().cloned().fold(
        TransactionBuilder::with_validator(params.validator())
            .creator_account_id(params.creator_account_id.clone())
            .created_time(params.created_time)
            .quorum(params.quorum),
        TransactionBuilder::command,
    );
    match builder.build() {
        Ok(tx) => tx.sign(&params.keypair),
        Err(err) => panic!("generated transaction failed validation: {}", err),
    }
}
