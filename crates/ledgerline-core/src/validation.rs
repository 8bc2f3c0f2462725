//! Stateless field validation for transactions and queries.
//!
//! [`FieldValidator`] checks every field of a draft against the grammars in
//! [`crate::grammar`]. Checks run in a fixed order: envelope, then each
//! command in append order, then structural emptiness. The first violation
//! is what `build()` reports; [`ValidationReport`] keeps all of them.
//!
//! Validation never touches ledger state. Whether an account exists or has
//! enough balance is for the receiving service to decide.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::amount::{Amount, AmountError};
use crate::command::Command;
use crate::crypto::{HASH_SIZE, PUBLIC_KEY_SIZE};
use crate::error::ValidationError;
use crate::grammar::{self, MAX_DESCRIPTION_LEN, MAX_DETAIL_VALUE_LEN, MAX_QUORUM, MIN_QUORUM};
use crate::permission::{GrantablePermission, RolePermission};
use crate::query::{Query, QueryRequest};
use crate::signed::Signed;
use crate::transaction::Transaction;
use crate::types::{AccountId, AssetId, Envelope, Timestamp};

/// Default maximum age of `created_time`: 24 hours.
pub const DEFAULT_MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Default allowance for `created_time` in the future: 5 minutes.
pub const DEFAULT_FUTURE_TOLERANCE_MS: u64 = 5 * 60 * 1000;

/// Tunables for [`FieldValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Oldest accepted `created_time`, relative to now.
    pub max_delay_ms: u64,

    /// Furthest accepted `created_time` ahead of now.
    pub future_tolerance_ms: u64,

    /// Accept `CreateRole` with no permissions.
    pub allow_empty_role_permissions: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            future_tolerance_ms: DEFAULT_FUTURE_TOLERANCE_MS,
            allow_empty_role_permissions: true,
        }
    }
}

/// Source of the current time in Unix milliseconds.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_ms(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    pub fn new(now_ms: Timestamp) -> Self {
        Self(AtomicU64::new(now_ms))
    }

    pub fn set(&self, now_ms: Timestamp) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> Timestamp {
        self.0.load(Ordering::SeqCst)
    }
}

/// Every violation found in a draft, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }

    /// The first violation, if any.
    pub fn first(&self) -> Option<&ValidationError> {
        self.violations.first()
    }

    /// Violations in the envelope (creator, created_time, quorum, counter).
    pub fn envelope_violations(&self) -> impl Iterator<Item = &ValidationError> {
        self.violations.iter().filter(|v| {
            matches!(
                v.field(),
                Some("creator_account_id" | "created_time" | "quorum" | "counter")
            )
        })
    }

    /// Violations inside the command at `index`.
    pub fn command_violations(&self, index: usize) -> impl Iterator<Item = &ValidationError> {
        let prefix = format!("commands[{}].", index);
        self.violations
            .iter()
            .filter(move |v| v.field().is_some_and(|f| f.starts_with(&prefix)))
    }

    /// `Ok` if clean, otherwise the first violation.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.violations.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Stateless validator with an injected clock.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    config: ValidatorConfig,
    clock: Arc<dyn Clock>,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl FieldValidator {
    /// Validator using wall-clock time.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ValidatorConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn now_ms(&self) -> Timestamp {
        self.clock.now_ms()
    }

    /// Collect every violation in a transaction draft.
    pub fn report_transaction(
        &self,
        envelope: &Envelope,
        quorum: u32,
        commands: &[Command],
    ) -> ValidationReport {
        let mut out = Vec::new();
        self.check_envelope(&mut out, envelope);
        if !grammar::is_valid_quorum(quorum) {
            out.push(quorum_violation("quorum", quorum));
        }

        for (i, command) in commands.iter().enumerate() {
            let mut fields = Fields::new(&mut out, format!("commands[{}].{}", i, command.name()));
            self.check_command(&mut fields, command);
        }

        if commands.is_empty() {
            out.push(ValidationError::EmptyStructure(
                "transaction has no commands".into(),
            ));
        }
        ValidationReport { violations: out }
    }

    /// Collect every violation in a query draft.
    pub fn report_query(
        &self,
        envelope: &Envelope,
        counter: u64,
        request: Option<&QueryRequest>,
    ) -> ValidationReport {
        let mut out = Vec::new();
        self.check_envelope(&mut out, envelope);
        if counter == 0 {
            out.push(ValidationError::bound("counter", "must be greater than zero"));
        }

        match request {
            Some(request) => {
                let mut fields = Fields::new(&mut out, format!("query.{}", request.name()));
                check_request(&mut fields, request);
            }
            None => out.push(ValidationError::EmptyStructure("query is not set".into())),
        }
        ValidationReport { violations: out }
    }

    /// Validate a finalized or decoded transaction.
    pub fn validate_transaction(&self, tx: &Transaction) -> Result<(), ValidationError> {
        self.report_transaction(tx.envelope(), tx.quorum(), tx.commands())
            .into_result()
    }

    /// Validate a finalized or decoded query.
    pub fn validate_query(&self, query: &Query) -> Result<(), ValidationError> {
        self.report_query(query.envelope(), query.counter(), Some(query.request()))
            .into_result()
    }

    /// Validate a signed transaction: fields, then signatures.
    pub fn validate_signed_transaction(
        &self,
        signed: &Signed<Transaction>,
    ) -> Result<(), ValidationError> {
        self.validate_transaction(signed.value())?;
        signed.verify()
    }

    /// Validate a signed query: fields, then signatures.
    pub fn validate_signed_query(&self, signed: &Signed<Query>) -> Result<(), ValidationError> {
        self.validate_query(signed.value())?;
        signed.verify()
    }

    fn check_envelope(&self, out: &mut Vec<ValidationError>, envelope: &Envelope) {
        if !is_valid_account_id(&envelope.creator_account_id) {
            out.push(ValidationError::grammar(
                "creator_account_id",
                envelope.creator_account_id.as_str(),
            ));
        }

        let now = self.clock.now_ms();
        let earliest = now.saturating_sub(self.config.max_delay_ms);
        let latest = now.saturating_add(self.config.future_tolerance_ms);
        if envelope.created_time < earliest || envelope.created_time > latest {
            out.push(ValidationError::EnvelopeStale {
                created_time: envelope.created_time,
                earliest,
                latest,
            });
        }
    }

    fn check_command(&self, f: &mut Fields<'_>, command: &Command) {
        match command {
            Command::AddPeer {
                address,
                public_key,
            } => {
                if !grammar::is_valid_peer_address(address) {
                    f.grammar("address", address);
                }
                f.public_key("public_key", public_key);
            }
            Command::AddSignatory {
                account_id,
                public_key,
            }
            | Command::RemoveSignatory {
                account_id,
                public_key,
            } => {
                f.account_id("account_id", account_id);
                f.public_key("public_key", public_key);
            }
            Command::CreateAccount {
                account_name,
                domain_id,
                public_key,
            } => {
                f.name("account_name", account_name);
                f.domain("domain_id", domain_id);
                f.public_key("public_key", public_key);
            }
            Command::CreateDomain {
                domain_id,
                default_role,
            } => {
                f.domain("domain_id", domain_id);
                f.name("default_role", default_role);
            }
            Command::CreateAsset {
                asset_name,
                domain_id,
                precision: _,
            } => {
                f.name("asset_name", asset_name);
                f.domain("domain_id", domain_id);
            }
            Command::CreateRole {
                role_name,
                permissions,
            } => {
                f.name("role_name", role_name);
                if permissions.is_empty() && !self.config.allow_empty_role_permissions {
                    f.empty("permissions");
                }
                for (j, token) in permissions.iter().enumerate() {
                    if token.parse::<RolePermission>().is_err() {
                        f.unknown_permission(&format!("permissions[{}]", j), token);
                    }
                }
            }
            Command::AddAssetQuantity {
                account_id,
                asset_id,
                amount,
            }
            | Command::SubtractAssetQuantity {
                account_id,
                asset_id,
                amount,
            } => {
                f.account_id("account_id", account_id);
                f.asset_id("asset_id", asset_id);
                f.amount("amount", amount);
            }
            Command::TransferAsset {
                src_account_id,
                dest_account_id,
                asset_id,
                description,
                amount,
            } => {
                f.account_id("src_account_id", src_account_id);
                f.account_id("dest_account_id", dest_account_id);
                f.asset_id("asset_id", asset_id);
                if description.len() > MAX_DESCRIPTION_LEN {
                    f.bound(
                        "description",
                        format!(
                            "{} bytes exceeds maximum of {}",
                            description.len(),
                            MAX_DESCRIPTION_LEN
                        ),
                    );
                }
                f.amount("amount", amount);
            }
            Command::SetAccountDetail {
                account_id,
                key,
                value,
            } => {
                f.account_id("account_id", account_id);
                if !grammar::is_valid_detail_key(key) {
                    f.grammar("key", key);
                }
                if value.len() > MAX_DETAIL_VALUE_LEN {
                    f.bound(
                        "value",
                        format!(
                            "{} bytes exceeds maximum of {}",
                            value.len(),
                            MAX_DETAIL_VALUE_LEN
                        ),
                    );
                }
            }
            Command::SetAccountQuorum { account_id, quorum } => {
                f.account_id("account_id", account_id);
                if !grammar::is_valid_quorum(*quorum) {
                    let path = f.path("quorum");
                    f.out.push(quorum_violation(path, *quorum));
                }
            }
            Command::AppendRole {
                account_id,
                role_name,
            }
            | Command::DetachRole {
                account_id,
                role_name,
            } => {
                f.account_id("account_id", account_id);
                f.name("role_name", role_name);
            }
            Command::GrantPermission {
                account_id,
                permission,
            }
            | Command::RevokePermission {
                account_id,
                permission,
            } => {
                f.account_id("account_id", account_id);
                if permission.parse::<GrantablePermission>().is_err() {
                    f.unknown_permission("permission", permission);
                }
            }
        }
    }
}

fn check_request(f: &mut Fields<'_>, request: &QueryRequest) {
    match request {
        QueryRequest::GetAccount { account_id }
        | QueryRequest::GetSignatories { account_id }
        | QueryRequest::GetAccountTransactions { account_id } => {
            f.account_id("account_id", account_id);
        }
        QueryRequest::GetAccountAssetTransactions {
            account_id,
            asset_id,
        }
        | QueryRequest::GetAccountAssets {
            account_id,
            asset_id,
        } => {
            f.account_id("account_id", account_id);
            f.asset_id("asset_id", asset_id);
        }
        QueryRequest::GetAccountDetail { account_id, key } => {
            f.account_id("account_id", account_id);
            if let Some(key) = key {
                if !grammar::is_valid_detail_key(key) {
                    f.grammar("key", key);
                }
            }
        }
        QueryRequest::GetRoles => {}
        QueryRequest::GetRolePermissions { role_id } => f.name("role_id", role_id),
        QueryRequest::GetAssetInfo { asset_id } => f.asset_id("asset_id", asset_id),
        QueryRequest::GetTransactions { hashes } => {
            if hashes.is_empty() {
                f.empty("hashes");
            }
            for (j, hash) in hashes.iter().enumerate() {
                if hash.len() != HASH_SIZE {
                    let path = f.path(&format!("hashes[{}]", j));
                    f.out.push(ValidationError::KeySizeMismatch {
                        field: path,
                        expected: HASH_SIZE,
                        actual: hash.len(),
                    });
                }
            }
        }
    }
}

fn quorum_violation(field: impl Into<String>, quorum: u32) -> ValidationError {
    ValidationError::bound(
        field,
        format!("quorum {} outside [{}, {}]", quorum, MIN_QUORUM, MAX_QUORUM),
    )
}

fn is_valid_account_id(s: &str) -> bool {
    AccountId::parse(s).map(|id| id.is_valid()).unwrap_or(false)
}

fn is_valid_asset_id(s: &str) -> bool {
    AssetId::parse(s).map(|id| id.is_valid()).unwrap_or(false)
}

/// Pushes violations under a common field-path prefix.
struct Fields<'a> {
    out: &'a mut Vec<ValidationError>,
    prefix: String,
}

impl<'a> Fields<'a> {
    fn new(out: &'a mut Vec<ValidationError>, prefix: String) -> Self {
        Self { out, prefix }
    }

    fn path(&self, field: &str) -> String {
        format!("{}.{}", self.prefix, field)
    }

    fn grammar(&mut self, field: &str, value: &str) {
        let path = self.path(field);
        self.out.push(ValidationError::grammar(path, value));
    }

    fn bound(&mut self, field: &str, reason: String) {
        let path = self.path(field);
        self.out.push(ValidationError::bound(path, reason));
    }

    fn empty(&mut self, field: &str) {
        let path = self.path(field);
        self.out
            .push(ValidationError::EmptyStructure(format!("{} is empty", path)));
    }

    fn unknown_permission(&mut self, field: &str, value: &str) {
        let path = self.path(field);
        self.out.push(ValidationError::UnknownPermission {
            field: path,
            value: value.to_string(),
        });
    }

    fn name(&mut self, field: &str, value: &str) {
        if !grammar::is_valid_name(value) {
            self.grammar(field, value);
        }
    }

    fn domain(&mut self, field: &str, value: &str) {
        if !grammar::is_valid_domain(value) {
            self.grammar(field, value);
        }
    }

    fn account_id(&mut self, field: &str, value: &str) {
        if !is_valid_account_id(value) {
            self.grammar(field, value);
        }
    }

    fn asset_id(&mut self, field: &str, value: &str) {
        if !is_valid_asset_id(value) {
            self.grammar(field, value);
        }
    }

    fn public_key(&mut self, field: &str, value: &[u8]) {
        if value.len() != PUBLIC_KEY_SIZE {
            let path = self.path(field);
            self.out.push(ValidationError::KeySizeMismatch {
                field: path,
                expected: PUBLIC_KEY_SIZE,
                actual: value.len(),
            });
        }
    }

    /// Delta amounts: well-formed, non-zero, within 2^256 - 1.
    fn amount(&mut self, field: &str, value: &str) {
        match Amount::parse(value) {
            Ok(amount) if amount.is_zero() => {
                self.bound(field, "amount must be greater than zero".into())
            }
            Ok(_) => {}
            Err(AmountError::Malformed(_)) => self.grammar(field, value),
            Err(err) => self.bound(field, err.to_string()),
        }
    }
}
