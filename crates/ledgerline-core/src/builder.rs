//! Builders for transactions and queries.
//!
//! Builders are owned values. Every setter consumes the builder and returns
//! the updated one, so a clone is an independent snapshot. Appending never
//! fails; all checks happen in `build()`, which borrows the builder and
//! leaves it untouched whether it succeeds or not.

use tracing::debug;

use crate::command::Command;
use crate::error::ValidationError;
use crate::query::{Query, QueryRequest};
use crate::transaction::Transaction;
use crate::types::{Envelope, Timestamp};
use crate::validation::{FieldValidator, ValidationReport};

/// Where a builder is in its lifecycle.
///
/// A successful `build()` yields the finalized value; the builder itself
/// stays reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Nothing set yet.
    Empty,
    /// At least one field or command set.
    Accumulating,
}

/// Accumulates commands into a [`Transaction`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    validator: FieldValidator,
    creator_account_id: Option<String>,
    created_time: Option<Timestamp>,
    quorum: u32,
    commands: Vec<Command>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// Default quorum when none is set.
    pub const DEFAULT_QUORUM: u32 = 1;

    /// Start an empty builder validating with wall-clock time.
    pub fn new() -> Self {
        Self::with_validator(FieldValidator::default())
    }

    pub fn with_validator(validator: FieldValidator) -> Self {
        Self {
            validator,
            creator_account_id: None,
            created_time: None,
            quorum: Self::DEFAULT_QUORUM,
            commands: Vec::new(),
        }
    }

    pub fn state(&self) -> BuilderState {
        if self.creator_account_id.is_none()
            && self.created_time.is_none()
            && self.quorum == Self::DEFAULT_QUORUM
            && self.commands.is_empty()
        {
            BuilderState::Empty
        } else {
            BuilderState::Accumulating
        }
    }

    /// Discard everything set so far. The validator is kept.
    pub fn reset(self) -> Self {
        Self::with_validator(self.validator)
    }

    pub fn creator_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.creator_account_id = Some(account_id.into());
        self
    }

    pub fn created_time(mut self, created_time: Timestamp) -> Self {
        self.created_time = Some(created_time);
        self
    }

    pub fn quorum(mut self, quorum: u32) -> Self {
        self.quorum = quorum;
        self
    }

    /// Append a command.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn add_peer(self, address: impl Into<String>, public_key: impl AsRef<[u8]>) -> Self {
        self.command(Command::AddPeer {
            address: address.into(),
            public_key: public_key.as_ref().to_vec(),
        })
    }

    pub fn add_signatory(
        self,
        account_id: impl Into<String>,
        public_key: impl AsRef<[u8]>,
    ) -> Self {
        self.command(Command::AddSignatory {
            account_id: account_id.into(),
            public_key: public_key.as_ref().to_vec(),
        })
    }

    pub fn remove_signatory(
        self,
        account_id: impl Into<String>,
        public_key: impl AsRef<[u8]>,
    ) -> Self {
        self.command(Command::RemoveSignatory {
            account_id: account_id.into(),
            public_key: public_key.as_ref().to_vec(),
        })
    }

    pub fn create_account(
        self,
        account_name: impl Into<String>,
        domain_id: impl Into<String>,
        public_key: impl AsRef<[u8]>,
    ) -> Self {
        self.command(Command::CreateAccount {
            account_name: account_name.into(),
            domain_id: domain_id.into(),
            public_key: public_key.as_ref().to_vec(),
        })
    }

    pub fn create_domain(
        self,
        domain_id: impl Into<String>,
        default_role: impl Into<String>,
    ) -> Self {
        self.command(Command::CreateDomain {
            domain_id: domain_id.into(),
            default_role: default_role.into(),
        })
    }

    pub fn create_asset(
        self,
        asset_name: impl Into<String>,
        domain_id: impl Into<String>,
        precision: u8,
    ) -> Self {
        self.command(Command::CreateAsset {
            asset_name: asset_name.into(),
            domain_id: domain_id.into(),
            precision,
        })
    }

    pub fn create_role<I, S>(self, role_name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(Command::CreateRole {
            role_name: role_name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        })
    }

    pub fn add_asset_quantity(
        self,
        account_id: impl Into<String>,
        asset_id: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        self.command(Command::AddAssetQuantity {
            account_id: account_id.into(),
            asset_id: asset_id.into(),
            amount: amount.into(),
        })
    }

    pub fn subtract_asset_quantity(
        self,
        account_id: impl Into<String>,
        asset_id: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        self.command(Command::SubtractAssetQuantity {
            account_id: account_id.into(),
            asset_id: asset_id.into(),
            amount: amount.into(),
        })
    }

    pub fn transfer_asset(
        self,
        src_account_id: impl Into<String>,
        dest_account_id: impl Into<String>,
        asset_id: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        self.command(Command::TransferAsset {
            src_account_id: src_account_id.into(),
            dest_account_id: dest_account_id.into(),
            asset_id: asset_id.into(),
            description: description.into(),
            amount: amount.into(),
        })
    }

    pub fn set_account_detail(
        self,
        account_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.command(Command::SetAccountDetail {
            account_id: account_id.into(),
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn set_account_quorum(self, account_id: impl Into<String>, quorum: u32) -> Self {
        self.command(Command::SetAccountQuorum {
            account_id: account_id.into(),
            quorum,
        })
    }

    pub fn append_role(self, account_id: impl Into<String>, role_name: impl Into<String>) -> Self {
        self.command(Command::AppendRole {
            account_id: account_id.into(),
            role_name: role_name.into(),
        })
    }

    pub fn detach_role(self, account_id: impl Into<String>, role_name: impl Into<String>) -> Self {
        self.command(Command::DetachRole {
            account_id: account_id.into(),
            role_name: role_name.into(),
        })
    }

    pub fn grant_permission(
        self,
        account_id: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        self.command(Command::GrantPermission {
            account_id: account_id.into(),
            permission: permission.into(),
        })
    }

    pub fn revoke_permission(
        self,
        account_id: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        self.command(Command::RevokePermission {
            account_id: account_id.into(),
            permission: permission.into(),
        })
    }

    fn envelope(&self) -> Envelope {
        // Unset fields fail validation: an empty creator is malformed and
        // time 0 is outside any realistic freshness window.
        Envelope::new(
            self.creator_account_id.clone().unwrap_or_default(),
            self.created_time.unwrap_or(0),
        )
    }

    /// Every violation in the current draft.
    pub fn report(&self) -> ValidationReport {
        self.validator
            .report_transaction(&self.envelope(), self.quorum, &self.commands)
    }

    /// Validate and produce an immutable transaction.
    ///
    /// Returns the first violation in check order.
    pub fn build(&self) -> Result<Transaction, ValidationError> {
        let envelope = self.envelope();
        match self
            .validator
            .report_transaction(&envelope, self.quorum, &self.commands)
            .into_result()
        {
            Ok(()) => {
                let tx = Transaction::new(envelope, self.quorum, self.commands.clone());
                debug!(
                    creator = tx.creator_account_id(),
                    commands = tx.commands().len(),
                    hash = %tx.hash(),
                    "transaction built"
                );
                Ok(tx)
            }
            Err(err) => {
                debug!(error = %err, "transaction build rejected");
                Err(err)
            }
        }
    }
}

/// Holds the single request of a [`Query`].
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    validator: FieldValidator,
    creator_account_id: Option<String>,
    created_time: Option<Timestamp>,
    counter: u64,
    request: Option<QueryRequest>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    /// Default query counter when none is set.
    pub const DEFAULT_COUNTER: u64 = 1;

    pub fn new() -> Self {
        Self::with_validator(FieldValidator::default())
    }

    pub fn with_validator(validator: FieldValidator) -> Self {
        Self {
            validator,
            creator_account_id: None,
            created_time: None,
            counter: Self::DEFAULT_COUNTER,
            request: None,
        }
    }

    pub fn state(&self) -> BuilderState {
        if self.creator_account_id.is_none()
            && self.created_time.is_none()
            && self.counter == Self::DEFAULT_COUNTER
            && self.request.is_none()
        {
            BuilderState::Empty
        } else {
            BuilderState::Accumulating
        }
    }

    /// Discard everything set so far. The validator is kept.
    pub fn reset(self) -> Self {
        Self::with_validator(self.validator)
    }

    pub fn creator_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.creator_account_id = Some(account_id.into());
        self
    }

    pub fn created_time(mut self, created_time: Timestamp) -> Self {
        self.created_time = Some(created_time);
        self
    }

    pub fn query_counter(mut self, counter: u64) -> Self {
        self.counter = counter;
        self
    }

    /// Set the request, replacing any previous one.
    pub fn request(mut self, request: QueryRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn get_account(self, account_id: impl Into<String>) -> Self {
        self.request(QueryRequest::GetAccount {
            account_id: account_id.into(),
        })
    }

    pub fn get_signatories(self, account_id: impl Into<String>) -> Self {
        self.request(QueryRequest::GetSignatories {
            account_id: account_id.into(),
        })
    }

    pub fn get_account_transactions(self, account_id: impl Into<String>) -> Self {
        self.request(QueryRequest::GetAccountTransactions {
            account_id: account_id.into(),
        })
    }

    pub fn get_account_asset_transactions(
        self,
        account_id: impl Into<String>,
        asset_id: impl Into<String>,
    ) -> Self {
        self.request(QueryRequest::GetAccountAssetTransactions {
            account_id: account_id.into(),
            asset_id: asset_id.into(),
        })
    }

    pub fn get_account_assets(
        self,
        account_id: impl Into<String>,
        asset_id: impl Into<String>,
    ) -> Self {
        self.request(QueryRequest::GetAccountAssets {
            account_id: account_id.into(),
            asset_id: asset_id.into(),
        })
    }

    /// Details of an account, optionally narrowed to one key.
    pub fn get_account_detail(
        self,
        account_id: impl Into<String>,
        key: Option<impl Into<String>>,
    ) -> Self {
        self.request(QueryRequest::GetAccountDetail {
            account_id: account_id.into(),
            key: key.map(Into::into),
        })
    }

    pub fn get_roles(self) -> Self {
        self.request(QueryRequest::GetRoles)
    }

    pub fn get_role_permissions(self, role_id: impl Into<String>) -> Self {
        self.request(QueryRequest::GetRolePermissions {
            role_id: role_id.into(),
        })
    }

    pub fn get_asset_info(self, asset_id: impl Into<String>) -> Self {
        self.request(QueryRequest::GetAssetInfo {
            asset_id: asset_id.into(),
        })
    }

    pub fn get_transactions<I, H>(self, hashes: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: AsRef<[u8]>,
    {
        self.request(QueryRequest::GetTransactions {
            hashes: hashes.into_iter().map(|h| h.as_ref().to_vec()).collect(),
        })
    }

    fn envelope(&self) -> Envelope {
        Envelope::new(
            self.creator_account_id.clone().unwrap_or_default(),
            self.created_time.unwrap_or(0),
        )
    }

    /// Every violation in the current draft.
    pub fn report(&self) -> ValidationReport {
        self.validator
            .report_query(&self.envelope(), self.counter, self.request.as_ref())
    }

    /// Validate and produce an immutable query.
    pub fn build(&self) -> Result<Query, ValidationError> {
        let envelope = self.envelope();
        self.validator
            .report_query(&envelope, self.counter, self.request.as_ref())
            .into_result()
            .map_err(|err| {
                debug!(error = %err, "query build rejected");
                err
            })?;

        let request = self
            .request
            .clone()
            .ok_or_else(|| ValidationError::EmptyStructure("query is not set".into()))?;
        let query = Query::new(envelope, self.counter, request);
        debug!(
            creator = query.creator_account_id(),
            query = query.request().name(),
            "query built"
        );
        Ok(query)
    }
}
