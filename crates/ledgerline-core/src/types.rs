//! Composite identifiers used by commands and queries.
//!
//! Identifiers are parsed leniently: `AccountId::parse` only splits on the
//! separator. Grammar checks happen during validation so that a malformed
//! id can still be carried in a draft and reported with its field path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grammar;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Error returned when an identifier lacks its separator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier {0:?} is missing its '{1}' separator")]
pub struct IdParseError(pub String, pub char);

/// An account identifier, `name@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId {
    pub name: String,
    pub domain: String,
}

impl AccountId {
    pub const SEPARATOR: char = '@';

    /// Create from parts.
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Split `name@domain` on the first separator.
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        split_id(s, Self::SEPARATOR).map(|(name, domain)| Self::new(name, domain))
    }

    /// Both halves satisfy their grammars.
    pub fn is_valid(&self) -> bool {
        grammar::is_valid_name(&self.name) && grammar::is_valid_domain(&self.domain)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, Self::SEPARATOR, self.domain)
    }
}

impl FromStr for AccountId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An asset identifier, `name#domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId {
    pub name: String,
    pub domain: String,
}

impl AssetId {
    pub const SEPARATOR: char = '#';

    /// Create from parts.
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Split `name#domain` on the first separator.
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        split_id(s, Self::SEPARATOR).map(|(name, domain)| Self::new(name, domain))
    }

    /// Both halves satisfy their grammars.
    pub fn is_valid(&self) -> bool {
        grammar::is_valid_name(&self.name) && grammar::is_valid_domain(&self.domain)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, Self::SEPARATOR, self.domain)
    }
}

impl FromStr for AssetId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Fields shared by transactions and queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Envelope {
    /// Raw `name@domain` of the account that issues the request.
    pub creator_account_id: String,

    /// Creation time in Unix milliseconds.
    pub created_time: Timestamp,
}

impl Envelope {
    pub fn new(creator_account_id: impl Into<String>, created_time: Timestamp) -> Self {
        Self {
            creator_account_id: creator_account_id.into(),
            created_time,
        }
    }
}

fn split_id(s: &str, sep: char) -> Result<(&str, &str), IdParseError> {
    s.split_once(sep)
        .ok_or_else(|| IdParseError(s.to_string(), sep))
}
