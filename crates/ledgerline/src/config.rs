//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use ledgerline_core::ValidatorConfig;

use crate::error::Result;

/// Configuration for a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Field validation settings.
    pub validator: ValidatorConfig,

    /// Quorum placed on new transactions.
    pub default_quorum: u32,

    /// Delay between status polls while waiting for a terminal status.
    pub status_poll_interval_ms: u64,

    /// Give up waiting for a terminal status after this long.
    pub status_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            validator: ValidatorConfig::default(),
            default_quorum: 1,
            status_poll_interval_ms: 100,
            status_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_millis(self.status_poll_interval_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.default_quorum, 1);
        assert_eq!(cfg.validator.max_delay_ms, 24 * 60 * 60 * 1000);
        assert_eq!(cfg.validator.future_tolerance_ms, 5 * 60 * 1000);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = ClientConfig::from_json(
            r#"{"default_quorum": 2, "validator": {"allow_empty_role_permissions": false}}"#,
        )
        .unwrap();
        assert_eq!(cfg.default_quorum, 2);
        assert!(!cfg.validator.allow_empty_role_permissions);
        assert_eq!(cfg.status_timeout_ms, 30_000);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(ClientConfig::from_json("{not json").is_err());
    }
}
