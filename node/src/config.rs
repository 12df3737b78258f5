//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};

use agegate_auth::{DEFAULT_CHALLENGE_TTL_SECS, DEFAULT_TOKEN_TTL_SECS};
use agegate_claims::DEFAULT_VALIDITY_YEARS;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for an AgeGate service instance.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Process-wide salt for user hashes. Changing it changes every user hash.
    #[serde(default)]
    pub user_hash_salt: String,

    /// Hex HMAC key for bearer credentials. A random key is generated at
    /// startup when absent, so credentials do not survive a restart.
    #[serde(default)]
    pub token_secret: Option<String>,

    /// Challenge lifetime in seconds.
    #[serde(default = "default_challenge_ttl_secs")]
    pub challenge_ttl_secs: u64,

    /// Bearer credential lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Validity of a new majority claim, in calendar years.
    #[serde(default = "default_claim_validity_years")]
    pub claim_validity_years: u32,

    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where and how claims are anchored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base URL of the ledger gateway.
    #[serde(default = "default_ledger_endpoint")]
    pub endpoint: String,

    /// Upper bound on a single ledger call.
    #[serde(default = "default_ledger_timeout_secs")]
    pub timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_challenge_ttl_secs() -> u64 {
    DEFAULT_CHALLENGE_TTL_SECS
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_claim_validity_years() -> u32 {
    DEFAULT_VALIDITY_YEARS
}

fn default_ledger_endpoint() -> String {
    "http://127.0.0.1:7777".to_string()
}

fn default_ledger_timeout_secs() -> u64 {
    30
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.user_hash_salt.trim().is_empty() {
            return Err(NodeError::Config("user_hash_salt must be set".into()));
        }
        if self.challenge_ttl_secs == 0 || self.token_ttl_secs == 0 {
            return Err(NodeError::Config("TTLs must be positive".into()));
        }
        if self.claim_validity_years == 0 {
            return Err(NodeError::Config(
                "claim_validity_years must be positive".into(),
            ));
        }
        if self.ledger.timeout_secs == 0 {
            return Err(NodeError::Config("ledger.timeout_secs must be positive".into()));
        }
        if let Some(secret) = &self.token_secret {
            let bytes =
                hex::decode(secret).map_err(|e| NodeError::Config(format!("token_secret: {e}")))?;
            if bytes.len() < 32 {
                return Err(NodeError::Config(
                    "token_secret must be at least 32 bytes".into(),
                ));
            }
        }
        self.log_format_kind()?;
        Ok(())
    }

    /// Decoded token secret, if configured.
    pub fn token_secret_bytes(&self) -> Result<Option<Vec<u8>>, NodeError> {
        self.token_secret
            .as_deref()
            .map(|s| hex::decode(s).map_err(|e| NodeError::Config(format!("token_secret: {e}"))))
            .transpose()
    }

    pub fn log_format_kind(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            user_hash_salt: String::new(),
            token_secret: None,
            challenge_ttl_secs: default_challenge_ttl_secs(),
            token_ttl_secs: default_token_ttl_secs(),
            claim_validity_years: default_claim_validity_years(),
            ledger: LedgerConfig::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ledger_endpoint(),
            timeout_secs: default_ledger_timeout_secs(),
        }
    }
}
