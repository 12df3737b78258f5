//! Payloads sent to the ledger.

use agegate_types::{ClaimType, Timestamp};
use serde::{Deserialize, Serialize};

/// Parameters of a claim as anchored on the ledger.
///
/// Carries the pseudonymous user hash, never the wallet or a birthdate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimParams {
    pub user_hash: String,
    pub claim_type: ClaimType,
    pub is_major: bool,
    /// Unix seconds.
    pub valid_from: Timestamp,
    /// Unix seconds.
    pub valid_until: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeParams {
    pub user_hash: String,
    pub claim_type: ClaimType,
}
