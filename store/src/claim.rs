//! Claim rows.

use agegate_types::{ClaimId, ClaimType, SubmissionHash, Timestamp, WalletPubkey};
use serde::{Deserialize, Serialize};

/// Rows are grouped by wallet and claim type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimKey {
    pub wallet: WalletPubkey,
    pub claim_type: ClaimType,
}

impl ClaimKey {
    pub fn new(wallet: WalletPubkey, claim_type: ClaimType) -> Self {
        Self { wallet, claim_type }
    }
}

/// One row of the claim audit log.
///
/// Holds the computed integer age, never a birthdate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: ClaimId,
    pub wallet_pubkey: WalletPubkey,
    pub user_hash: String,
    pub claim_type: ClaimType,
    pub age: u32,
    pub is_major: bool,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub revoked: bool,
    /// Ledger hash of the creation, or of the revocation once revoked.
    pub submission_hash: Option<SubmissionHash>,
    pub session_id: Option<String>,
    pub created_at: Timestamp,
}

impl ClaimRecord {
    pub fn from_new(id: ClaimId, claim: NewClaim) -> Self {
        Self {
            id,
            wallet_pubkey: claim.wallet_pubkey,
            user_hash: claim.user_hash,
            claim_type: claim.claim_type,
            age: claim.age,
            is_major: claim.is_major,
            valid_from: claim.valid_from,
            valid_until: claim.valid_until,
            revoked: claim.revoked,
            submission_hash: None,
            session_id: claim.session_id,
            created_at: claim.created_at,
        }
    }

    pub fn key(&self) -> ClaimKey {
        ClaimKey::new(self.wallet_pubkey.clone(), self.claim_type)
    }

    /// Whether this row currently proves majority at `now`.
    pub fn is_active_major_at(&self, now: Timestamp) -> bool {
        !self.revoked && self.is_major && now.within(self.valid_from, self.valid_until)
    }
}

/// A row to be inserted; the store assigns its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClaim {
    pub wallet_pubkey: WalletPubkey,
    pub user_hash: String,
    pub claim_type: ClaimType,
    pub age: u32,
    pub is_major: bool,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub revoked: bool,
    pub session_id: Option<String>,
    pub created_at: Timestamp,
}

impl NewClaim {
    pub fn key(&self) -> ClaimKey {
        ClaimKey::new(self.wallet_pubkey.clone(), self.claim_type)
    }
}
