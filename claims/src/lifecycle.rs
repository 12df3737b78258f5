//! Claim creation, status, revocation and anchoring.
//!
//! Invariant: at most one non-revoked row per `(wallet, claim type)`.
//! Creation rotates inside one [`ActiveClaimTxn`](agegate_store::ActiveClaimTxn)
//! so concurrent creates for a wallet serialize; ledger calls happen after the
//! commit, outside every lock. A failed ledger call leaves local state as
//! committed and is reported as [`ClaimError::Anchoring`].

use std::sync::Arc;

use agegate_crypto::UserHasher;
use agegate_ledger::{ClaimParams, LedgerClient};
use agegate_store::{ClaimKey, ClaimRecord, ClaimStore, NewClaim};
use agegate_types::{ClaimId, ClaimType, Clock, SubmissionHash, Timestamp, WalletPubkey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::age::compute_age;
use crate::ClaimError;

/// Default claim validity, in calendar years.
pub const DEFAULT_VALIDITY_YEARS: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOutcome {
    pub is_major: bool,
    pub claim_created: bool,
    pub claim_id: ClaimId,
    pub submission_hash: Option<SubmissionHash>,
    pub claim_params: ClaimParams,
}

/// What a wallet can currently prove for one claim type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimStatus {
    pub has_proof: bool,
    pub is_major: bool,
    pub revoked: bool,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub submission_hash: Option<SubmissionHash>,
}

impl ClaimStatus {
    fn from_record(record: &ClaimRecord, is_major: bool) -> Self {
        Self {
            has_proof: true,
            is_major,
            revoked: record.revoked,
            valid_from: Some(record.valid_from),
            valid_until: Some(record.valid_until),
            submission_hash: record.submission_hash.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeOutcome {
    /// Whether the wallet ever had a row of this type.
    pub had_proof: bool,
    pub revoked: bool,
    pub submission_hash: Option<SubmissionHash>,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
}

pub struct ClaimLifecycleManager {
    store: Arc<dyn ClaimStore>,
    ledger: Arc<dyn LedgerClient>,
    hasher: UserHasher,
    clock: Arc<dyn Clock>,
    validity_years: u32,
}

impl ClaimLifecycleManager {
    pub fn new(
        store: Arc<dyn ClaimStore>,
        ledger: Arc<dyn LedgerClient>,
        hasher: UserHasher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            ledger,
            hasher,
            clock,
            validity_years: DEFAULT_VALIDITY_YEARS,
        }
    }

    pub fn with_validity_years(mut self, years: u32) -> Self {
        self.validity_years = years;
        self
    }

    pub fn validity_years(&self) -> u32 {
        self.validity_years
    }

    /// Record the wallet's majority status for `birth_date`.
    ///
    /// A minor yields a single revoked audit row and never touches an
    /// existing active claim. A major rotates: every non-revoked row of the
    /// wallet is revoked and exactly one new active row is inserted, then the
    /// new claim is submitted to the ledger.
    pub async fn create_if_major(
        &self,
        wallet: &WalletPubkey,
        birth_date: NaiveDate,
        session_id: Option<&str>,
    ) -> Result<CreateOutcome, ClaimError> {
        let now = self.clock.now();
        let today = now.to_datetime().date_naive();
        let age = compute_age(birth_date, today)?;
        let claim_type = ClaimType::AgeOver18;

        let claim_params = ClaimParams {
            user_hash: self.hasher.compute_user_hash(wallet.as_str()),
            claim_type,
            is_major: age.is_major,
            valid_from: now,
            valid_until: now.plus_years(self.validity_years),
        };
        let new_claim = NewClaim {
            wallet_pubkey: wallet.clone(),
            user_hash: claim_params.user_hash.clone(),
            claim_type,
            age: age.age,
            is_major: age.is_major,
            valid_from: claim_params.valid_from,
            valid_until: claim_params.valid_until,
            revoked: !age.is_major,
            session_id: session_id.map(str::to_string),
            created_at: now,
        };

        if !age.is_major {
            let record = self.store.insert_audit(new_claim)?;
            info!(wallet = %wallet, claim = %record.id, "minor audit row recorded");
            return Ok(CreateOutcome {
                is_major: false,
                claim_created: false,
                claim_id: record.id,
                submission_hash: None,
                claim_params,
            });
        }

        let key = ClaimKey::new(wallet.clone(), claim_type);
        let (record, superseded) = {
            let mut txn = self.store.begin_active(&key)?;
            let superseded = txn.revoke_all();
            let record = txn.insert(new_claim)?;
            txn.commit()?;
            (record, superseded)
        };
        info!(
            wallet = %wallet,
            claim = %record.id,
            superseded,
            valid_until = %record.valid_until.to_rfc3339(),
            "majority claim created"
        );

        match self.ledger.submit(&claim_params).await {
            Ok(hash) => {
                self.store.attach_submission(record.id, &hash)?;
                Ok(CreateOutcome {
                    is_major: true,
                    claim_created: true,
                    claim_id: record.id,
                    submission_hash: Some(hash),
                    claim_params,
                })
            }
            Err(e) => {
                error!(
                    wallet = %wallet,
                    claim = %record.id,
                    error = %e,
                    "ledger submission failed; claim stays valid off-ledger"
                );
                Err(ClaimError::Anchoring {
                    claim_id: record.id,
                    source: e,
                })
            }
        }
    }

    /// What the wallet can currently prove.
    pub fn get_status(
        &self,
        wallet: &WalletPubkey,
        claim_type: ClaimType,
    ) -> Result<ClaimStatus, ClaimError> {
        let key = ClaimKey::new(wallet.clone(), claim_type);
        let now = self.clock.now();

        if let Some(active) = self.store.latest_active_major(&key, now)? {
            return Ok(ClaimStatus::from_record(&active, true));
        }
        Ok(match self.store.latest(&key)? {
            Some(latest) => ClaimStatus::from_record(&latest, false),
            None => ClaimStatus::default(),
        })
    }

    /// Revoke the wallet's active claim.
    ///
    /// With nothing active this mutates nothing and echoes the most recent
    /// majority row (the latest row when there never was one), so repeated
    /// calls report the same terminal state even after later minor audit
    /// rows. Otherwise the revocation goes to the ledger first; the row is
    /// only marked revoked once the ledger accepts it.
    pub async fn revoke(
        &self,
        wallet: &WalletPubkey,
        claim_type: ClaimType,
    ) -> Result<RevokeOutcome, ClaimError> {
        let key = ClaimKey::new(wallet.clone(), claim_type);

        let Some(active) = self.store.active(&key)? else {
            let history = self.store.history(&key)?;
            let last = history
                .iter()
                .rev()
                .find(|r| r.is_major)
                .or_else(|| history.last());
            return Ok(RevokeOutcome {
                had_proof: last.is_some(),
                revoked: true,
                submission_hash: last.and_then(|r| r.submission_hash.clone()),
                valid_from: last.map(|r| r.valid_from),
                valid_until: last.map(|r| r.valid_until),
            });
        };

        let hash = match self.ledger.revoke(&active.user_hash, claim_type).await {
            Ok(hash) => hash,
            Err(e) => {
                error!(
                    wallet = %wallet,
                    claim = %active.id,
                    error = %e,
                    "ledger revocation failed; claim left active"
                );
                return Err(ClaimError::Anchoring {
                    claim_id: active.id,
                    source: e,
                });
            }
        };

        // A create may have rotated the row while the ledger call was in
        // flight; re-check under the row lock.
        let record = {
            let txn = self.store.begin_active(&key)?;
            if let Some(newer) = txn.active().into_iter().find(|r| r.id != active.id) {
                warn!(
                    wallet = %wallet,
                    claim = %active.id,
                    newer = %newer.id,
                    "claim rotated during ledger revocation; newer claim left active"
                );
            }
            self.store.mark_revoked(active.id, Some(&hash))?
        };
        info!(wallet = %wallet, claim = %record.id, "claim revoked");

        Ok(RevokeOutcome {
            had_proof: true,
            revoked: true,
            submission_hash: record.submission_hash,
            valid_from: Some(record.valid_from),
            valid_until: Some(record.valid_until),
        })
    }

    /// Submit the active claim to the ledger if it has no hash yet.
    ///
    /// Returns the existing hash when already anchored.
    pub async fn anchor_pending(
        &self,
        wallet: &WalletPubkey,
        claim_type: ClaimType,
    ) -> Result<SubmissionHash, ClaimError> {
        let key = ClaimKey::new(wallet.clone(), claim_type);
        let active = self
            .store
            .active(&key)?
            .ok_or_else(|| ClaimError::NotFound(format!("no active {claim_type} claim")))?;

        if let Some(hash) = active.submission_hash {
            return Ok(hash);
        }

        let params = ClaimParams {
            user_hash: active.user_hash.clone(),
            claim_type,
            is_major: active.is_major,
            valid_from: active.valid_from,
            valid_until: active.valid_until,
        };
        match self.ledger.submit(&params).await {
            Ok(hash) => {
                self.store.attach_submission(active.id, &hash)?;
                info!(wallet = %wallet, claim = %active.id, "pending claim anchored");
                Ok(hash)
            }
            Err(e) => {
                error!(wallet = %wallet, claim = %active.id, error = %e, "ledger retry failed");
                Err(ClaimError::Anchoring {
                    claim_id: active.id,
                    source: e,
                })
            }
        }
    }

    /// Release idle per-wallet row locks held by the store.
    pub fn cleanup_locks(&self) -> usize {
        self.store.cleanup_locks()
    }

    /// Every row of the wallet for `claim_type`, oldest first.
    pub fn history(
        &self,
        wallet: &WalletPubkey,
        claim_type: ClaimType,
    ) -> Result<Vec<ClaimRecord>, ClaimError> {
        let key = ClaimKey::new(wallet.clone(), claim_type);
        Ok(self.store.history(&key)?)
    }
}
