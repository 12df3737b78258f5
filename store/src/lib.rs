//! Abstract claim storage.
//!
//! Every storage backend (in-memory for tests and single-process
//! deployments, a database elsewhere) implements [`ClaimStore`]. The rest of
//! the workspace depends only on the trait.
//!
//! Claim rows form an append-only audit log: rows are never deleted and a
//! revoked row is never un-revoked. Backends guarantee at most one
//! non-revoked row per [`ClaimKey`] at any instant.

pub mod claim;
pub mod error;

pub use claim::{ClaimKey, ClaimRecord, NewClaim};
pub use error::StoreError;

use agegate_types::{ClaimId, SubmissionHash, Timestamp};

/// Claim row storage.
///
/// Calls are synchronous and short; callers must not hold an
/// [`ActiveClaimTxn`] across an `.await`.
pub trait ClaimStore: Send + Sync {
    /// Take exclusive access to the non-revoked rows of `key`.
    ///
    /// Blocks while another transaction for the same key is live; other keys
    /// are unaffected.
    fn begin_active(&self, key: &ClaimKey) -> Result<Box<dyn ActiveClaimTxn + '_>, StoreError>;

    /// Append an already-revoked row outside any transaction.
    ///
    /// Rejects non-revoked rows with [`StoreError::Conflict`]; those may only be
    /// created through [`ActiveClaimTxn::insert`].
    fn insert_audit(&self, claim: NewClaim) -> Result<ClaimRecord, StoreError>;

    /// Record the ledger hash of a row's creation.
    ///
    /// Returns `false` without change if the row already carries a hash.
    fn attach_submission(&self, id: ClaimId, hash: &SubmissionHash) -> Result<bool, StoreError>;

    /// Revoke a row, storing the revocation's ledger hash when given.
    ///
    /// Revoking an already revoked row is a no-op returning the row as stored.
    fn mark_revoked(
        &self,
        id: ClaimId,
        hash: Option<&SubmissionHash>,
    ) -> Result<ClaimRecord, StoreError>;

    /// The non-revoked row of `key`, if any, regardless of its window.
    fn active(&self, key: &ClaimKey) -> Result<Option<ClaimRecord>, StoreError>;

    /// The most recent non-revoked majority row whose window contains `now`.
    fn latest_active_major(
        &self,
        key: &ClaimKey,
        now: Timestamp,
    ) -> Result<Option<ClaimRecord>, StoreError>;

    /// The most recent row of `key` in any state.
    fn latest(&self, key: &ClaimKey) -> Result<Option<ClaimRecord>, StoreError>;

    /// Every row of `key`, oldest first.
    fn history(&self, key: &ClaimKey) -> Result<Vec<ClaimRecord>, StoreError>;

    /// Release per-key bookkeeping no transaction holds. Returns how many
    /// entries were released.
    fn cleanup_locks(&self) -> usize {
        0
    }
}

/// Scoped exclusive access to the non-revoked rows of one key.
///
/// Changes are buffered and published atomically by [`commit`](Self::commit).
/// Dropping the transaction without committing discards them.
pub trait ActiveClaimTxn {
    fn key(&self) -> &ClaimKey;

    /// Non-revoked rows as this transaction currently sees them.
    fn active(&self) -> Vec<ClaimRecord>;

    /// Revoke every non-revoked row, returning how many were revoked.
    fn revoke_all(&mut self) -> usize;

    /// Buffer a new row for this transaction's key.
    ///
    /// Fails with [`StoreError::Conflict`] if the row belongs to another key,
    /// or is non-revoked while another non-revoked row is visible.
    fn insert(&mut self, claim: NewClaim) -> Result<ClaimRecord, StoreError>;

    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
