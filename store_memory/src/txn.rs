//! Active-claim transactions: buffered changes to one key's non-revoked rows,
//! published together under the rows mutex.
//!
//! # Usage
//!
//! ```ignore
//! let mut txn = store.begin_active(&key)?;
//! txn.revoke_all();
//! txn.insert(new_claim)?;
//! txn.commit()?;
//! ```
//!
//! If the transaction is dropped without calling `commit`, every buffered
//! change is discarded. The row lock is released either way.

use parking_lot::{ArcMutexGuard, RawMutex};

use agegate_store::{ActiveClaimTxn, ClaimKey, ClaimRecord, NewClaim, StoreError};
use agegate_types::ClaimId;

use crate::claims::MemoryClaimStore;

pub struct MemoryActiveTxn<'a> {
    store: &'a MemoryClaimStore,
    key: ClaimKey,
    _row_lock: ArcMutexGuard<RawMutex, ()>,
    revoked: Vec<ClaimId>,
    inserted: Vec<ClaimRecord>,
}

impl<'a> MemoryActiveTxn<'a> {
    pub(crate) fn new(
        store: &'a MemoryClaimStore,
        key: ClaimKey,
        row_lock: ArcMutexGuard<RawMutex, ()>,
    ) -> Self {
        Self {
            store,
            key,
            _row_lock: row_lock,
            revoked: Vec::new(),
            inserted: Vec::new(),
        }
    }
}

impl ActiveClaimTxn for MemoryActiveTxn<'_> {
    fn key(&self) -> &ClaimKey {
        &self.key
    }

    fn active(&self) -> Vec<ClaimRecord> {
        let committed = self
            .store
            .rows_for(&self.key)
            .into_iter()
            .filter(|r| !r.revoked && !self.revoked.contains(&r.id));
        let buffered = self.inserted.iter().filter(|r| !r.revoked).cloned();
        committed.chain(buffered).collect()
    }

    fn revoke_all(&mut self) -> usize {
        let mut count = 0;
        for row in self.store.rows_for(&self.key) {
            if !row.revoked && !self.revoked.contains(&row.id) {
                self.revoked.push(row.id);
                count += 1;
            }
        }
        for row in self.inserted.iter_mut().filter(|r| !r.revoked) {
            row.revoked = true;
            count += 1;
        }
        count
    }

    fn insert(&mut self, claim: NewClaim) -> Result<ClaimRecord, StoreError> {
        if claim.key() != self.key {
            return Err(StoreError::Conflict(format!(
                "row for {} inserted under the lock of {}",
                claim.wallet_pubkey, self.key.wallet
            )));
        }
        if !claim.revoked && !self.active().is_empty() {
            return Err(StoreError::Conflict(format!(
                "{} already has an active {} claim",
                self.key.wallet, self.key.claim_type
            )));
        }
        let record = ClaimRecord::from_new(self.store.allocate_id(), claim);
        self.inserted.push(record.clone());
        Ok(record)
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        let mut rows = this.store.rows.lock();
        for row in rows.iter_mut().filter(|r| this.revoked.contains(&r.id)) {
            row.revoked = true;
        }
        let inserted = this.inserted.len();
        rows.extend(this.inserted);
        drop(rows);

        tracing::trace!(
            wallet = %this.key.wallet,
            revoked = this.revoked.len(),
            inserted,
            "active claim txn committed"
        );
        Ok(())
    }
}
