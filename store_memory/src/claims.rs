//! In-memory implementation of ClaimStore.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use agegate_store::{ActiveClaimTxn, ClaimKey, ClaimRecord, ClaimStore, NewClaim, StoreError};
use agegate_types::{ClaimId, SubmissionHash, Timestamp};

use crate::txn::MemoryActiveTxn;

pub struct MemoryClaimStore {
    pub(crate) rows: Mutex<Vec<ClaimRecord>>,
    /// Per-key row locks. Entries are created on demand and dropped by
    /// [`cleanup_locks`](Self::cleanup_locks) once no transaction holds them.
    row_locks: Mutex<HashMap<ClaimKey, Arc<Mutex<()>>>>,
    next_id: AtomicU64,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            row_locks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn allocate_id(&self) -> ClaimId {
        ClaimId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn row_lock(&self, key: &ClaimKey) -> Arc<Mutex<()>> {
        let mut locks = self.row_locks.lock();
        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop row locks no transaction currently holds.
    pub fn cleanup_locks(&self) -> usize {
        let mut locks = self.row_locks.lock();
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }

    /// Number of row locks currently tracked.
    pub fn lock_count(&self) -> usize {
        self.row_locks.lock().len()
    }

    /// Total rows across all keys.
    pub fn row_count(&self) -> usize {
        self.rows.lock().len()
    }

    /// Rows of `key`, oldest first.
    pub(crate) fn rows_for(&self, key: &ClaimKey) -> Vec<ClaimRecord> {
        let mut rows: Vec<ClaimRecord> = self
            .rows
            .lock()
            .iter()
            .filter(|r| r.wallet_pubkey == key.wallet && r.claim_type == key.claim_type)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.id);
        rows
    }

    fn update<F>(&self, id: ClaimId, f: F) -> Result<ClaimRecord, StoreError>
    where
        F: FnOnce(&mut ClaimRecord),
    {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        f(row);
        Ok(row.clone())
    }
}

impl Default for MemoryClaimStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimStore for MemoryClaimStore {
    fn begin_active(&self, key: &ClaimKey) -> Result<Box<dyn ActiveClaimTxn + '_>, StoreError> {
        // The map lock is released before blocking on the row lock.
        let lock = self.row_lock(key);
        let guard = lock.lock_arc();
        Ok(Box::new(MemoryActiveTxn::new(self, key.clone(), guard)))
    }

    fn insert_audit(&self, claim: NewClaim) -> Result<ClaimRecord, StoreError> {
        if !claim.revoked {
            return Err(StoreError::Conflict(
                "audit rows must be revoked; use an active-claim transaction".into(),
            ));
        }
        let record = ClaimRecord::from_new(self.allocate_id(), claim);
        self.rows.lock().push(record.clone());
        Ok(record)
    }

    fn attach_submission(&self, id: ClaimId, hash: &SubmissionHash) -> Result<bool, StoreError> {
        let mut attached = false;
        self.update(id, |row| {
            if row.submission_hash.is_none() {
                row.submission_hash = Some(hash.clone());
                attached = true;
            }
        })?;
        Ok(attached)
    }

    fn mark_revoked(
        &self,
        id: ClaimId,
        hash: Option<&SubmissionHash>,
    ) -> Result<ClaimRecord, StoreError> {
        self.update(id, |row| {
            if !row.revoked {
                row.revoked = true;
                if let Some(hash) = hash {
                    row.submission_hash = Some(hash.clone());
                }
            }
        })
    }

    fn active(&self, key: &ClaimKey) -> Result<Option<ClaimRecord>, StoreError> {
        Ok(self.rows_for(key).into_iter().rev().find(|r| !r.revoked))
    }

    fn latest_active_major(
        &self,
        key: &ClaimKey,
        now: Timestamp,
    ) -> Result<Option<ClaimRecord>, StoreError> {
        Ok(self
            .rows_for(key)
            .into_iter()
            .rev()
            .find(|r| r.is_active_major_at(now)))
    }

    fn latest(&self, key: &ClaimKey) -> Result<Option<ClaimRecord>, StoreError> {
        Ok(self.rows_for(key).pop())
    }

    fn history(&self, key: &ClaimKey) -> Result<Vec<ClaimRecord>, StoreError> {
        Ok(self.rows_for(key))
    }

    fn cleanup_locks(&self) -> usize {
        MemoryClaimStore::cleanup_locks(self)
    }
}
