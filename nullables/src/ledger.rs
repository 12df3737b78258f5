//! Nullable ledger: records submissions instead of sending them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use agegate_ledger::{ClaimParams, LedgerClient, LedgerError};
use agegate_types::{ClaimType, SubmissionHash};
use async_trait::async_trait;
use parking_lot::Mutex;

/// A call the ledger received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    Submit(ClaimParams),
    Revoke { user_hash: String, claim_type: ClaimType },
}

/// A deterministic in-process ledger for testing.
///
/// Every accepted call returns a fresh hash derived from a counter. Calls can
/// be made to fail until told otherwise.
pub struct NullLedger {
    calls: Mutex<Vec<LedgerCall>>,
    counter: AtomicU64,
    failing: AtomicBool,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// A ledger that rejects every call until [`set_failing(false)`](Self::set_failing).
    pub fn failing() -> Self {
        let ledger = Self::new();
        ledger.set_failing(true);
        ledger
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All calls received so far, including rejected ones.
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, LedgerCall::Submit(_)))
            .count()
    }

    pub fn revoke_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, LedgerCall::Revoke { .. }))
            .count()
    }

    fn answer(&self, call: LedgerCall) -> Result<SubmissionHash, LedgerError> {
        self.calls.lock().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Unreachable("null ledger set to fail".into()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        SubmissionHash::parse(&format!("{n:064x}")).map_err(|e| LedgerError::Other(e.to_string()))
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn submit(&self, params: &ClaimParams) -> Result<SubmissionHash, LedgerError> {
        self.answer(LedgerCall::Submit(params.clone()))
    }

    async fn revoke(
        &self,
        user_hash: &str,
        claim_type: ClaimType,
    ) -> Result<SubmissionHash, LedgerError> {
        self.answer(LedgerCall::Revoke {
            user_hash: user_hash.to_string(),
            claim_type,
        })
    }
}
