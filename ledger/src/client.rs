//! The ledger seam and a timeout wrapper for it.

use std::time::Duration;

use agegate_types::{ClaimType, SubmissionHash};
use async_trait::async_trait;

use crate::{ClaimParams, LedgerError};

/// Default upper bound on a single ledger call.
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(30);

/// A ledger that anchors claim creations and revocations.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Anchor a newly created claim.
    async fn submit(&self, params: &ClaimParams) -> Result<SubmissionHash, LedgerError>;

    /// Anchor the revocation of the subject's claim of `claim_type`.
    async fn revoke(
        &self,
        user_hash: &str,
        claim_type: ClaimType,
    ) -> Result<SubmissionHash, LedgerError>;
}

/// Bounds every call on the inner client.
///
/// A call that outlives the bound is dropped and reported as
/// [`LedgerError::Timeout`]; whether the ledger still applied it is unknown.
pub struct TimeoutLedger<L> {
    inner: L,
    timeout: Duration,
}

impl<L: LedgerClient> TimeoutLedger<L> {
    pub fn new(inner: L, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn with_default_timeout(inner: L) -> Self {
        Self::new(inner, DEFAULT_LEDGER_TIMEOUT)
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    fn elapsed(&self) -> LedgerError {
        LedgerError::Timeout {
            secs: self.timeout.as_secs(),
        }
    }
}

#[async_trait]
impl<L: LedgerClient> LedgerClient for TimeoutLedger<L> {
    async fn submit(&self, params: &ClaimParams) -> Result<SubmissionHash, LedgerError> {
        tokio::time::timeout(self.timeout, self.inner.submit(params))
            .await
            .map_err(|_| self.elapsed())?
    }

    async fn revoke(
        &self,
        user_hash: &str,
        claim_type: ClaimType,
    ) -> Result<SubmissionHash, LedgerError> {
        tokio::time::timeout(self.timeout, self.inner.revoke(user_hash, claim_type))
            .await
            .map_err(|_| self.elapsed())?
    }
}
