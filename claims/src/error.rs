use agegate_ledger::LedgerError;
use agegate_store::StoreError;
use agegate_types::ClaimId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Local state is committed; only the ledger step failed.
    #[error("ledger anchoring failed for {claim_id}: {source}")]
    Anchoring {
        claim_id: ClaimId,
        #[source]
        source: LedgerError,
    },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
