use agegate_types::ClaimId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("claim {0} not found")]
    NotFound(ClaimId),

    #[error("conflicting claim write: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
