use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger did not answer within {secs}s")]
    Timeout { secs: u64 },

    #[error("ledger endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("ledger request failed: {0}")]
    RequestFailed(String),

    #[error("malformed ledger response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),
}
