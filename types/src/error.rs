//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while parsing the workspace's value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid wallet public key: {0}")]
    InvalidPubkey(String),

    #[error("unsupported key algorithm tag: {0}")]
    UnsupportedAlgorithm(String),

    #[error("unsupported claim type: {0}")]
    InvalidClaimType(String),

    #[error("invalid submission hash: {0}")]
    InvalidSubmissionHash(String),
}
