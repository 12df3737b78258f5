use agegate_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid wallet public key: {0}")]
    InvalidFormat(String),

    #[error("challenge is unknown or already used")]
    UnknownOrExpired,

    #[error("challenge was issued to a different wallet")]
    WalletMismatch,

    #[error("challenge has expired")]
    Expired,

    #[error("signature does not match the challenge")]
    InvalidSignature,

    #[error("malformed bearer token")]
    MalformedToken,

    #[error("bearer token signature is invalid")]
    BadTokenSignature,

    #[error("bearer token has expired")]
    TokenExpired,

    #[error("bearer token lacks scope {0}")]
    MissingScope(String),

    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Malformed input rejected before any state was touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::InvalidFormat(_))
    }
}

impl From<CryptoError> for AuthError {
    fn from(e: CryptoError) -> Self {
        AuthError::InvalidFormat(e.to_string())
    }
}
