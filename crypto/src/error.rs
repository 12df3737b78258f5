use agegate_types::TypesError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("unsupported signature algorithm tag: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),
}

impl From<TypesError> for CryptoError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::UnsupportedAlgorithm(tag) => CryptoError::UnsupportedAlgorithm(tag),
            other => CryptoError::InvalidPublicKey(other.to_string()),
        }
    }
}
