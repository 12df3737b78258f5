//! Wallet key pairs for both supported algorithms.
//!
//! The service itself only ever verifies; these key pairs exist for the
//! sandbox CLI (`agegate keygen` / `agegate sign`) and for tests.

use agegate_types::{KeyAlgorithm, WalletPubkey};
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use k256::ecdsa::SigningKey as Secp256k1SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::pubkey::WalletKey;
use crate::CryptoError;

/// A signing key pair. Secret material is zeroized on drop by the
/// underlying key types.
pub enum WalletKeypair {
    Ed25519(Ed25519SigningKey),
    Secp256k1(Secp256k1SigningKey),
}

impl WalletKeypair {
    /// Generate a new key pair from a secure random source.
    pub fn generate(algorithm: KeyAlgorithm) -> Self {
        match algorithm {
            KeyAlgorithm::Ed25519 => Self::Ed25519(Ed25519SigningKey::generate(&mut OsRng)),
            KeyAlgorithm::Secp256k1 => Self::Secp256k1(Secp256k1SigningKey::random(&mut OsRng)),
        }
    }

    /// Rebuild a key pair from a 32-byte secret (deterministic).
    pub fn from_secret_bytes(algorithm: KeyAlgorithm, secret: &[u8]) -> Result<Self, CryptoError> {
        match algorithm {
            KeyAlgorithm::Ed25519 => {
                let bytes: [u8; 32] = secret
                    .try_into()
                    .map_err(|_| CryptoError::InvalidSecretKey("expected 32 bytes".into()))?;
                Ok(Self::Ed25519(Ed25519SigningKey::from_bytes(&bytes)))
            }
            KeyAlgorithm::Secp256k1 => Secp256k1SigningKey::from_slice(secret)
                .map(Self::Secp256k1)
                .map_err(|e| CryptoError::InvalidSecretKey(e.to_string())),
        }
    }

    /// Rebuild a key pair from a hex secret (optional `0x` prefix).
    pub fn from_secret_hex(algorithm: KeyAlgorithm, secret_hex: &str) -> Result<Self, CryptoError> {
        let trimmed = secret_hex.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(body).map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?,
        );
        Self::from_secret_bytes(algorithm, &bytes)
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::Secp256k1(_) => KeyAlgorithm::Secp256k1,
        }
    }

    /// The decoded public half.
    pub fn wallet_key(&self) -> WalletKey {
        match self {
            Self::Ed25519(sk) => WalletKey::Ed25519(sk.verifying_key().to_bytes()),
            Self::Secp256k1(sk) => {
                let sec1 = sk.verifying_key().to_sec1_bytes();
                let mut bytes = [0u8; 33];
                bytes.copy_from_slice(&sec1[..33]);
                WalletKey::Secp256k1(bytes)
            }
        }
    }

    /// The tagged hex public key, as a wallet would present it.
    pub fn public(&self) -> WalletPubkey {
        self.wallet_key().to_wallet_pubkey()
    }

    /// Hex-encoded secret, wiped when the returned value is dropped.
    pub fn secret_hex(&self) -> Zeroizing<String> {
        match self {
            Self::Ed25519(sk) => Zeroizing::new(hex::encode(sk.to_bytes())),
            Self::Secp256k1(sk) => Zeroizing::new(hex::encode(sk.to_bytes())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_expected_tags() {
        let ed = WalletKeypair::generate(KeyAlgorithm::Ed25519);
        assert!(ed.public().as_str().starts_with("01"));
        assert_eq!(ed.public().as_str().len(), 66);

        let secp = WalletKeypair::generate(KeyAlgorithm::Secp256k1);
        assert!(secp.public().as_str().starts_with("02"));
        assert_eq!(secp.public().as_str().len(), 68);
    }

    #[test]
    fn secret_hex_round_trip() {
        for algorithm in [KeyAlgorithm::Ed25519, KeyAlgorithm::Secp256k1] {
            let kp = WalletKeypair::generate(algorithm);
            let restored = WalletKeypair::from_secret_hex(algorithm, &kp.secret_hex()).unwrap();
            assert_eq!(restored.public(), kp.public());
        }
    }

    #[test]
    fn from_seed_is_deterministic() {
        let seed = [42u8; 32];
        let a = WalletKeypair::from_secret_bytes(KeyAlgorithm::Ed25519, &seed).unwrap();
        let b = WalletKeypair::from_secret_bytes(KeyAlgorithm::Ed25519, &seed).unwrap();
        assert_eq!(a.public(), b.public());
    }

    #[test]
    fn short_secret_rejected() {
        assert!(WalletKeypair::from_secret_bytes(KeyAlgorithm::Ed25519, &[1u8; 16]).is_err());
        assert!(WalletKeypair::from_secret_hex(KeyAlgorithm::Secp256k1, "zz").is_err());
    }
}
