//! Wallet public key validation and decoding.

use agegate_types::{KeyAlgorithm, WalletPubkey};
use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use k256::ecdsa::VerifyingKey as Secp256k1VerifyingKey;

use crate::CryptoError;

/// A decoded wallet key, one variant per supported algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletKey {
    /// Tag `01`: 32-byte Ed25519 public key.
    Ed25519([u8; 32]),
    /// Tag `02`: 33-byte compressed secp256k1 public key.
    Secp256k1([u8; 33]),
}

impl WalletKey {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Ed25519(_) => KeyAlgorithm::Ed25519,
            Self::Secp256k1(_) => KeyAlgorithm::Secp256k1,
        }
    }

    /// Raw key bytes, without the tag.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ed25519(b) => b,
            Self::Secp256k1(b) => b,
        }
    }

    /// Whether the bytes name a point on the key's curve.
    pub fn is_on_curve(&self) -> bool {
        match self {
            Self::Ed25519(b) => Ed25519VerifyingKey::from_bytes(b).is_ok(),
            Self::Secp256k1(b) => Secp256k1VerifyingKey::from_sec1_bytes(b).is_ok(),
        }
    }

    /// Tagged hex form of this key.
    pub fn to_wallet_pubkey(&self) -> WalletPubkey {
        let raw = format!("{}{}", self.algorithm().tag(), hex::encode(self.as_bytes()));
        WalletPubkey::parse(&raw).expect("tag and length come from the variant")
    }
}

/// Split a canonical wallet key into its algorithm variant.
///
/// Only the byte layout is checked here; curve membership is left to the caller.
pub fn decode_wallet_key(pubkey: &WalletPubkey) -> Result<WalletKey, CryptoError> {
    let bytes = hex::decode(pubkey.key_hex())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    match pubkey.algorithm() {
        KeyAlgorithm::Ed25519 => {
            let arr: [u8; 32] = bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidPublicKey("expected 32 key bytes".into()))?;
            Ok(WalletKey::Ed25519(arr))
        }
        KeyAlgorithm::Secp256k1 => {
            let arr: [u8; 33] = bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidPublicKey("expected 33 key bytes".into()))?;
            Ok(WalletKey::Secp256k1(arr))
        }
    }
}

/// Validate a hex wallet key as supplied by a client.
///
/// Rejects non-hex input, unknown algorithm tags, lengths that do not match
/// the tag, and keys that do not decode to a curve point.
pub fn validate_pubkey(raw: &str) -> Result<WalletPubkey, CryptoError> {
    let pubkey = WalletPubkey::parse(raw)?;
    let key = decode_wallet_key(&pubkey)?;
    if !key.is_on_curve() {
        return Err(CryptoError::InvalidPublicKey(format!(
            "not a valid {} point",
            key.algorithm()
        )));
    }
    Ok(pubkey)
}
