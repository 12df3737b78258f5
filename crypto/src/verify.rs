//! Wallet signature verification over challenge messages.
//!
//! The key's algorithm tag selects the procedure:
//! - Ed25519: 64-byte signature over the message bytes.
//! - secp256k1: 64-byte `r || s` ECDSA signature over `SHA-256(message)`.
//!
//! Both accept a trailing 65th (recovery) byte, which is ignored. Every
//! message is tried raw and wrapped in [`WALLET_SIGNING_BANNER`], because
//! wallet software prepends the banner before signing arbitrary text.

use agegate_types::WalletPubkey;
use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey as Ed25519VerifyingKey};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature as Secp256k1Signature, VerifyingKey as Secp256k1VerifyingKey};

use crate::hash::sha256;
use crate::pubkey::{decode_wallet_key, WalletKey};
use crate::CryptoError;

/// Prefix wallet software adds in front of a message before signing it.
pub const WALLET_SIGNING_BANNER: &str = "Casper Message:\n";

/// Decode a hex signature, tolerating an optional `0x` prefix.
///
/// Returns `None` for non-hex input.
pub fn decode_signature_hex(signature_hex: &str) -> Option<Vec<u8>> {
    let trimmed = signature_hex.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(body).ok()
}

/// Verify `signature_hex` over `message` under the tagged wallet key `pubkey_hex`.
///
/// Fails only when the key itself is unusable (bad format or unknown tag);
/// a malformed or non-matching signature yields `Ok(false)`.
pub fn verify_signature(
    pubkey_hex: &str,
    message: &[u8],
    signature_hex: &str,
) -> Result<bool, CryptoError> {
    let pubkey = WalletPubkey::parse(pubkey_hex)?;
    let key = decode_wallet_key(&pubkey)?;

    let Some(signature) = decode_signature_hex(signature_hex) else {
        return Ok(false);
    };

    let mut wrapped = Vec::with_capacity(WALLET_SIGNING_BANNER.len() + message.len());
    wrapped.extend_from_slice(WALLET_SIGNING_BANNER.as_bytes());
    wrapped.extend_from_slice(message);

    Ok(key.verify(message, &signature) || key.verify(&wrapped, &signature))
}

impl WalletKey {
    /// Verify raw signature bytes over a single message encoding.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Ed25519(key) => verify_ed25519(key, message, signature),
            Self::Secp256k1(key) => verify_secp256k1(key, message, signature),
        }
    }
}

fn strip_recovery_byte(signature: &[u8]) -> Option<&[u8]> {
    match signature.len() {
        64 => Some(signature),
        65 => Some(&signature[..64]),
        _ => None,
    }
}

fn verify_ed25519(key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Some(sig) = strip_recovery_byte(signature) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; 64]>::try_from(sig) else {
        return false;
    };
    let Ok(verifying_key) = Ed25519VerifyingKey::from_bytes(key) else {
        return false;
    };
    let sig = Ed25519Signature::from_bytes(&sig_bytes);
    verifying_key.verify(message, &sig).is_ok()
}

fn verify_secp256k1(key: &[u8; 33], message: &[u8], signature: &[u8]) -> bool {
    let Some(sig) = strip_recovery_byte(signature) else {
        return false;
    };
    let Ok(verifying_key) = Secp256k1VerifyingKey::from_sec1_bytes(key) else {
        return false;
    };
    let Ok(sig) = Secp256k1Signature::from_slice(sig) else {
        return false;
    };
    // k256 only accepts low-S signatures; wallets are not required to normalize.
    let sig = sig.normalize_s().unwrap_or(sig);
    let digest = sha256(message);
    verifying_key.verify_prehash(&digest, &sig).is_ok()
}
