//! Wallet public key type with a leading algorithm tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Signature algorithm named by the first byte of a wallet public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    /// Tag `01`, followed by a 32-byte Ed25519 key.
    Ed25519,
    /// Tag `02`, followed by a 33-byte compressed secp256k1 key.
    Secp256k1,
}

impl KeyAlgorithm {
    /// Look up the algorithm for a two-character hex tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "01" => Some(Self::Ed25519),
            "02" => Some(Self::Secp256k1),
            _ => None,
        }
    }

    /// The hex tag prefixed to keys of this algorithm.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ed25519 => "01",
            Self::Secp256k1 => "02",
        }
    }

    /// Length in bytes of the raw key that follows the tag.
    pub fn key_len(&self) -> usize {
        match self {
            Self::Ed25519 => 32,
            Self::Secp256k1 => 33,
        }
    }

    /// Total hex length of a tagged key (tag + key).
    pub fn hex_len(&self) -> usize {
        2 + self.key_len() * 2
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "ed25519"),
            Self::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

/// A wallet public key in canonical form: trimmed, without `0x`, lowercase hex,
/// starting with a supported algorithm tag and of the length that tag requires.
///
/// Two inputs differing only in case, surrounding whitespace or a `0x` prefix
/// parse to the same `WalletPubkey`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletPubkey(String);

impl WalletPubkey {
    /// Parse and canonicalize a hex wallet key.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if body.len() < 2 {
            return Err(TypesError::InvalidPubkey("key is too short".into()));
        }
        if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypesError::InvalidPubkey("key is not hex".into()));
        }

        let canonical = body.to_ascii_lowercase();
        let algorithm = KeyAlgorithm::from_tag(&canonical[..2])
            .ok_or_else(|| TypesError::UnsupportedAlgorithm(canonical[..2].to_string()))?;

        if canonical.len() != algorithm.hex_len() {
            return Err(TypesError::InvalidPubkey(format!(
                "{algorithm} key must be {} hex chars, got {}",
                algorithm.hex_len(),
                canonical.len()
            )));
        }

        Ok(Self(canonical))
    }

    /// The canonical hex string (tag included).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        // Parsing guarantees a known tag.
        KeyAlgorithm::from_tag(&self.0[..2]).unwrap_or(KeyAlgorithm::Ed25519)
    }

    /// The hex-encoded key bytes without the algorithm tag.
    pub fn key_hex(&self) -> &str {
        &self.0[2..]
    }
}

impl fmt::Display for WalletPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WalletPubkey {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletPubkey {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletPubkey> for String {
    fn from(key: WalletPubkey) -> Self {
        key.0
    }
}
