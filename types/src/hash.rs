//! Ledger submission hash.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Hash returned by the ledger when a claim creation or revocation is anchored
/// (a deploy hash): 32 bytes, carried as 64 lowercase hex chars.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubmissionHash(String);

impl SubmissionHash {
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if body.len() != 64 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypesError::InvalidSubmissionHash(raw.to_string()));
        }
        Ok(Self(body.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SubmissionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubmissionHash({})", &self.0[..8])
    }
}

impl fmt::Display for SubmissionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SubmissionHash {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SubmissionHash> for String {
    fn from(h: SubmissionHash) -> Self {
        h.0
    }
}
