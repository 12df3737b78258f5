//! Claim type and row identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The kind of assertion a claim row makes about its subject.
///
/// Only the majority claim exists today; the enum keeps the `(wallet, claim_type)`
/// key explicit everywhere rows are looked up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClaimType {
    /// The subject was at least 18 years old when the claim was computed.
    #[default]
    AgeOver18,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgeOver18 => "age_over_18",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "age_over_18" => Ok(Self::AgeOver18),
            other => Err(TypesError::InvalidClaimType(other.to_string())),
        }
    }
}

impl TryFrom<String> for ClaimType {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClaimType> for String {
    fn from(ct: ClaimType) -> Self {
        ct.as_str().to_string()
    }
}

/// Identifier of a claim row in the audit log. Assigned by the store,
/// monotonically increasing in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClaimId(pub u64);

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim#{}", self.0)
    }
}
