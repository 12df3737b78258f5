//! Age claims.
//!
//! A claim states that a wallet's holder was at least 18 when it was
//! computed, for a bounded validity window. Per `(wallet, claim type)` a
//! claim moves `NO_CLAIM → ACTIVE → REVOKED`; a new ACTIVE row may supersede
//! a REVOKED one, and REVOKED is terminal for the row.
//!
//! Birthdates only ever pass through [`age::compute_age`]; rows keep the
//! integer age and the majority flag.

pub mod age;
pub mod error;
pub mod lifecycle;

pub use age::{birth_date_from_parts, compute_age, AgeResult, MAJORITY_AGE};
pub use error::ClaimError;
pub use lifecycle::{
    ClaimLifecycleManager, ClaimStatus, CreateOutcome, RevokeOutcome, DEFAULT_VALIDITY_YEARS,
};
