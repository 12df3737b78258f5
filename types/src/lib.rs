//! Fundamental types for AgeGate.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! canonical wallet public keys, claim types and identifiers, ledger submission
//! hashes, timestamps and the injectable clock.

pub mod claim;
pub mod error;
pub mod hash;
pub mod time;
pub mod wallet;

pub use claim::{ClaimId, ClaimType};
pub use error::TypesError;
pub use hash::SubmissionHash;
pub use time::{Clock, SystemClock, Timestamp};
pub use wallet::{KeyAlgorithm, WalletPubkey};
