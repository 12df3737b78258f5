//! Ledger anchoring.
//!
//! Claim creations and revocations are recorded on an external distributed
//! ledger. The rest of the workspace talks to it only through the
//! [`LedgerClient`] trait; the ledger answers each accepted submission with a
//! [`SubmissionHash`](agegate_types::SubmissionHash).
//!
//! Anchoring happens after the local state change has committed. A failed
//! submission never reverts local state.

pub mod client;
pub mod error;
pub mod http;
pub mod params;

pub use client::{LedgerClient, TimeoutLedger, DEFAULT_LEDGER_TIMEOUT};
pub use error::LedgerError;
pub use http::{parse_submission_response, HttpLedgerClient};
pub use params::{ClaimParams, RevokeParams};
