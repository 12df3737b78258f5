//! Pre-built [`tracing::Span`] constructors for AgeGate operations.
//!
//! Consistent span names and fields make requests easy to filter and
//! correlate in any tracing backend. Spans carry the wallet key, never a
//! birthdate or a bearer credential.

use tracing::{info_span, Span};

/// Span covering challenge issuance for a wallet.
pub fn challenge_span(wallet: &str) -> Span {
    info_span!("challenge", wallet = %wallet)
}

/// Span covering verification of a signed challenge.
pub fn verify_span(wallet: &str, challenge_id: &str) -> Span {
    info_span!("verify", wallet = %wallet, challenge = %challenge_id)
}

/// Span covering a claim operation (`create`, `revoke`, `status`, `anchor`).
pub fn claim_span(operation: &'static str, wallet: &str) -> Span {
    info_span!("claim", op = operation, wallet = %wallet)
}

/// Span covering one sweep of expired challenges and idle locks.
pub fn sweep_span() -> Span {
    info_span!("sweep")
}
