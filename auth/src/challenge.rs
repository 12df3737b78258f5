//! Single-use authentication challenges.
//!
//! The store is process-local: challenges do not survive a restart and are not
//! shared between instances. Running more than one instance behind a balancer
//! needs a shared keyed cache with TTL in its place to keep anti-replay intact.

use std::collections::HashMap;
use std::sync::Arc;

use agegate_crypto::validate_pubkey;
use agegate_types::{Clock, Timestamp, WalletPubkey};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Purpose string embedded in every challenge message so a signature over it
/// cannot be replayed against another protocol.
pub const CHALLENGE_PURPOSE: &str = "agegate-wallet-auth-v1";

pub const DEFAULT_CHALLENGE_TTL_SECS: u64 = 300;

const MESSAGE_HEADER: &str = "AgeGate wallet authentication";

/// A freshly issued challenge, as returned to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedChallenge {
    pub challenge_id: String,
    pub wallet_pubkey: WalletPubkey,
    pub message: String,
    pub expires_at: Timestamp,
}

#[derive(Clone, Debug)]
struct PendingChallenge {
    wallet: WalletPubkey,
    message: String,
    expires_at: Timestamp,
}

/// Issues and atomically consumes short-lived, single-use challenges.
pub struct ChallengeStore {
    entries: Mutex<HashMap<String, PendingChallenge>>,
    clock: Arc<dyn Clock>,
    ttl_secs: u64,
}

impl ChallengeStore {
    pub fn new(clock: Arc<dyn Clock>, ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a challenge for a wallet.
    ///
    /// Fails with [`AuthError::InvalidFormat`] for non-hex keys, unknown
    /// algorithm tags, lengths that do not match the tag, or off-curve keys.
    pub fn issue(&self, wallet_pubkey: &str) -> Result<IssuedChallenge, AuthError> {
        let wallet = validate_pubkey(wallet_pubkey)?;

        let mut id_bytes = [0u8; 16];
        let mut nonce = [0u8; 32];
        OsRng.fill_bytes(&mut id_bytes);
        OsRng.fill_bytes(&mut nonce);
        let challenge_id = hex::encode(id_bytes);

        let issued_at = self.clock.now();
        let expires_at = issued_at.plus_secs(self.ttl_secs);
        let message = build_message(&wallet, &hex::encode(nonce), issued_at);

        self.entries.lock().insert(
            challenge_id.clone(),
            PendingChallenge {
                wallet: wallet.clone(),
                message: message.clone(),
                expires_at,
            },
        );
        tracing::debug!(wallet = %wallet, challenge = %challenge_id, "challenge issued");

        Ok(IssuedChallenge {
            challenge_id,
            wallet_pubkey: wallet,
            message,
            expires_at,
        })
    }

    /// Look up the message for a live challenge without consuming it.
    ///
    /// Applies the same checks as [`consume`](Self::consume); an expired entry
    /// is removed.
    pub fn peek(&self, challenge_id: &str, wallet: &WalletPubkey) -> Result<String, AuthError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let entry = entries.get(challenge_id).ok_or(AuthError::UnknownOrExpired)?;
        if entry.wallet != *wallet {
            return Err(AuthError::WalletMismatch);
        }
        if now >= entry.expires_at {
            entries.remove(challenge_id);
            return Err(AuthError::Expired);
        }
        Ok(entry.message.clone())
    }

    /// Atomically check and remove a challenge, returning its message.
    ///
    /// - absent: [`AuthError::UnknownOrExpired`]
    /// - issued to another wallet: [`AuthError::WalletMismatch`], entry kept
    /// - past its TTL: [`AuthError::Expired`], entry removed
    ///
    /// A second consume of the same id always fails `UnknownOrExpired`.
    pub fn consume(&self, challenge_id: &str, wallet: &WalletPubkey) -> Result<String, AuthError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        match entries.get(challenge_id) {
            None => return Err(AuthError::UnknownOrExpired),
            Some(entry) if entry.wallet != *wallet => return Err(AuthError::WalletMismatch),
            Some(_) => {}
        }
        let entry = entries
            .remove(challenge_id)
            .ok_or(AuthError::UnknownOrExpired)?;
        if now >= entry.expires_at {
            return Err(AuthError::Expired);
        }
        Ok(entry.message)
    }

    /// Drop every expired challenge, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, c| now < c.expires_at);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_message(wallet: &WalletPubkey, nonce_hex: &str, issued_at: Timestamp) -> String {
    format!(
        "{MESSAGE_HEADER}\npurpose: {CHALLENGE_PURPOSE}\nwallet: {wallet}\nnonce: {nonce_hex}\nissued_at: {}",
        issued_at.as_secs()
    )
}
