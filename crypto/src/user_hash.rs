//! Pseudonymous claim subjects.

use crate::hash::sha256_hex;

/// Derives the user hash `hex(SHA256(trim(wallet) + ":" + salt))`.
///
/// The salt is process-wide configuration; the same hasher must be used for
/// every claim so subjects stay stable across requests.
#[derive(Clone)]
pub struct UserHasher {
    salt: String,
}

impl UserHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn compute_user_hash(&self, wallet_pubkey: &str) -> String {
        sha256_hex(&[
            wallet_pubkey.trim().as_bytes(),
            b":",
            self.salt.as_bytes(),
        ])
    }
}

impl std::fmt::Debug for UserHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserHasher").finish_non_exhaustive()
    }
}
