//! Bearer credentials minted after a successful wallet verification.
//!
//! Wire form: `hex(claims_json) "." hex(HMAC-SHA256(secret, claims_json))`.
//! Tokens are short-lived and scoped to the two mutating claim operations.

use std::fmt;
use std::sync::Arc;

use agegate_types::{Clock, WalletPubkey};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::AuthError;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 300;

/// Operations a bearer credential authorizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    CreateClaim,
    RevokeClaim,
}

impl Scope {
    /// Every credential carries exactly this set.
    pub const ALL: [Scope; 2] = [Scope::CreateClaim, Scope::RevokeClaim];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::CreateClaim => "create-claim",
            Scope::RevokeClaim => "revoke-claim",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed payload of a credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The authenticated wallet.
    pub sub: WalletPubkey,
    pub scope: Vec<Scope>,
    /// Issued-at, unix seconds.
    pub iat: u64,
    /// Expiry, unix seconds.
    pub exp: u64,
}

#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in_secs: u64,
    pub claims: TokenClaims,
}

/// Mints and checks bearer credentials with a process-wide HMAC key.
pub struct TokenIssuer {
    key: Zeroizing<Vec<u8>>,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            key: Zeroizing::new(secret.to_vec()),
            ttl_secs,
            clock,
        }
    }

    /// An issuer whose key lives only in this process; tokens die with it.
    pub fn with_random_secret(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        let mut secret = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(secret.as_mut());
        Self::new(secret.as_ref(), ttl_secs, clock)
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Mint a credential whose subject is `wallet`.
    pub fn issue(&self, wallet: &WalletPubkey) -> Result<IssuedToken, AuthError> {
        let now = self.clock.now();
        let claims = TokenClaims {
            sub: wallet.clone(),
            scope: Scope::ALL.to_vec(),
            iat: now.as_secs(),
            exp: now.plus_secs(self.ttl_secs).as_secs(),
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|e| AuthError::Internal(e.to_string()))?;
        let tag = self.mac(&payload)?.finalize().into_bytes();

        Ok(IssuedToken {
            token: format!("{}.{}", hex::encode(&payload), hex::encode(tag)),
            expires_in_secs: self.ttl_secs,
            claims,
        })
    }

    /// Check a credential and that it grants `required`.
    pub fn verify(&self, token: &str, required: Scope) -> Result<TokenClaims, AuthError> {
        let (payload_hex, tag_hex) = token
            .trim()
            .split_once('.')
            .ok_or(AuthError::MalformedToken)?;
        let payload = hex::decode(payload_hex).map_err(|_| AuthError::MalformedToken)?;
        let tag = hex::decode(tag_hex).map_err(|_| AuthError::MalformedToken)?;

        self.mac(&payload)?
            .verify_slice(&tag)
            .map_err(|_| AuthError::BadTokenSignature)?;

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::MalformedToken)?;

        if self.clock.now().as_secs() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        if !claims.scope.contains(&required) {
            return Err(AuthError::MissingScope(required.to_string()));
        }
        Ok(claims)
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        mac.update(payload);
        Ok(mac)
    }
}
