//! Wallet-ownership authentication.
//!
//! Challenge-response flow:
//! 1. **Issue**: the caller names a wallet public key and receives a single-use
//!    challenge message binding that wallet, a random nonce, the issuance time
//!    and a fixed purpose string.
//! 2. **Sign**: the wallet signs the message out of band.
//! 3. **Verify**: the signature is checked against the stored message under the
//!    wallet's algorithm; on success the challenge is consumed exactly once and
//!    a short-lived bearer credential is minted for the wallet.
//!
//! Mutating operations downstream take the wallet from the credential subject,
//! never from a request body.

pub mod authenticator;
pub mod challenge;
pub mod error;
pub mod token;

pub use authenticator::{WalletAuthenticator, WalletSession};
pub use challenge::{ChallengeStore, IssuedChallenge, CHALLENGE_PURPOSE, DEFAULT_CHALLENGE_TTL_SECS};
pub use error::AuthError;
pub use token::{IssuedToken, Scope, TokenClaims, TokenIssuer, DEFAULT_TOKEN_TTL_SECS};
