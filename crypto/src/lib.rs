//! Cryptographic primitives for AgeGate.
//!
//! - **Wallet keys** carry a one-byte algorithm tag: `01` Ed25519, `02` secp256k1
//!   (compressed SEC1). [`validate_pubkey`] checks format and curve membership.
//! - **Signature verification** dispatches on the decoded [`WalletKey`] and accepts
//!   either the raw challenge message or the wallet-banner-wrapped one.
//! - **User hashing** derives the pseudonymous claim subject with salted SHA-256.
//! - Key generation and signing helpers back the CLI and the test suites.

pub mod error;
pub mod hash;
pub mod keys;
pub mod pubkey;
pub mod sign;
pub mod user_hash;
pub mod verify;

pub use error::CryptoError;
pub use hash::{sha256, sha256_hex};
pub use keys::WalletKeypair;
pub use pubkey::{decode_wallet_key, validate_pubkey, WalletKey};
pub use sign::{sign_message, sign_message_hex};
pub use user_hash::UserHasher;
pub use verify::{decode_signature_hex, verify_signature, WALLET_SIGNING_BANNER};
