//! In-memory claim store.
//!
//! Rows live in a single `Vec` behind a mutex. Rotation for one
//! `(wallet, claim type)` key is serialized by a per-key row lock held by the
//! [`MemoryActiveTxn`]; distinct keys never contend on it.

pub mod claims;
pub mod txn;

pub use claims::MemoryClaimStore;
pub use txn::MemoryActiveTxn;
