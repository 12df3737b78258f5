#![no_main]

use std::sync::Arc;

use agegate_auth::{Scope, TokenIssuer};
use agegate_types::SystemClock;
use libfuzzer_sys::fuzz_target;

// Forged or mangled bearer tokens must be rejected without panicking.
fuzz_target!(|data: &str| {
    let issuer = TokenIssuer::new(&[7u8; 32], 300, Arc::new(SystemClock));
    assert!(issuer.verify(data, Scope::CreateClaim).is_err());
});
