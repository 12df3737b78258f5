#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    pubkey: String,
    message: Vec<u8>,
    signature_hex: String,
}

fuzz_target!(|input: Input| {
    let _ = agegate_crypto::verify_signature(&input.pubkey, &input.message, &input.signature_hex);
});
