#![no_main]

use libfuzzer_sys::fuzz_target;

// Arbitrary strings must never panic the key parser, and anything accepted
// must already be canonical.
fuzz_target!(|data: &str| {
    if let Ok(key) = agegate_types::WalletPubkey::parse(data) {
        let again = agegate_types::WalletPubkey::parse(key.as_str()).expect("canonical form parses");
        assert_eq!(key, again);
        assert_eq!(key.as_str().len(), key.algorithm().hex_len());
    }
    let _ = agegate_crypto::validate_pubkey(data);
});
