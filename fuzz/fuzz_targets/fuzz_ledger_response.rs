#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(hash) = agegate_ledger::parse_submission_response(data) {
        assert_eq!(hash.as_str().len(), 64);
    }
});
