#![no_main]

//! Fuzz target for Signature parsing from bit strings and hex.
//!
//! Run with: cargo +nightly fuzz run fuzz_signature_parse

use libfuzzer_sys::fuzz_target;
use lookbook_core::Signature;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(signature) = text.parse::<Signature>() {
            assert_eq!(signature.to_string(), text);
            let restored = Signature::from_hex(&signature.to_hex(), signature.len()).unwrap();
            assert_eq!(restored, signature);
        }
        let _ = Signature::from_hex(text, data.len());
    }
});
