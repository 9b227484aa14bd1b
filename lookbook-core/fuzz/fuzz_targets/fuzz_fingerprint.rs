#![no_main]

//! Fuzz target for Fingerprinter::fingerprint()
//!
//! Arbitrary bytes must either produce a 256-bit signature or a
//! DecodeFailed error, never a panic.
//!
//! Run with: cargo +nightly fuzz run fuzz_fingerprint

use libfuzzer_sys::fuzz_target;
use lookbook_core::{Fingerprinter, SIGNATURE_BITS};

fuzz_target!(|data: &[u8]| {
    if let Ok(signature) = Fingerprinter::default().fingerprint(data) {
        assert_eq!(signature.len(), SIGNATURE_BITS);
        assert_eq!(signature.similarity(&signature), 1.0);
    }
});
