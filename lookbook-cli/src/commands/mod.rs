//! CLI command implementations.

pub mod compare;
pub mod fingerprint;
pub mod rank;
