//! Common utility functions shared across CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use lookbook_core::{Fingerprinter, Signature};
use tracing::debug;

/// Read a photo and compute its signature.
pub fn fingerprint_file(fingerprinter: &Fingerprinter, path: &Path) -> Result<Signature> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    debug!(path = %path.display(), bytes = data.len(), "Read file");

    let signature = fingerprinter
        .fingerprint(&data)
        .with_context(|| format!("Cannot fingerprint {}", path.display()))?;

    debug!(path = %path.display(), bits = signature.len(), "Fingerprinted");
    Ok(signature)
}

/// Render a similarity score as a percentage with one decimal.
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// File name used as a label when ranking loose files.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
