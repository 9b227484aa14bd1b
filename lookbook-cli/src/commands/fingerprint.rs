//! Fingerprint command implementation.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use lookbook_core::Fingerprinter;
use tracing::info;

use crate::utils::fingerprint_file;
use crate::OutputFormat;

/// Execute the fingerprint command.
pub fn execute(file: PathBuf, format: OutputFormat, quiet: bool) -> Result<()> {
    let fingerprinter = Fingerprinter::default();
    let signature = fingerprint_file(&fingerprinter, &file)?;

    info!(path = %file.display(), bits = signature.len(), "Fingerprint computed");

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "file": file.display().to_string(),
                "hex": signature.to_hex(),
                "bits": signature.len(),
                "binary": signature.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text if quiet => println!("{}", signature.to_hex()),
        OutputFormat::Text => {
            println!();
            println!("{}", "Fingerprint computed".green().bold());
            println!();
            println!("   {} {}", "File:".dimmed(), file.display());
            println!("   {} {}", "Bits:".dimmed(), signature.len());
            println!("   {} {}", "Hex:".dimmed(), signature.to_hex());
            println!("   {} {}", "Binary:".dimmed(), signature);
        }
    }

    Ok(())
}
