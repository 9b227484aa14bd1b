//! Compare command implementation.

use std::path::PathBuf;

use anyhow::{bail, Result};
use colored::Colorize;
use lookbook_core::Fingerprinter;
use tracing::info;

use crate::utils::{fingerprint_file, format_score};

/// Execute the compare command.
///
/// Fails (exit code 65) when the photos are not similar, so scripts can
/// branch on the result.
pub fn execute(first: PathBuf, second: PathBuf, threshold: f64, quiet: bool) -> Result<()> {
    let fingerprinter = Fingerprinter::default();
    let a = fingerprint_file(&fingerprinter, &first)?;
    let b = fingerprint_file(&fingerprinter, &second)?;

    let score = a.similarity(&b);
    let distance = a.hamming_distance(&b).unwrap_or(a.len() as u32);
    let similar = score > threshold;

    info!(score, distance, threshold, similar, "Compared photos");

    if !quiet {
        println!();
        if similar {
            println!("{}", "SIMILAR".green().bold());
        } else {
            println!("{}", "NOT SIMILAR".red().bold());
        }
        println!();
        println!("   {} {}", "First:".dimmed(), first.display());
        println!("   {} {}", "Second:".dimmed(), second.display());
        println!("   {} {}", "Score:".dimmed(), format_score(score));
        println!("   {} {} of {} bits", "Distance:".dimmed(), distance, a.len());
        println!("   {} {}", "Threshold:".dimmed(), format_score(threshold));
    }

    if !similar {
        bail!(
            "Photos are not similar ({} <= {})",
            format_score(score),
            format_score(threshold)
        );
    }

    Ok(())
}
