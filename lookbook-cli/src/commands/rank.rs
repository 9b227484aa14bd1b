//! Rank command implementation.
//!
//! Loads candidate photos into an in-memory catalog, labelled by file name,
//! and runs the same search customers get against a query photo.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use lookbook_core::{
    CatalogStore, Fingerprinter, Lookbook, MemoryCatalog, NoOperators, PhotoRef, SearchParams,
};
use tracing::{info, warn};

use crate::utils::{file_label, fingerprint_file, format_score};
use crate::OutputFormat;

/// Execute the rank command.
pub async fn execute(
    query: PathBuf,
    candidates: Vec<PathBuf>,
    params: SearchParams,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let fingerprinter = Fingerprinter::default();
    let catalog = Arc::new(MemoryCatalog::new());

    for path in &candidates {
        match fingerprint_file(&fingerprinter, path) {
            Ok(signature) => {
                catalog
                    .append(
                        &file_label(path),
                        &signature,
                        &PhotoRef::new(path.display().to_string()),
                    )
                    .await
                    .context("Failed to load candidate")?;
            }
            // One unreadable candidate should not abort the ranking
            Err(e) => {
                warn!(path = %path.display(), error = %format!("{e:#}"), "Skipping candidate");
                if !quiet {
                    eprintln!("{} {e:#}", "Skipping:".yellow());
                }
            }
        }
    }

    let query_signature = fingerprint_file(&fingerprinter, &query)?;
    let lookbook = Lookbook::new(catalog, Arc::new(NoOperators)).with_search_params(params);
    let matches = lookbook.find_similar(&query_signature).await?;

    info!(
        candidates = candidates.len(),
        matches = matches.len(),
        "Ranking complete"
    );

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = matches
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "label": m.label,
                        "path": m.photo_ref.as_str(),
                        "score": m.score,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            if matches.is_empty() {
                if !quiet {
                    println!("{}", "No similar items found.".yellow());
                }
                return Ok(());
            }
            for (i, m) in matches.iter().enumerate() {
                println!(
                    "{}. {} ({})",
                    i + 1,
                    m.photo_ref.as_str().bold(),
                    format_score(m.score)
                );
            }
        }
    }

    Ok(())
}
