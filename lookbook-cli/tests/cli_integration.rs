//! CLI integration tests for lookbook-cli.
//!
//! These tests verify the CLI behavior by running the actual binary
//! against generated photos and checking outputs and exit codes.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the lookbook binary.
fn lookbook() -> Command {
    Command::cargo_bin("lookbook").unwrap()
}

/// Write a diagonal gradient photo; `flip` mirrors it horizontally.
fn write_gradient(dir: &Path, name: &str, flip: bool, format: ImageFormat) -> PathBuf {
    let img = RgbImage::from_fn(64, 64, |x, y| {
        let x = if flip { 63 - x } else { x };
        let v = ((x + y) * 2) as u8;
        Rgb([v, v / 2, 255 - v])
    });
    let path = dir.join(name);
    img.save_with_format(&path, format).unwrap();
    path
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_displays_usage() {
    lookbook()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Product photo fingerprinting and similarity",
        ))
        .stdout(predicate::str::contains("fingerprint"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("rank"));
}

#[test]
fn test_version_displays_version() {
    lookbook()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lookbook"));
}

#[test]
fn test_help_shows_exit_codes() {
    lookbook()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("65"))
        .stdout(predicate::str::contains("66"));
}

#[test]
fn test_rank_help_shows_options() {
    lookbook()
        .args(["rank", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--format"));
}

// ============================================================================
// Fingerprint Command Tests
// ============================================================================

#[test]
fn test_fingerprint_prints_hex_in_quiet_mode() {
    let dir = TempDir::new().unwrap();
    let photo = write_gradient(dir.path(), "a.png", false, ImageFormat::Png);

    let output = lookbook()
        .args(["fingerprint", "--quiet"])
        .arg(&photo)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let hex = String::from_utf8(output).unwrap();
    let hex = hex.trim();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_fingerprint_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let photo = write_gradient(dir.path(), "a.png", false, ImageFormat::Png);

    let run = || {
        lookbook()
            .args(["fingerprint", "-q"])
            .arg(&photo)
            .output()
            .unwrap()
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn test_fingerprint_json_output() {
    let dir = TempDir::new().unwrap();
    let photo = write_gradient(dir.path(), "a.jpg", false, ImageFormat::Jpeg);

    let output = lookbook()
        .args(["fingerprint", "--format", "json"])
        .arg(&photo)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["bits"], 256);
    assert_eq!(json["binary"].as_str().unwrap().len(), 256);
}

#[test]
fn test_fingerprint_missing_file_exit_code() {
    lookbook()
        .args(["fingerprint", "/nonexistent/photo.png"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_fingerprint_undecodable_file_exit_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.png");
    fs::write(&path, b"this is not a photo").unwrap();

    lookbook()
        .arg("fingerprint")
        .arg(&path)
        .assert()
        .code(67)
        .stderr(predicate::str::contains("Decode failed"));
}

// ============================================================================
// Compare Command Tests
// ============================================================================

#[test]
fn test_compare_same_photo_across_formats() {
    let dir = TempDir::new().unwrap();
    let png = write_gradient(dir.path(), "a.png", false, ImageFormat::Png);
    let jpg = write_gradient(dir.path(), "a.jpg", false, ImageFormat::Jpeg);

    lookbook()
        .arg("compare")
        .arg(&png)
        .arg(&jpg)
        .assert()
        .success()
        .stdout(predicate::str::contains("SIMILAR"));
}

#[test]
fn test_compare_different_photos_exit_code() {
    let dir = TempDir::new().unwrap();
    let a = write_gradient(dir.path(), "a.png", false, ImageFormat::Png);
    let b = write_gradient(dir.path(), "b.png", true, ImageFormat::Png);

    lookbook()
        .arg("compare")
        .arg(&a)
        .arg(&b)
        .assert()
        .code(65)
        .stdout(predicate::str::contains("NOT SIMILAR"))
        .stderr(predicate::str::contains("not similar"));
}

#[test]
fn test_compare_rejects_out_of_range_threshold() {
    lookbook()
        .args(["compare", "a.png", "b.png", "--threshold", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 1"));
}

// ============================================================================
// Rank Command Tests
// ============================================================================

#[test]
fn test_rank_lists_matching_candidates_only() {
    let dir = TempDir::new().unwrap();
    let query = write_gradient(dir.path(), "query.png", false, ImageFormat::Png);
    let same = write_gradient(dir.path(), "same.jpg", false, ImageFormat::Jpeg);
    let other = write_gradient(dir.path(), "other.png", true, ImageFormat::Png);

    let output = lookbook()
        .args(["rank", "--format", "json"])
        .arg(&query)
        .arg(&same)
        .arg(&other)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["label"], "same.jpg");
}

#[test]
fn test_rank_skips_unreadable_candidates() {
    let dir = TempDir::new().unwrap();
    let query = write_gradient(dir.path(), "query.png", false, ImageFormat::Png);
    let junk = dir.path().join("junk.png");
    fs::write(&junk, b"junk").unwrap();

    lookbook()
        .arg("rank")
        .arg(&query)
        .arg(&junk)
        .arg(&query)
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping"))
        .stdout(predicate::str::contains("(100.0%)"));
}

#[test]
fn test_rank_without_matches() {
    let dir = TempDir::new().unwrap();
    let query = write_gradient(dir.path(), "query.png", false, ImageFormat::Png);
    let other = write_gradient(dir.path(), "other.png", true, ImageFormat::Png);

    lookbook()
        .arg("rank")
        .arg(&query)
        .arg(&other)
        .assert()
        .success()
        .stdout(predicate::str::contains("No similar items found."));
}
