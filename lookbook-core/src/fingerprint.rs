//! Average-hash fingerprinting for product photos.
//!
//! Turns arbitrary image bytes into a fixed-length [`Signature`] that stays
//! close for visually similar photos and is cheap to compare.
//!
//! # Algorithm
//!
//! 1. Decode the image (JPEG, PNG, GIF or WebP).
//! 2. Resample to a fixed grid (16×16 by default) with a Lanczos3 filter.
//! 3. Convert each cell to 8-bit luma.
//! 4. Emit one bit per cell, row-major: `1` if the cell is strictly brighter
//!    than the grid mean, `0` otherwise.
//!
//! The hash survives re-encoding and rescaling well. It is only approximately
//! stable under global brightness changes and makes no attempt at rotation,
//! crop or colour invariance.
//!
//! # Usage
//!
//! ```no_run
//! use lookbook_core::fingerprint::Fingerprinter;
//!
//! let bytes = std::fs::read("shoe.jpg").unwrap();
//! let fingerprinter = Fingerprinter::default();
//! let a = fingerprinter.fingerprint(&bytes).unwrap();
//!
//! let other = std::fs::read("shoe-2.jpg").unwrap();
//! let b = fingerprinter.fingerprint(&other).unwrap();
//! let score = a.similarity(&b); // 1.0 = identical signatures
//! ```

use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

use crate::error::{LookbookError, Result};

/// Default sampling grid edge (16×16 cells).
pub const DEFAULT_GRID_SIZE: u32 = 16;

/// Bit length of signatures produced with the default grid.
pub const SIGNATURE_BITS: usize = (DEFAULT_GRID_SIZE * DEFAULT_GRID_SIZE) as usize;

/// Fixed-length binary fingerprint of one image.
///
/// Bits are packed most-significant first, in row-major grid order. Padding
/// bits in the last byte are always zero, so byte-wise XOR counts only real
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SignatureRepr", into = "SignatureRepr")]
pub struct Signature {
    bytes: Vec<u8>,
    len: usize,
}

#[derive(Serialize, Deserialize)]
struct SignatureRepr {
    hex: String,
    bits: usize,
}

impl Signature {
    /// Build a signature from individual bits in order.
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bytes = Vec::new();
        let mut len = 0usize;

        for bit in bits {
            if len % 8 == 0 {
                bytes.push(0);
            }
            if bit {
                if let Some(last) = bytes.last_mut() {
                    *last |= 0x80 >> (len % 8);
                }
            }
            len += 1;
        }

        Self { bytes, len }
    }

    /// Rebuild a signature from its packed form.
    ///
    /// Fails if the byte count does not match `len` or padding bits are set.
    pub fn from_packed(bytes: Vec<u8>, len: usize) -> Result<Self> {
        let expected = len.div_ceil(8);
        if bytes.len() != expected {
            return Err(LookbookError::InvalidSignature(format!(
                "{} bits need {} bytes, got {}",
                len,
                expected,
                bytes.len()
            )));
        }

        let used = len % 8;
        if used != 0 {
            let padding_mask = 0xFFu8 >> used;
            if bytes[expected - 1] & padding_mask != 0 {
                return Err(LookbookError::InvalidSignature(
                    "padding bits must be zero".into(),
                ));
            }
        }

        Ok(Self { bytes, len })
    }

    /// Create a signature from its hexadecimal packed form.
    pub fn from_hex(hex_str: &str, len: usize) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| LookbookError::InvalidSignature(format!("Invalid hex string: {}", e)))?;
        Self::from_packed(bytes, len)
    }

    /// Packed bytes as a hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Number of bits in the signature.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed representation (MSB first, zero padded).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bit at position `index`, or `None` past the end.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Iterate bits in raster order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(move |i| self.bit(i))
    }

    /// Number of positions where the two signatures differ.
    ///
    /// Returns `None` when the lengths differ: such signatures are not comparable.
    pub fn hamming_distance(&self, other: &Self) -> Option<u32> {
        if self.len != other.len {
            return None;
        }

        Some(
            self.bytes
                .iter()
                .zip(other.bytes.iter())
                .map(|(a, b)| (a ^ b).count_ones())
                .sum(),
        )
    }

    /// Normalized Hamming similarity in `[0, 1]`.
    ///
    /// Unequal lengths and empty signatures score `0.0`.
    pub fn similarity(&self, other: &Self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        match self.hamming_distance(other) {
            Some(distance) => (self.len - distance as usize) as f64 / self.len as f64,
            None => 0.0,
        }
    }
}

impl fmt::Display for Signature {
    /// Renders the signature as a `0`/`1` string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Signature {
    type Err = LookbookError;

    /// Parses a `0`/`1` string as produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(LookbookError::InvalidSignature(format!(
                    "unexpected character '{}' in bit string",
                    other
                ))),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(Self::from_bits(bits))
    }
}

impl TryFrom<SignatureRepr> for Signature {
    type Error = LookbookError;

    fn try_from(repr: SignatureRepr) -> Result<Self> {
        Self::from_hex(&repr.hex, repr.bits)
    }
}

impl From<Signature> for SignatureRepr {
    fn from(signature: Signature) -> Self {
        Self {
            hex: signature.to_hex(),
            bits: signature.len,
        }
    }
}

/// Average-hash generator with a fixed sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprinter {
    grid_width: u32,
    grid_height: u32,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_SIZE,
            grid_height: DEFAULT_GRID_SIZE,
        }
    }
}

impl Fingerprinter {
    /// Create a fingerprinter sampling a `width`×`height` grid.
    pub fn with_grid(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LookbookError::DecodeFailed(format!(
                "sampling grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            grid_width: width,
            grid_height: height,
        })
    }

    /// Length of the signatures this fingerprinter produces.
    pub fn signature_len(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Compute the signature of raw image bytes.
    ///
    /// Supports JPEG, PNG, GIF, and WebP formats.
    pub fn fingerprint(&self, image_data: &[u8]) -> Result<Signature> {
        let image = image::load_from_memory(image_data)
            .map_err(|e| LookbookError::DecodeFailed(format!("Failed to decode image: {}", e)))?;

        self.fingerprint_image(&image)
    }

    /// Compute the signature of an already decoded image.
    pub fn fingerprint_image(&self, image: &DynamicImage) -> Result<Signature> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LookbookError::DecodeFailed(format!(
                "image has zero size ({}x{})",
                width, height
            )));
        }

        let sampled = image
            .resize_exact(self.grid_width, self.grid_height, FilterType::Lanczos3)
            .to_luma8();
        let cells = sampled.as_raw();

        // cell > sum / n  <=>  cell * n > sum, kept in integers
        let n = cells.len() as u64;
        let sum: u64 = cells.iter().map(|&c| u64::from(c)).sum();
        let signature = Signature::from_bits(cells.iter().map(|&c| u64::from(c) * n > sum));

        tracing::trace!(bits = signature.len(), hex = %signature.to_hex(), "Computed average hash");

        Ok(signature)
    }

    /// Check if the provided bytes appear to be a supported image format.
    pub fn is_supported_format(data: &[u8]) -> bool {
        image::guess_format(data).is_ok()
    }
}

/// Compute a signature with the default 16×16 grid.
pub fn average_hash(image_data: &[u8]) -> Result<Signature> {
    Fingerprinter::default().fingerprint(image_data)
}
