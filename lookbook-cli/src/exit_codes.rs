//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts and CI systems to handle errors appropriately.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Photos compared below the match threshold.
/// Maps to EX_DATAERR from sysexits.h.
pub const NOT_SIMILAR: i32 = 65;

/// Cannot open input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Input file is not a decodable image.
pub const DECODE_ERROR: i32 = 67;

/// Represents an exit code with optional error context.
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Classify error by inspecting the chain
        let code = if message.contains("Failed to read file") {
            INPUT_ERROR
        } else if message.contains("Decode failed") {
            DECODE_ERROR
        } else if message.contains("not similar") {
            NOT_SIMILAR
        } else {
            GENERAL_ERROR
        };

        Self {
            code,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_classifies_error_chain() {
        let err = anyhow!("No such file").context("Failed to read file: a.jpg");
        assert_eq!(ExitCode::from_anyhow(&err).code, INPUT_ERROR);

        let err = anyhow!("Decode failed: unknown format").context("Cannot fingerprint a.jpg");
        assert_eq!(ExitCode::from_anyhow(&err).code, DECODE_ERROR);

        let err = anyhow!("Photos are not similar (41.0% <= 70.0%)");
        assert_eq!(ExitCode::from_anyhow(&err).code, NOT_SIMILAR);

        assert_eq!(ExitCode::from_anyhow(&anyhow!("boom")).code, GENERAL_ERROR);
    }
}
