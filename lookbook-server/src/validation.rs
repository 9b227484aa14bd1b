//! Upload validation module
//!
//! Provides validation utilities for multipart photo uploads.

use crate::error::ApiError;

/// Maximum length of a client-supplied photo handle, in bytes
pub const MAX_PHOTO_REF_LEN: usize = 256;

/// Content types accepted for photo uploads
const ALLOWED_MIME_PREFIXES: &[&str] = &["image/", "application/octet-stream"];

/// Validates the Content-Type of an uploaded photo
///
/// Accepts `image/*` and `application/octet-stream`; a missing Content-Type
/// is treated as binary. The decoder has the final word on the format.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), ApiError> {
    match content_type {
        Some(ct) => {
            let ct_lower = ct.to_lowercase();
            if ALLOWED_MIME_PREFIXES
                .iter()
                .any(|prefix| ct_lower.starts_with(prefix))
            {
                Ok(())
            } else {
                Err(ApiError::bad_request(format!(
                    "Unsupported Content-Type: '{}'. Allowed types: image/*, application/octet-stream",
                    ct
                )))
            }
        }
        None => Ok(()),
    }
}

/// Validates the size of an uploaded photo
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ApiError> {
    if size == 0 {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }
    if size > max_size {
        let max_mb = max_size / (1024 * 1024);
        let actual_mb = size / (1024 * 1024);
        Err(ApiError::bad_request(format!(
            "File too large: {} MB exceeds maximum of {} MB",
            actual_mb, max_mb
        )))
    } else {
        Ok(())
    }
}

/// Validates a sender identity field
pub fn validate_sender_id(sender_id: &str) -> Result<&str, ApiError> {
    let trimmed = sender_id.trim();
    if trimmed.is_empty() {
        Err(ApiError::bad_request("sender_id must not be empty"))
    } else {
        Ok(trimmed)
    }
}

/// Validates a client-supplied photo handle
///
/// Handles are stored verbatim and echoed back on search, so they are
/// bounded and may not carry control characters.
pub fn validate_photo_ref(photo_ref: &str) -> Result<&str, ApiError> {
    let trimmed = photo_ref.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("photo_ref must not be empty"));
    }
    if trimmed.len() > MAX_PHOTO_REF_LEN {
        return Err(ApiError::bad_request(format!(
            "photo_ref too long: {} bytes exceeds maximum of {}",
            trimmed.len(),
            MAX_PHOTO_REF_LEN
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ApiError::bad_request(
            "photo_ref must not contain control characters",
        ));
    }
    Ok(trimmed)
}
