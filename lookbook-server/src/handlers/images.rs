//! Photo upload handler
//!
//! Handles POST /images: operator photos open an ingestion session, photos
//! from anyone else run a similarity search over the catalog.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use lookbook_core::{PhotoRef, SenderId};
use sha3::{Digest, Sha3_256};

use crate::error::ApiError;
use crate::handlers::event::EventResponse;
use crate::multipart::MultipartFields;
use crate::state::AppState;
use crate::validation::{validate_photo_ref, validate_sender_id};

/// Photo handle derived from the uploaded bytes (SHA3-256, hex-encoded).
pub fn content_photo_ref(data: &[u8]) -> PhotoRef {
    PhotoRef::new(hex::encode(Sha3_256::digest(data)))
}

/// Submit a photo
///
/// Accepts multipart/form-data with:
/// - **sender_id** (required): identity of the sender
/// - **file** (required): the photo (JPEG, PNG, GIF or WebP)
/// - **photo_ref** (optional): transport handle stored with the catalog entry;
///   at most 256 bytes, defaults to the SHA3-256 of the file
#[utoipa::path(
    post,
    path = "/images",
    tag = "Lookup",
    request_body(
        content_type = "multipart/form-data",
        description = "Photo with sender identity and optional photo handle"
    ),
    responses(
        (status = 200, description = "Ingestion prompt or search results", body = EventResponse),
        (status = 400, description = "Missing sender or file, file rejected, or invalid photo_ref"),
        (status = 422, description = "Photo could not be decoded", body = EventResponse),
        (status = 503, description = "Catalog unavailable", body = EventResponse)
    )
)]
pub async fn images_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let mut fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;

    let sender = SenderId::new(validate_sender_id(fields.require_text("sender_id")?)?);
    let photo_ref = fields
        .get_text("photo_ref")
        .map(validate_photo_ref)
        .transpose()?
        .map(PhotoRef::new);
    let file = fields.take_file()?;
    let photo_ref = photo_ref.unwrap_or_else(|| content_photo_ref(&file.data));

    tracing::debug!(
        sender = %sender,
        size = file.data.len(),
        content_type = ?file.content_type,
        "Photo received"
    );

    // Decoding and resampling are CPU-bound
    let fingerprinter = state.lookbook.fingerprinter();
    let data = file.data;
    let fingerprint = tokio::task::spawn_blocking(move || fingerprinter.fingerprint(&data))
        .await
        .map_err(|e| ApiError::internal(format!("Fingerprint task failed: {}", e)))?;

    let response = state
        .lookbook
        .handle_fingerprint(&sender, fingerprint, photo_ref)
        .await;

    Ok(EventResponse::reply(response))
}
