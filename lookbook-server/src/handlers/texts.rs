//! Text message handler
//!
//! Handles POST /texts. An operator's text completes a pending photo as its
//! article label; any other text is not applicable.

use axum::{extract::State, http::StatusCode, Json};
use lookbook_core::SenderId;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::event::EventResponse;
use crate::state::AppState;
use crate::validation::validate_sender_id;

/// Request body for POST /texts
#[derive(Debug, Deserialize, ToSchema)]
pub struct TextRequest {
    /// Identity of the sender
    #[schema(example = "1382280046")]
    pub sender_id: String,
    /// Message text; for an operator with a pending photo this is the article label
    #[schema(example = "SKU-1042")]
    pub text: String,
}

/// Submit a text message
#[utoipa::path(
    post,
    path = "/texts",
    tag = "Lookup",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Entry committed, label discarded or not applicable", body = EventResponse),
        (status = 400, description = "Missing sender"),
        (status = 503, description = "Catalog unavailable; the pending photo is dropped", body = EventResponse)
    )
)]
pub async fn texts_handler(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let sender = SenderId::new(validate_sender_id(&request.sender_id)?);
    let response = state.lookbook.handle_text(&sender, &request.text).await;
    Ok(EventResponse::reply(response))
}
