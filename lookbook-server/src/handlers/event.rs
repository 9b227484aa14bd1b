//! JSON rendering of orchestrator responses
//!
//! `/images` and `/texts` share one body shape: a machine `kind`, the
//! user-facing `message`, and the payload that belongs to that kind.

use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use lookbook_core::{CatalogEntry, MatchResult, Response, ResponseKind};
use serde::Serialize;
use utoipa::ToSchema;

/// A catalog entry as returned to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryView {
    /// Insertion sequence number
    #[schema(example = 17)]
    pub id: i64,
    /// Article label
    #[schema(example = "SKU-1042")]
    pub label: String,
    /// Transport photo handle
    pub photo_ref: String,
    /// Packed signature, hex-encoded (most significant bit first)
    pub signature_hex: String,
    /// Signature length in bits
    #[schema(example = 256)]
    pub signature_bits: usize,
    pub created_at: DateTime<Utc>,
}

impl From<CatalogEntry> for EntryView {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            signature_hex: entry.signature.to_hex(),
            signature_bits: entry.signature.len(),
            label: entry.label,
            photo_ref: entry.photo_ref.to_string(),
            created_at: entry.created_at,
        }
    }
}

/// One search hit
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchView {
    /// Article label
    #[schema(example = "SKU-1042")]
    pub label: String,
    /// Photo handle of the matching catalog entry
    pub photo_ref: String,
    /// Fraction of agreeing signature bits, in [0, 1]
    #[schema(example = 0.9609375)]
    pub score: f64,
}

impl From<MatchResult> for MatchView {
    fn from(m: MatchResult) -> Self {
        Self {
            label: m.label,
            photo_ref: m.photo_ref.to_string(),
            score: m.score,
        }
    }
}

/// Result of an inbound photo or text
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// One of `ingest_prompt`, `ingested`, `label_discarded`, `search_results`,
    /// `no_matches`, `decode_error`, `storage_failed`, `not_applicable`
    #[schema(example = "search_results")]
    pub kind: String,
    /// Text to show the sender; absent for `not_applicable`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set on `ingest_prompt`: whether an earlier pending photo was replaced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced: Option<bool>,
    /// Set on `ingested`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryView>,
    /// Set on `search_results`, best match first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<MatchView>>,
}

impl EventResponse {
    fn status_code(kind: ResponseKind) -> StatusCode {
        match kind {
            ResponseKind::DecodeError => StatusCode::UNPROCESSABLE_ENTITY,
            ResponseKind::StorageFailed => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::OK,
        }
    }

    /// Render an orchestrator response with its HTTP status.
    pub fn reply(response: Response) -> (StatusCode, Json<Self>) {
        let kind = response.kind();
        let message = response.message();
        let mut body = Self {
            kind: kind.as_str().to_string(),
            message,
            replaced: None,
            entry: None,
            matches: None,
        };

        match response {
            Response::IngestPrompt { replaced } => body.replaced = Some(replaced),
            Response::Ingested { entry } => body.entry = Some(entry.into()),
            Response::SearchResults { matches } => {
                body.matches = Some(matches.into_iter().map(MatchView::from).collect())
            }
            // Failure reasons stay in the logs
            _ => {}
        }

        (Self::status_code(kind), Json(body))
    }
}
