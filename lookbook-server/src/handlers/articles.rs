//! Catalog listing handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

/// Response for GET /articles
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticlesResponse {
    /// Distinct article labels, sorted
    #[schema(example = json!(["SKU-1042", "SKU-2001"]))]
    pub articles: Vec<String>,
    pub count: usize,
}

/// Response for GET /articles/{label}
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticlePhotosResponse {
    #[schema(example = "SKU-1042")]
    pub label: String,
    /// Photo handles registered under the label, oldest first
    pub photo_refs: Vec<String>,
}

/// List article labels
#[utoipa::path(
    get,
    path = "/articles",
    tag = "Catalog",
    responses(
        (status = 200, description = "Sorted distinct labels", body = ArticlesResponse),
        (status = 503, description = "Catalog unavailable")
    )
)]
pub async fn list_articles_handler(
    State(state): State<AppState>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let articles = state.lookbook.list_articles().await?;
    Ok(Json(ArticlesResponse {
        count: articles.len(),
        articles,
    }))
}

/// List the photos registered under one article label
///
/// An unknown label yields an empty list.
#[utoipa::path(
    get,
    path = "/articles/{label}",
    tag = "Catalog",
    params(
        ("label" = String, Path, description = "Article label (exact match)")
    ),
    responses(
        (status = 200, description = "Photo handles for the label", body = ArticlePhotosResponse),
        (status = 503, description = "Catalog unavailable")
    )
)]
pub async fn article_photos_handler(
    State(state): State<AppState>,
    Path(label): Path<String>,
) -> Result<Json<ArticlePhotosResponse>, ApiError> {
    let photo_refs = state
        .lookbook
        .list_by_article(&label)
        .await?
        .into_iter()
        .map(|r| r.to_string())
        .collect();

    Ok(Json(ArticlePhotosResponse {
        label: label.trim().to_string(),
        photo_refs,
    }))
}
