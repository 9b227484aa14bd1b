//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod articles;
pub mod event;
pub mod health;
pub mod images;
pub mod texts;

pub use crate::state::AppState;
pub use articles::{
    article_photos_handler, list_articles_handler, ArticlePhotosResponse, ArticlesResponse,
};
pub use event::{EntryView, EventResponse, MatchView};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use images::{content_photo_ref, images_handler};
pub use texts::{texts_handler, TextRequest};
