//! Lookbook Server Library - REST API components for product photo lookup
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod catalog_store;
pub mod config;
pub mod error;
pub mod handlers;
pub mod multipart;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validation;

pub use catalog_store::{CatalogStoreError, PostgresCatalogStore};
pub use config::Config;
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::{create_router, create_router_with_config};
pub use state::AppState;
