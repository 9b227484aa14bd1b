//! Catalog store backends for the server.
//!
//! The in-memory catalog from `lookbook-core` serves development and tests;
//! production deployments point `DATABASE_URL` at PostgreSQL.

pub mod error;
pub mod postgres;

use std::sync::Arc;

use lookbook_core::{CatalogStore, MemoryCatalog};

pub use error::CatalogStoreError;
pub use postgres::PostgresCatalogStore;

use crate::config::Config;

/// Build the catalog store selected by the configuration.
///
/// Falls back to the in-memory catalog when no database URL is configured.
/// A configured database that cannot be reached is an error, not a fallback.
pub async fn from_config(config: &Config) -> Result<Arc<dyn CatalogStore>, CatalogStoreError> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresCatalogStore::new(url, config.database_max_connections).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory catalog (entries are lost on restart)");
            Ok(Arc::new(MemoryCatalog::new()))
        }
    }
}
