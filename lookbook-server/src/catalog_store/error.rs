//! Error types for the catalog store module.

use lookbook_core::LookbookError;
use thiserror::Error;

/// Errors that can occur when interacting with the PostgreSQL catalog.
#[derive(Debug, Error)]
pub enum CatalogStoreError {
    /// Database connection failed
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// SQL query execution failed
    #[error("Query error: {0}")]
    Query(String),

    /// Stored row could not be turned back into an entry
    #[error("Corrupt row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

impl From<sqlx::Error> for CatalogStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Query(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for CatalogStoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(e.to_string())
    }
}

impl From<CatalogStoreError> for LookbookError {
    fn from(e: CatalogStoreError) -> Self {
        LookbookError::Storage(e.to_string())
    }
}
