//! PostgreSQL implementation of the catalog store.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lookbook_core::{CatalogEntry, CatalogStore, PhotoRef, Result, Signature};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use super::CatalogStoreError;

/// PostgreSQL-backed catalog store.
///
/// Every append is a single-row `INSERT ... RETURNING`, so an entry is either
/// fully visible to later snapshots or absent.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

/// Row type for database queries.
#[derive(FromRow)]
struct CatalogRow {
    id: i64,
    label: String,
    signature: Vec<u8>,
    signature_bits: i32,
    photo_ref: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CatalogRow> for CatalogEntry {
    type Error = CatalogStoreError;

    fn try_from(row: CatalogRow) -> std::result::Result<Self, Self::Error> {
        let bits = usize::try_from(row.signature_bits).map_err(|_| CatalogStoreError::CorruptRow {
            id: row.id,
            reason: format!("negative signature length {}", row.signature_bits),
        })?;
        let signature =
            Signature::from_packed(row.signature, bits).map_err(|e| CatalogStoreError::CorruptRow {
                id: row.id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id: row.id,
            label: row.label,
            signature,
            photo_ref: PhotoRef::new(row.photo_ref),
            created_at: row.created_at,
        })
    }
}

impl PostgresCatalogStore {
    /// Connect to the database and apply pending migrations.
    pub async fn new(
        database_url: &str,
        max_connections: u32,
    ) -> std::result::Result<Self, CatalogStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| CatalogStoreError::Connection(e.to_string()))?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!(max_connections, "Catalog store connected and migrations applied");

        Ok(Self { pool })
    }

    /// Create a catalog store from an existing pool (for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        label: &str,
        signature: &Signature,
        photo_ref: &PhotoRef,
    ) -> std::result::Result<CatalogEntry, CatalogStoreError> {
        let bits = i32::try_from(signature.len()).map_err(|_| {
            CatalogStoreError::Query(format!("signature too long: {} bits", signature.len()))
        })?;

        let row: CatalogRow = sqlx::query_as(
            r#"
            INSERT INTO catalog_entries (label, signature, signature_bits, photo_ref)
            VALUES ($1, $2, $3, $4)
            RETURNING id, label, signature, signature_bits, photo_ref, created_at
            "#,
        )
        .bind(label)
        .bind(signature.as_bytes())
        .bind(bits)
        .bind(photo_ref.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn select_all(&self) -> std::result::Result<Vec<CatalogEntry>, CatalogStoreError> {
        let rows: Vec<CatalogRow> = sqlx::query_as(
            r#"
            SELECT id, label, signature, signature_bits, photo_ref, created_at
            FROM catalog_entries
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CatalogEntry::try_from).collect()
    }

    async fn select_by_label(
        &self,
        label: &str,
    ) -> std::result::Result<Vec<PhotoRef>, CatalogStoreError> {
        let refs: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT photo_ref
            FROM catalog_entries
            WHERE label = $1
            ORDER BY id
            "#,
        )
        .bind(label)
        .fetch_all(&self.pool)
        .await?;

        Ok(refs.into_iter().map(PhotoRef::new).collect())
    }

    async fn select_labels(&self) -> std::result::Result<BTreeSet<String>, CatalogStoreError> {
        let labels: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT label FROM catalog_entries")
                .fetch_all(&self.pool)
                .await?;

        Ok(labels.into_iter().collect())
    }

    async fn select_count(&self) -> std::result::Result<usize, CatalogStoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_entries")
            .fetch_one(&self.pool)
            .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn append(
        &self,
        label: &str,
        signature: &Signature,
        photo_ref: &PhotoRef,
    ) -> Result<CatalogEntry> {
        let entry = self.insert(label, signature, photo_ref).await?;
        tracing::debug!(id = entry.id, label = %entry.label, "Stored catalog entry");
        Ok(entry)
    }

    async fn all_entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.select_all().await?)
    }

    async fn entries_by_label(&self, label: &str) -> Result<Vec<PhotoRef>> {
        Ok(self.select_by_label(label).await?)
    }

    async fn distinct_labels(&self) -> Result<BTreeSet<String>> {
        Ok(self.select_labels().await?)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.select_count().await?)
    }

    async fn check_health(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(CatalogStoreError::from)?;
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(signature: Vec<u8>, signature_bits: i32) -> CatalogRow {
        CatalogRow {
            id: 7,
            label: "SKU-1042".to_string(),
            signature,
            signature_bits,
            photo_ref: "file-abc".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_to_entry() {
        let bytes: Vec<u8> = (0u8..32).collect();
        let entry = CatalogEntry::try_from(row(bytes.clone(), 256)).unwrap();

        assert_eq!(entry.id, 7);
        assert_eq!(entry.label, "SKU-1042");
        assert_eq!(entry.photo_ref, PhotoRef::new("file-abc"));
        assert_eq!(entry.signature, Signature::from_packed(bytes, 256).unwrap());
        assert_eq!(entry.signature.len(), 256);
    }

    #[test]
    fn test_negative_length_is_corrupt() {
        let err = CatalogEntry::try_from(row(vec![0xFF], -1)).unwrap_err();
        assert!(matches!(err, CatalogStoreError::CorruptRow { id: 7, .. }));
    }

    #[test]
    fn test_byte_count_mismatch_is_corrupt() {
        let err = CatalogEntry::try_from(row(vec![0x80], 9)).unwrap_err();
        assert!(matches!(err, CatalogStoreError::CorruptRow { id: 7, .. }));
    }

    #[test]
    fn test_nonzero_padding_is_corrupt() {
        // 4 bits in use, low nibble must be clear
        let err = CatalogEntry::try_from(row(vec![0b1010_0001], 4)).unwrap_err();
        assert!(matches!(err, CatalogStoreError::CorruptRow { id: 7, .. }));
    }
}
