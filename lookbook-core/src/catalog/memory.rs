//! In-memory catalog store
//!
//! Keeps entries in insertion order behind a read-write lock. Ids are
//! assigned under the write lock so they follow insertion order exactly.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CatalogEntry, CatalogStore, PhotoRef};
use crate::error::Result;
use crate::fingerprint::Signature;

/// Process-local catalog (contents are lost on restart)
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn append(
        &self,
        label: &str,
        signature: &Signature,
        photo_ref: &PhotoRef,
    ) -> Result<CatalogEntry> {
        let mut entries = self.entries.write().await;
        let entry = CatalogEntry {
            id: entries.len() as i64 + 1,
            label: label.to_string(),
            signature: signature.clone(),
            photo_ref: photo_ref.clone(),
            created_at: Utc::now(),
        };
        entries.push(entry.clone());

        tracing::debug!(id = entry.id, label = %entry.label, "Appended catalog entry");
        Ok(entry)
    }

    async fn all_entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn entries_by_label(&self, label: &str) -> Result<Vec<PhotoRef>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.label == label)
            .map(|entry| entry.photo_ref.clone())
            .collect())
    }

    async fn distinct_labels(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|entry| entry.label.clone())
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
