//! Catalog store contract.
//!
//! The catalog is an append-only collection of labelled signatures. Entries
//! are never updated or removed; a label may be shared by any number of
//! entries (several photo variants of one article).
//!
//! Backends:
//! - [`MemoryCatalog`]: process-local, used in development and tests.
//! - A durable backend lives with the transport (see `lookbook-server`).

mod memory;

pub use memory::MemoryCatalog;

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fingerprint::Signature;

/// Opaque handle to a stored photo, owned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One committed catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Insertion sequence number, strictly increasing per store
    pub id: i64,
    /// Article identifier supplied by the operator
    pub label: String,
    pub signature: Signature,
    pub photo_ref: PhotoRef,
    pub created_at: DateTime<Utc>,
}

/// Append-only storage for catalog entries.
///
/// Implementations must make `append` and `all_entries` linearizable per
/// entry: a snapshot taken after an append returns must contain it, and no
/// snapshot may observe a partially written entry.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Store a new entry. No uniqueness constraint applies.
    async fn append(
        &self,
        label: &str,
        signature: &Signature,
        photo_ref: &PhotoRef,
    ) -> Result<CatalogEntry>;

    /// Snapshot of every entry at call time, in no particular order.
    async fn all_entries(&self) -> Result<Vec<CatalogEntry>>;

    /// Photo handles of entries whose label equals `label` exactly.
    async fn entries_by_label(&self, label: &str) -> Result<Vec<PhotoRef>>;

    /// Every label present in the catalog.
    async fn distinct_labels(&self) -> Result<BTreeSet<String>>;

    /// Number of stored entries.
    async fn count(&self) -> Result<usize>;

    /// Check that the backing medium is reachable.
    async fn check_health(&self) -> Result<()> {
        Ok(())
    }

    /// Whether entries survive a process restart.
    fn is_persistent(&self) -> bool;
}
