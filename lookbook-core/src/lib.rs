//! Lookbook Core - visual lookup for product photo catalogs
//!
//! This crate fingerprints product photos, keeps an append-only catalog of
//! labelled fingerprints, and answers "which articles look like this photo"
//! queries.
//!
//! # Features
//!
//! - 256-bit average hash (16×16 luma grid, Lanczos3 resampling)
//! - Normalized Hamming similarity with threshold, limit and stable ties
//! - Two-step operator ingestion (photo, then article label)
//! - Pluggable catalog store and operator policy
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lookbook_core::{Lookbook, MemoryCatalog, OperatorAllowList, PhotoRef, SenderId};
//!
//! # async fn example() {
//! let lookbook = Lookbook::new(
//!     Arc::new(MemoryCatalog::new()),
//!     Arc::new(OperatorAllowList::single("admin")),
//! );
//!
//! let photo = std::fs::read("sneaker.jpg").unwrap();
//! let admin = SenderId::new("admin");
//!
//! // Operator registers a photo under an article label
//! lookbook.handle_image(&admin, &photo, PhotoRef::new("file-1")).await;
//! lookbook.handle_text(&admin, "SKU-1042").await;
//!
//! // Anyone else searches by photo
//! let response = lookbook
//!     .handle_image(&SenderId::new("customer"), &photo, PhotoRef::new("file-2"))
//!     .await;
//! println!("{}", response.message().unwrap_or_default());
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod fingerprint;
pub mod ingest;
pub mod orchestrator;
pub mod policy;
pub mod search;

// Re-export main types for convenience
pub use catalog::{CatalogEntry, CatalogStore, MemoryCatalog, PhotoRef};
pub use error::{LookbookError, Result};
pub use fingerprint::{average_hash, Fingerprinter, Signature, DEFAULT_GRID_SIZE, SIGNATURE_BITS};
pub use ingest::{IngestionSessions, LabelOutcome, PendingSubmission, PhotoOutcome, SessionState};
pub use orchestrator::{Lookbook, Response, ResponseKind};
pub use policy::{NoOperators, OperatorAllowList, OperatorPolicy, SenderId};
pub use search::{dedup_by_label, search, MatchResult, SearchParams, DEFAULT_LIMIT, DEFAULT_THRESHOLD};
