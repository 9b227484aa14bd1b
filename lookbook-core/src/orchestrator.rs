//! Query orchestration.
//!
//! [`Lookbook`] is the entry point for the transport: every inbound photo or
//! text goes through it. Photos from operators open an ingestion session;
//! photos from anyone else run a similarity search. Failures come back as
//! [`Response`] values, never as errors.

use std::sync::Arc;

use crate::catalog::{CatalogEntry, CatalogStore, PhotoRef};
use crate::error::Result;
use crate::fingerprint::{Fingerprinter, Signature};
use crate::ingest::{IngestionSessions, LabelOutcome, PhotoOutcome};
use crate::policy::{OperatorPolicy, SenderId};
use crate::search::{self, MatchResult, SearchParams};

/// Outcome of an inbound event, ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Operator photo stored; waiting for the label
    IngestPrompt { replaced: bool },
    /// Label paired with the pending photo and committed
    Ingested { entry: CatalogEntry },
    /// Blank label; the pending photo was dropped
    LabelDiscarded,
    /// Ranked matches, one per label
    SearchResults { matches: Vec<MatchResult> },
    NoMatches,
    DecodeError { reason: String },
    StorageFailed { reason: String },
    /// Text not addressed to the core
    NotApplicable,
}

/// Machine-readable kind of a [`Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    IngestPrompt,
    Ingested,
    LabelDiscarded,
    SearchResults,
    NoMatches,
    DecodeError,
    StorageFailed,
    NotApplicable,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IngestPrompt => "ingest_prompt",
            Self::Ingested => "ingested",
            Self::LabelDiscarded => "label_discarded",
            Self::SearchResults => "search_results",
            Self::NoMatches => "no_matches",
            Self::DecodeError => "decode_error",
            Self::StorageFailed => "storage_failed",
            Self::NotApplicable => "not_applicable",
        }
    }
}

impl Response {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::IngestPrompt { .. } => ResponseKind::IngestPrompt,
            Self::Ingested { .. } => ResponseKind::Ingested,
            Self::LabelDiscarded => ResponseKind::LabelDiscarded,
            Self::SearchResults { .. } => ResponseKind::SearchResults,
            Self::NoMatches => ResponseKind::NoMatches,
            Self::DecodeError { .. } => ResponseKind::DecodeError,
            Self::StorageFailed { .. } => ResponseKind::StorageFailed,
            Self::NotApplicable => ResponseKind::NotApplicable,
        }
    }

    /// User-facing text, or `None` when nothing should be sent back.
    pub fn message(&self) -> Option<String> {
        let text = match self {
            Self::IngestPrompt { replaced: false } => {
                "Photo received. Send the article label.".to_string()
            }
            Self::IngestPrompt { replaced: true } => {
                "Photo replaced. Send the article label.".to_string()
            }
            Self::Ingested { entry } => format!("Article '{}' added.", entry.label),
            Self::LabelDiscarded => {
                "Empty label, photo discarded. Send the photo again.".to_string()
            }
            Self::SearchResults { matches } => {
                let mut lines = vec!["Found:".to_string()];
                lines.extend(
                    matches
                        .iter()
                        .enumerate()
                        .map(|(i, m)| format!("{}. {} ({:.1}%)", i + 1, m.label, m.score * 100.0)),
                );
                lines.join("\n")
            }
            Self::NoMatches => "No similar items found.".to_string(),
            Self::DecodeError { .. } => "Could not process image.".to_string(),
            Self::StorageFailed { .. } => {
                "Catalog is unavailable, please try again later.".to_string()
            }
            Self::NotApplicable => return None,
        };
        Some(text)
    }
}

/// Photo catalog service: fingerprinting, ingestion and search.
pub struct Lookbook {
    fingerprinter: Fingerprinter,
    store: Arc<dyn CatalogStore>,
    sessions: IngestionSessions,
    policy: Arc<dyn OperatorPolicy>,
    search_params: SearchParams,
}

impl Lookbook {
    pub fn new(store: Arc<dyn CatalogStore>, policy: Arc<dyn OperatorPolicy>) -> Self {
        Self {
            fingerprinter: Fingerprinter::default(),
            store,
            sessions: IngestionSessions::new(),
            policy,
            search_params: SearchParams::default(),
        }
    }

    pub fn with_search_params(mut self, params: SearchParams) -> Self {
        self.search_params = params;
        self
    }

    pub fn with_fingerprinter(mut self, fingerprinter: Fingerprinter) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    pub fn fingerprinter(&self) -> Fingerprinter {
        self.fingerprinter
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    pub fn sessions(&self) -> &IngestionSessions {
        &self.sessions
    }

    pub fn search_params(&self) -> SearchParams {
        self.search_params
    }

    pub fn is_operator(&self, sender: &SenderId) -> bool {
        self.policy.is_operator(sender)
    }

    /// Handle an inbound photo.
    ///
    /// Fingerprints on the calling thread; transports running on an async
    /// executor may prefer to fingerprint on a blocking pool and call
    /// [`Lookbook::handle_fingerprint`].
    pub async fn handle_image(
        &self,
        sender: &SenderId,
        image_data: &[u8],
        photo_ref: PhotoRef,
    ) -> Response {
        let fingerprint = self.fingerprinter.fingerprint(image_data);
        self.handle_fingerprint(sender, fingerprint, photo_ref).await
    }

    /// Handle an inbound photo whose fingerprint was already computed.
    pub async fn handle_fingerprint(
        &self,
        sender: &SenderId,
        fingerprint: Result<Signature>,
        photo_ref: PhotoRef,
    ) -> Response {
        let signature = match fingerprint {
            Ok(signature) => signature,
            Err(e) => {
                tracing::warn!(sender = %sender, error = %e, "Image rejected");
                return Response::DecodeError {
                    reason: e.to_string(),
                };
            }
        };

        if self.policy.is_operator(sender) {
            let outcome = self.sessions.submit_photo(sender, signature, photo_ref);
            return Response::IngestPrompt {
                replaced: outcome == PhotoOutcome::Replaced,
            };
        }

        match self.find_similar(&signature).await {
            Ok(matches) if matches.is_empty() => Response::NoMatches,
            Ok(matches) => Response::SearchResults {
                matches: search::dedup_by_label(matches),
            },
            Err(e) => {
                tracing::error!(sender = %sender, error = %e, "Catalog snapshot failed");
                Response::StorageFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Handle an inbound text message.
    ///
    /// Only an operator's label for a pending photo is consumed; anything
    /// else is [`Response::NotApplicable`].
    pub async fn handle_text(&self, sender: &SenderId, text: &str) -> Response {
        if !self.policy.is_operator(sender) {
            return Response::NotApplicable;
        }

        match self
            .sessions
            .submit_label(sender, text, self.store.as_ref())
            .await
        {
            Ok(LabelOutcome::NotPending) => Response::NotApplicable,
            Ok(LabelOutcome::Discarded) => Response::LabelDiscarded,
            Ok(LabelOutcome::Committed(entry)) => Response::Ingested { entry },
            Err(e) => Response::StorageFailed {
                reason: e.to_string(),
            },
        }
    }

    /// Raw ranked matches for `signature`, without label de-duplication.
    pub async fn find_similar(&self, signature: &Signature) -> Result<Vec<MatchResult>> {
        let snapshot = self.store.all_entries().await?;
        Ok(search::search(signature, &snapshot, &self.search_params))
    }

    /// Sorted distinct article labels.
    pub async fn list_articles(&self) -> Result<Vec<String>> {
        Ok(self.store.distinct_labels().await?.into_iter().collect())
    }

    /// Photo handles registered under `label`; empty when unknown.
    pub async fn list_by_article(&self, label: &str) -> Result<Vec<PhotoRef>> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(Vec::new());
        }
        self.store.entries_by_label(label).await
    }
}

impl std::fmt::Debug for Lookbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookbook")
            .field("fingerprinter", &self.fingerprinter)
            .field("persistent", &self.store.is_persistent())
            .field("pending", &self.sessions.pending_count())
            .field("search_params", &self.search_params)
            .finish()
    }
}
