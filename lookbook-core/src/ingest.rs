//! Operator ingestion sessions.
//!
//! Registering a photo is a two-message exchange: the operator sends a photo,
//! then the article label. Each operator has one pending slot:
//!
//! ```text
//!   Idle --photo--> AwaitingLabel --label--> Idle
//!                     |      ^
//!                     +photo-+   (last photo wins)
//! ```
//!
//! The slot is consumed as soon as a label arrives, whatever happens next:
//! a blank label or a storage failure both leave the operator `Idle`, so a
//! failed commit never blocks later submissions. Pending slots live in memory
//! only and are dropped on restart.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::catalog::{CatalogEntry, CatalogStore, PhotoRef};
use crate::error::Result;
use crate::fingerprint::Signature;
use crate::policy::SenderId;

/// Photo waiting for its label.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub operator: SenderId,
    pub signature: Signature,
    pub photo_ref: PhotoRef,
    pub received_at: DateTime<Utc>,
}

/// Per-operator session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingLabel,
}

/// Result of submitting a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoOutcome {
    /// Operator was idle; a new pending submission was opened
    Started,
    /// A pending submission was replaced by this photo
    Replaced,
}

/// Result of submitting a label.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelOutcome {
    /// No photo was pending; the text is not for us
    NotPending,
    /// Label was blank; the pending photo was dropped
    Discarded,
    /// Pair committed to the catalog
    Committed(CatalogEntry),
}

/// Pending submissions keyed by operator.
#[derive(Debug, Default)]
pub struct IngestionSessions {
    pending: DashMap<SenderId, PendingSubmission>,
}

impl IngestionSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, operator: &SenderId) -> SessionState {
        if self.pending.contains_key(operator) {
            SessionState::AwaitingLabel
        } else {
            SessionState::Idle
        }
    }

    /// Open (or replace) the operator's pending submission.
    pub fn submit_photo(
        &self,
        operator: &SenderId,
        signature: Signature,
        photo_ref: PhotoRef,
    ) -> PhotoOutcome {
        let submission = PendingSubmission {
            operator: operator.clone(),
            signature,
            photo_ref,
            received_at: Utc::now(),
        };

        match self.pending.insert(operator.clone(), submission) {
            Some(previous) => {
                tracing::info!(
                    operator = %operator,
                    discarded_photo = %previous.photo_ref,
                    "Pending photo replaced"
                );
                PhotoOutcome::Replaced
            }
            None => {
                tracing::info!(operator = %operator, "Awaiting label for new photo");
                PhotoOutcome::Started
            }
        }
    }

    /// Pair the operator's pending photo with `label` and commit it.
    ///
    /// The pending slot is removed before anything else happens. A storage
    /// error is returned as-is; the photo is not restored.
    pub async fn submit_label(
        &self,
        operator: &SenderId,
        label: &str,
        store: &dyn CatalogStore,
    ) -> Result<LabelOutcome> {
        let Some((_, submission)) = self.pending.remove(operator) else {
            return Ok(LabelOutcome::NotPending);
        };

        let label = label.trim();
        if label.is_empty() {
            tracing::warn!(operator = %operator, "Blank label, pending photo discarded");
            return Ok(LabelOutcome::Discarded);
        }

        match store
            .append(label, &submission.signature, &submission.photo_ref)
            .await
        {
            Ok(entry) => {
                tracing::info!(
                    operator = %operator,
                    id = entry.id,
                    label = %entry.label,
                    "Catalog entry committed"
                );
                Ok(LabelOutcome::Committed(entry))
            }
            Err(e) => {
                tracing::error!(operator = %operator, label = %label, error = %e, "Catalog commit failed");
                Err(e)
            }
        }
    }

    /// Number of operators currently awaiting a label.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
