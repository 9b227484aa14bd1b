//! Similarity search over a catalog snapshot.
//!
//! Every entry is scored against the query with normalized Hamming
//! similarity. There is no index: the scan is linear in catalog size, which
//! is fine for catalogs of a few hundred thousand entries. Bucketing
//! signatures by prefix would be the natural next step past that.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, PhotoRef};
use crate::fingerprint::Signature;

/// Default minimum score; only scores strictly above it are returned.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Default maximum number of results.
pub const DEFAULT_LIMIT: usize = 5;

/// Search tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Exclusive lower bound on the score
    pub threshold: f64,
    /// Maximum number of results
    pub limit: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One ranked catalog hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Id of the matched entry (insertion order)
    pub entry_id: i64,
    pub label: String,
    pub photo_ref: PhotoRef,
    /// Normalized Hamming similarity in `[0, 1]`
    pub score: f64,
}

/// Normalized Hamming similarity between two signatures.
///
/// Unequal lengths score `0.0` instead of failing.
pub fn score(a: &Signature, b: &Signature) -> f64 {
    a.similarity(b)
}

/// Rank `candidates` against `query`.
///
/// Keeps entries scoring strictly above `params.threshold`, orders them by
/// score descending with ties in insertion order, and truncates to
/// `params.limit`. Every qualifying entry is returned, including several
/// entries sharing a label.
pub fn search(query: &Signature, candidates: &[CatalogEntry], params: &SearchParams) -> Vec<MatchResult> {
    let mut matches: Vec<MatchResult> = candidates
        .iter()
        .filter_map(|entry| {
            let score = score(query, &entry.signature);
            (score > params.threshold).then(|| MatchResult {
                entry_id: entry.id,
                label: entry.label.clone(),
                photo_ref: entry.photo_ref.clone(),
                score,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.entry_id.cmp(&b.entry_id))
    });
    matches.truncate(params.limit);

    tracing::debug!(
        candidates = candidates.len(),
        matches = matches.len(),
        threshold = params.threshold,
        "Similarity search completed"
    );

    matches
}

/// Collapse matches sharing a label, keeping the first (best) occurrence.
///
/// Expects input already ranked by [`search`].
pub fn dedup_by_label(matches: Vec<MatchResult>) -> Vec<MatchResult> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(m.label.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: i64, label: &str, signature: Signature) -> CatalogEntry {
        CatalogEntry {
            id,
            label: label.to_string(),
            signature,
            photo_ref: PhotoRef::new(format!("photo-{}", id)),
            created_at: Utc::now(),
        }
    }

    /// 256-bit signature with the first `flipped` bits inverted relative to `base`.
    fn flip_prefix(base: &Signature, flipped: usize) -> Signature {
        Signature::from_bits(base.iter().enumerate().map(|(i, b)| if i < flipped { !b } else { b }))
    }

    fn base() -> Signature {
        Signature::from_bits((0..256).map(|i| i % 3 == 0))
    }

    #[test]
    fn test_identical_signature_ranks_first() {
        let h1 = base();
        let h2 = flip_prefix(&h1, 10);
        let catalog = vec![entry(1, "SKU2", h2), entry(2, "SKU1", h1.clone())];

        let results = search(&h1, &catalog, &SearchParams::default());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label, "SKU1");
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].label, "SKU2");
        assert_eq!(results[1].score, 246.0 / 256.0);
    }

    #[test]
    fn test_low_agreement_returns_empty() {
        let query = base();
        // 100 of 256 bits agree
        let far = flip_prefix(&query, 156);
        let catalog = vec![entry(1, "SKU1", far.clone()), entry(2, "SKU2", far)];

        assert!(search(&query, &catalog, &SearchParams::default()).is_empty());
    }

    #[test]
    fn test_score_equal_to_threshold_is_excluded() {
        let query: Signature = "1111111111".parse().unwrap();
        let seven_of_ten: Signature = "1111111000".parse().unwrap();
        let catalog = vec![entry(1, "EDGE", seven_of_ten)];

        assert!(search(&query, &catalog, &SearchParams::default()).is_empty());
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        let query = base();
        let catalog = vec![
            entry(7, "LATE", query.clone()),
            entry(3, "EARLY", query.clone()),
            entry(5, "MIDDLE", query.clone()),
        ];

        let labels: Vec<_> = search(&query, &catalog, &SearchParams::default())
            .into_iter()
            .map(|m| m.label)
            .collect();
        assert_eq!(labels, vec!["EARLY", "MIDDLE", "LATE"]);
    }

    #[test]
    fn test_limit_truncates_and_order_is_non_increasing() {
        let query = base();
        let catalog: Vec<_> = (0..20)
            .map(|i| entry(i, &format!("SKU{}", i), flip_prefix(&query, i as usize)))
            .collect();
        let params = SearchParams {
            threshold: 0.7,
            limit: 5,
        };

        let results = search(&query, &catalog, &params);

        assert_eq!(results.len(), 5);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results.iter().all(|m| m.score > params.threshold));
    }

    #[test]
    fn test_unequal_length_entries_never_match() {
        let query = base();
        let short: Signature = "1001".parse().unwrap();
        let catalog = vec![entry(1, "OLD", short)];
        let params = SearchParams {
            threshold: 0.0,
            limit: 5,
        };

        assert!(search(&query, &catalog, &params).is_empty());
    }

    #[test]
    fn test_engine_keeps_shared_labels_and_dedup_collapses_them() {
        let query = base();
        let catalog = vec![
            entry(1, "SKU1", flip_prefix(&query, 4)),
            entry(2, "SKU2", flip_prefix(&query, 2)),
            entry(3, "SKU1", query.clone()),
        ];

        let results = search(&query, &catalog, &SearchParams::default());
        assert_eq!(results.len(), 3);

        let shown = dedup_by_label(results);
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].label, "SKU1");
        assert_eq!(shown[0].entry_id, 3);
        assert_eq!(shown[1].label, "SKU2");
    }

    #[test]
    fn test_score_bounds() {
        let a = base();
        let inverted = flip_prefix(&a, 256);
        assert_eq!(score(&a, &inverted), 0.0);
        assert_eq!(score(&a, &a), 1.0);
    }
}
