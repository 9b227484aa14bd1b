//! End-to-end tests for the orchestrator: operator ingestion, customer
//! search, and catalog browsing over an in-memory catalog.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, Luma};
use lookbook_core::{
    average_hash, CatalogEntry, CatalogStore, Lookbook, LookbookError, MemoryCatalog,
    OperatorAllowList, PhotoRef, Response, ResponseKind, SearchParams, SenderId, SessionState,
    Signature,
};

const OPERATOR: &str = "1382280046";
const CUSTOMER: &str = "555";

/// 64×64 grayscale PNG whose bright cells are chosen by `pattern(x, y)`.
fn png(pattern: impl Fn(u32, u32) -> bool) -> Vec<u8> {
    let img = ImageBuffer::from_fn(64, 64, |x, y| {
        if pattern(x, y) {
            Luma([230u8])
        } else {
            Luma([20u8])
        }
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("PNG encoding failed");
    buffer.into_inner()
}

fn left_half() -> Vec<u8> {
    png(|x, _| x < 32)
}

fn top_half() -> Vec<u8> {
    png(|_, y| y < 32)
}

fn lookbook_with(store: Arc<dyn CatalogStore>) -> Lookbook {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Lookbook::new(store, Arc::new(OperatorAllowList::single(OPERATOR)))
}

fn operator() -> SenderId {
    SenderId::new(OPERATOR)
}

fn customer() -> SenderId {
    SenderId::new(CUSTOMER)
}

/// Catalog whose medium is permanently unavailable.
struct BrokenCatalog;

#[async_trait]
impl CatalogStore for BrokenCatalog {
    async fn append(&self, _: &str, _: &Signature, _: &PhotoRef) -> lookbook_core::Result<CatalogEntry> {
        Err(LookbookError::Storage("disk on fire".into()))
    }

    async fn all_entries(&self) -> lookbook_core::Result<Vec<CatalogEntry>> {
        Err(LookbookError::Storage("disk on fire".into()))
    }

    async fn entries_by_label(&self, _: &str) -> lookbook_core::Result<Vec<PhotoRef>> {
        Err(LookbookError::Storage("disk on fire".into()))
    }

    async fn distinct_labels(&self) -> lookbook_core::Result<BTreeSet<String>> {
        Err(LookbookError::Storage("disk on fire".into()))
    }

    async fn count(&self) -> lookbook_core::Result<usize> {
        Err(LookbookError::Storage("disk on fire".into()))
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

// ============================================================================
// Ingestion
// ============================================================================

#[tokio::test]
async fn test_operator_photo_then_label_creates_one_entry() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());
    let photo = left_half();

    let response = lookbook
        .handle_image(&operator(), &photo, PhotoRef::new("file-a"))
        .await;
    assert_eq!(response, Response::IngestPrompt { replaced: false });
    assert_eq!(lookbook.sessions().state(&operator()), SessionState::AwaitingLabel);

    let response = lookbook.handle_text(&operator(), "X").await;
    let Response::Ingested { entry } = response else {
        panic!("expected Ingested, got {:?}", response);
    };
    assert_eq!(entry.label, "X");
    assert_eq!(entry.signature, average_hash(&photo).unwrap());
    assert_eq!(entry.photo_ref, PhotoRef::new("file-a"));

    let all = store.all_entries().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(lookbook.sessions().state(&operator()), SessionState::Idle);
}

#[tokio::test]
async fn test_second_photo_replaces_first() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());

    lookbook
        .handle_image(&operator(), &left_half(), PhotoRef::new("a"))
        .await;
    let response = lookbook
        .handle_image(&operator(), &top_half(), PhotoRef::new("b"))
        .await;
    assert_eq!(response, Response::IngestPrompt { replaced: true });

    let Response::Ingested { entry } = lookbook.handle_text(&operator(), "X").await else {
        panic!("expected Ingested");
    };
    assert_eq!(entry.photo_ref, PhotoRef::new("b"));
    assert_eq!(entry.signature, average_hash(&top_half()).unwrap());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_blank_label_discards_pending_photo() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());

    lookbook
        .handle_image(&operator(), &left_half(), PhotoRef::new("a"))
        .await;
    let response = lookbook.handle_text(&operator(), "   ").await;

    assert_eq!(response, Response::LabelDiscarded);
    assert_eq!(response.kind(), ResponseKind::LabelDiscarded);
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(lookbook.sessions().state(&operator()), SessionState::Idle);
}

#[tokio::test]
async fn test_operator_decode_failure_keeps_state() {
    let lookbook = lookbook_with(Arc::new(MemoryCatalog::new()));

    let response = lookbook
        .handle_image(&operator(), b"not an image", PhotoRef::new("junk"))
        .await;
    assert_eq!(response.kind(), ResponseKind::DecodeError);
    assert_eq!(response.message().as_deref(), Some("Could not process image."));
    assert_eq!(lookbook.sessions().state(&operator()), SessionState::Idle);

    // An earlier pending photo survives a later undecodable one.
    lookbook
        .handle_image(&operator(), &left_half(), PhotoRef::new("good"))
        .await;
    lookbook
        .handle_image(&operator(), b"still not an image", PhotoRef::new("junk"))
        .await;
    let Response::Ingested { entry } = lookbook.handle_text(&operator(), "SKU").await else {
        panic!("expected Ingested");
    };
    assert_eq!(entry.photo_ref, PhotoRef::new("good"));
}

#[tokio::test]
async fn test_storage_failure_clears_pending_slot() {
    let lookbook = lookbook_with(Arc::new(BrokenCatalog));

    lookbook
        .handle_image(&operator(), &left_half(), PhotoRef::new("a"))
        .await;
    let response = lookbook.handle_text(&operator(), "SKU1").await;

    assert_eq!(response.kind(), ResponseKind::StorageFailed);
    assert_eq!(lookbook.sessions().state(&operator()), SessionState::Idle);
    assert_eq!(
        lookbook.handle_text(&operator(), "SKU1").await,
        Response::NotApplicable
    );
}

#[tokio::test]
async fn test_text_without_session_is_not_applicable() {
    let lookbook = lookbook_with(Arc::new(MemoryCatalog::new()));

    assert_eq!(
        lookbook.handle_text(&operator(), "hello").await,
        Response::NotApplicable
    );
    assert_eq!(
        lookbook.handle_text(&customer(), "SKU1").await,
        Response::NotApplicable
    );
    assert_eq!(Response::NotApplicable.message(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operators_never_cross_contaminate() {
    let store = Arc::new(MemoryCatalog::new());
    let operators: Vec<String> = (0..16).map(|i| format!("op-{}", i)).collect();
    let lookbook = Arc::new(Lookbook::new(
        store.clone(),
        Arc::new(OperatorAllowList::new(operators.clone())),
    ));

    let tasks: Vec<_> = operators
        .into_iter()
        .enumerate()
        .map(|(i, op)| {
            let lookbook = lookbook.clone();
            tokio::spawn(async move {
                let sender = SenderId::new(op.clone());
                let photo = if i % 2 == 0 { left_half() } else { top_half() };
                lookbook
                    .handle_image(&sender, &photo, PhotoRef::new(format!("{}-photo", op)))
                    .await;
                tokio::task::yield_now().await;
                lookbook.handle_text(&sender, &format!("{}-label", op)).await
            })
        })
        .collect();

    for task in tasks {
        let response = task.await.unwrap();
        let Response::Ingested { entry } = response else {
            panic!("expected Ingested, got {:?}", response);
        };
        let owner = entry.label.trim_end_matches("-label");
        assert_eq!(entry.photo_ref, PhotoRef::new(format!("{}-photo", owner)));
    }

    assert_eq!(store.count().await.unwrap(), 16);
    assert_eq!(lookbook.sessions().pending_count(), 0);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_customer_photo_finds_registered_article() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());

    lookbook
        .handle_image(&operator(), &left_half(), PhotoRef::new("left"))
        .await;
    lookbook.handle_text(&operator(), "SKU-LEFT").await;
    lookbook
        .handle_image(&operator(), &top_half(), PhotoRef::new("top"))
        .await;
    lookbook.handle_text(&operator(), "SKU-TOP").await;

    let response = lookbook
        .handle_image(&customer(), &left_half(), PhotoRef::new("query"))
        .await;
    let Response::SearchResults { matches } = &response else {
        panic!("expected SearchResults, got {:?}", response);
    };
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].label, "SKU-LEFT");
    assert_eq!(matches[0].photo_ref, PhotoRef::new("left"));
    assert_eq!(matches[0].score, 1.0);
    assert_eq!(
        response.message().as_deref(),
        Some("Found:\n1. SKU-LEFT (100.0%)")
    );
}

#[tokio::test]
async fn test_results_are_deduplicated_by_label() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());
    let sig = average_hash(&left_half()).unwrap();

    store.append("SKU1", &sig, &PhotoRef::new("v1")).await.unwrap();
    store.append("SKU1", &sig, &PhotoRef::new("v2")).await.unwrap();
    store.append("SKU2", &sig, &PhotoRef::new("v3")).await.unwrap();

    let raw = lookbook.find_similar(&sig).await.unwrap();
    assert_eq!(raw.len(), 3);

    let response = lookbook
        .handle_image(&customer(), &left_half(), PhotoRef::new("q"))
        .await;
    let Response::SearchResults { matches } = &response else {
        panic!("expected SearchResults, got {:?}", response);
    };
    let shown: Vec<_> = matches.iter().map(|m| (m.label.as_str(), m.photo_ref.as_str())).collect();
    assert_eq!(shown, vec![("SKU1", "v1"), ("SKU2", "v3")]);

    // Rows are numbered as shown, with no gap for the hidden duplicate
    assert_eq!(
        response.message().as_deref(),
        Some("Found:\n1. SKU1 (100.0%)\n2. SKU2 (100.0%)")
    );
}

#[tokio::test]
async fn test_near_duplicate_ranks_below_exact_match() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());

    let h1 = Signature::from_bits((0..256).map(|i| (i * 7) % 5 < 2));
    let h2 = Signature::from_bits(h1.iter().enumerate().map(|(i, b)| if i % 25 == 0 && i < 250 { !b } else { b }));
    assert_eq!(h1.hamming_distance(&h2), Some(10));

    store.append("SKU2", &h2, &PhotoRef::new("p2")).await.unwrap();
    store.append("SKU1", &h1, &PhotoRef::new("p1")).await.unwrap();

    let matches = lookbook.find_similar(&h1).await.unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].label, "SKU1");
    assert_eq!(matches[0].score, 1.0);
    assert_eq!(matches[1].label, "SKU2");
    assert_eq!(matches[1].score, 246.0 / 256.0);
}

#[tokio::test]
async fn test_distant_signature_finds_nothing() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());

    let stored = Signature::from_bits((0..256).map(|i| i % 2 == 0));
    // 100 of 256 positions agree
    let query = Signature::from_bits(stored.iter().enumerate().map(|(i, b)| if i < 156 { !b } else { b }));
    store.append("SKU1", &stored, &PhotoRef::new("p1")).await.unwrap();

    assert!(lookbook.find_similar(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_catalog_reports_no_matches() {
    let lookbook = lookbook_with(Arc::new(MemoryCatalog::new()));

    let response = lookbook
        .handle_image(&customer(), &left_half(), PhotoRef::new("q"))
        .await;
    assert_eq!(response, Response::NoMatches);
    assert_eq!(response.message().as_deref(), Some("No similar items found."));
}

#[tokio::test]
async fn test_custom_search_params_are_honoured() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone()).with_search_params(SearchParams {
        threshold: 0.0,
        limit: 1,
    });

    store
        .append("A", &average_hash(&left_half()).unwrap(), &PhotoRef::new("a"))
        .await
        .unwrap();
    store
        .append("B", &average_hash(&top_half()).unwrap(), &PhotoRef::new("b"))
        .await
        .unwrap();

    let matches = lookbook
        .find_similar(&average_hash(&top_half()).unwrap())
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].label, "B");
}

#[tokio::test]
async fn test_search_storage_failure_is_reported() {
    let lookbook = lookbook_with(Arc::new(BrokenCatalog));

    let response = lookbook
        .handle_image(&customer(), &left_half(), PhotoRef::new("q"))
        .await;
    assert_eq!(response.kind(), ResponseKind::StorageFailed);
}

// ============================================================================
// Browsing
// ============================================================================

#[tokio::test]
async fn test_list_articles_is_sorted_and_distinct() {
    let store = Arc::new(MemoryCatalog::new());
    let lookbook = lookbook_with(store.clone());
    let sig = average_hash(&left_half()).unwrap();

    for (label, photo) in [("B", "b1"), ("A", "a1"), ("A", "a2")] {
        store.append(label, &sig, &PhotoRef::new(photo)).await.unwrap();
    }

    assert_eq!(lookbook.list_articles().await.unwrap(), vec!["A", "B"]);
    assert_eq!(
        lookbook.list_by_article("A").await.unwrap(),
        vec![PhotoRef::new("a1"), PhotoRef::new("a2")]
    );
    assert!(lookbook.list_by_article("Z").await.unwrap().is_empty());
}
