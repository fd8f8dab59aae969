//! Concurrent saving of whole collections.

use marisol::{Collection, SaveOptions};
use std::path::Path;
use tempfile::TempDir;

use crate::common::{build_pdf, build_pdf_with_sizes};

fn options(dir: &Path) -> SaveOptions {
    SaveOptions {
        output_dir: dir.to_path_buf(),
        threads: 3,
        ..SaveOptions::default()
    }
}

fn five_documents() -> Collection {
    let mut collection = Collection::new("ABC", 6, 1);
    for pages in [2, 1, 3, 1, 2] {
        collection
            .append_bytes(&build_pdf(pages, 612.0, 792.0), None)
            .unwrap();
    }
    collection
}

#[tokio::test]
async fn test_collision_is_isolated() {
    let dir = TempDir::new().unwrap();
    let collection = five_documents();

    // Third document starts at 4.
    let existing = dir.path().join("ABC000004.pdf");
    std::fs::write(&existing, b"keep me").unwrap();

    let outcomes = collection.save_all(&options(dir.path())).await;

    assert_eq!(outcomes.len(), 5);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.index, i);
        if i == 2 {
            assert!(outcome.is_collision());
        } else {
            assert!(outcome.is_success(), "{i}: {:?}", outcome.result);
        }
    }
    assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
}

#[tokio::test]
async fn test_overwrite_replaces_existing() {
    let dir = TempDir::new().unwrap();
    let collection = five_documents();
    std::fs::write(dir.path().join("ABC000004.pdf"), b"old").unwrap();

    let opts = SaveOptions {
        overwrite: true,
        ..options(dir.path())
    };
    let (outcomes, stats) = collection.save_all_with_stats(&opts).await;

    assert!(outcomes.iter().all(|o| o.is_success()));
    assert_eq!(stats.success_count, 5);
    assert_eq!(stats.total_pages, 9);
    let written = std::fs::read(dir.path().join("ABC000004.pdf")).unwrap();
    assert!(written.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_single_thread_pool() {
    let dir = TempDir::new().unwrap();
    let collection = five_documents();

    let opts = SaveOptions {
        threads: 1,
        ..options(dir.path())
    };
    let outcomes = collection.save_all(&opts).await;
    assert!(outcomes.iter().all(|o| o.is_success()));
}

#[tokio::test]
async fn test_failed_document_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut collection = Collection::new("ABC", 6, 1);
    collection
        .append_bytes(&build_pdf_with_sizes(&[(612.0, 792.0), (50.0, 50.0)]), None)
        .unwrap()
        .append_bytes(&build_pdf(1, 612.0, 792.0), None)
        .unwrap();

    let (outcomes, stats) = collection.save_all_with_stats(&options(dir.path())).await;

    assert_eq!(outcomes[0].label(), "UNKNOWN_PAGE_SIZE");
    assert!(!dir.path().join("ABC000001.pdf").exists());
    assert!(outcomes[1].is_success());
    assert_eq!(stats.failure_count, 1);
    assert_eq!(stats.collision_count, 0);
}

#[tokio::test]
async fn test_empty_collection() {
    let dir = TempDir::new().unwrap();
    let collection = Collection::new("ABC", 6, 1);
    assert!(collection.save_all(&options(dir.path())).await.is_empty());
}
