//! Numbering across documents loaded from disk.

use marisol::{Collection, bates};
use tempfile::TempDir;

use crate::common::{build_pdf, page_text, write_pdf};

#[tokio::test]
async fn test_two_documents_from_files() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 3);
    let b = write_pdf(dir.path(), "b.pdf", 3);

    let mut collection = Collection::new("ABC", 6, 1);
    collection.append_path(&a).await.unwrap();
    collection.append_path(&b).await.unwrap();

    let first = collection.get(0).unwrap();
    let second = collection.get(1).unwrap();
    assert_eq!(first.to_string(), "ABC000001 - ABC000003");
    assert_eq!(second.to_string(), "ABC000004 - ABC000006");
    assert_eq!(first.name(), Some("a"));
    assert_eq!(first.output_name(), "a_000001.pdf");
}

#[test]
fn test_fill_is_a_minimum() {
    let mut collection = Collection::new("X", 3, 99);
    collection
        .append_bytes(&build_pdf(2, 612.0, 792.0), None)
        .unwrap();

    let document = collection.get(0).unwrap();
    assert_eq!(document.begin(), "X099");
    assert_eq!(document.end(), "X100");
}

#[test]
fn test_starts_are_contiguous() {
    let counts = [4, 1, 7, 2, 3];
    let mut collection = Collection::new("C", 5, 20);
    for &pages in &counts {
        collection
            .append_bytes(&build_pdf(pages, 612.0, 792.0), None)
            .unwrap();
    }

    let expected = bates::document_starts(20, &counts);
    for (document, (&start, &pages)) in collection.iter().zip(expected.iter().zip(&counts)) {
        assert_eq!(document.start(), start);
        assert_eq!(document.end_number(), start + pages as u64 - 1);
    }
    assert_eq!(collection.next_start(), 20 + 17);
}

#[test]
fn test_every_page_carries_its_number() {
    let mut collection = Collection::new("ABC", 6, 1);
    collection
        .append_bytes(&build_pdf(2, 612.0, 792.0), None)
        .unwrap()
        .append_bytes(&build_pdf(2, 612.0, 792.0), None)
        .unwrap();

    let bytes = collection.get(1).unwrap().to_bytes().unwrap();
    let first = page_text(&bytes, 0);
    let second = page_text(&bytes, 1);

    assert!(first.contains("ABC000003"));
    assert!(second.contains("ABC000004"));
    assert!(first.contains("Page 1"), "original content is kept");
}

#[test]
fn test_rendering_is_deterministic() {
    let mut collection = Collection::new("ABC", 6, 1);
    collection
        .append_bytes(&build_pdf(3, 612.0, 792.0), None)
        .unwrap();
    let document = collection.get(0).unwrap();

    assert_eq!(document.to_bytes().unwrap(), document.to_bytes().unwrap());
}
