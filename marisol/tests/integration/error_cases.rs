//! Integration tests for error handling and edge cases.

use marisol::{Collection, MarisolError};
use tempfile::TempDir;

#[tokio::test]
async fn test_error_nonexistent_input() {
    let mut collection = Collection::new("ABC", 6, 1);
    let err = collection
        .append_path("/nonexistent/file.pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, MarisolError::FileNotFound { .. }));
}

#[tokio::test]
async fn test_error_directory_input() {
    let dir = TempDir::new().unwrap();
    let mut collection = Collection::new("ABC", 6, 1);
    let err = collection.append_path(dir.path()).await.unwrap_err();
    assert!(matches!(err, MarisolError::NotAFile { .. }));
}

#[tokio::test]
async fn test_error_not_a_pdf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    let mut collection = Collection::new("ABC", 6, 1);
    let err = collection.append_path(&path).await.unwrap_err();
    assert!(matches!(err, MarisolError::FailedToLoadPdf { .. }));
    assert_eq!(collection.next_start(), 1);
}

#[test]
fn test_error_unknown_bates_number() {
    let mut collection = Collection::new("ABC", 6, 1);
    let err = collection
        .add_redaction("ABC000001", marisol::Redaction::new(0.0, 0.0, 1.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, MarisolError::Other { .. }));
}
