//! Overlays and redactions composed onto real pages.

use marisol::{Area, Collection, MarisolError, Overlay, Redaction, RedactionStyle};

use crate::common::{build_pdf, page_text};

fn letter_collection(pages: usize) -> Collection {
    let mut collection = Collection::new("ABC", 6, 1);
    collection
        .append_bytes(&build_pdf(pages, 612.0, 792.0), None)
        .unwrap();
    collection
}

#[test]
fn test_numbering_area_is_reserved() {
    let mut collection = letter_collection(1);
    let document = collection.get_mut(0).unwrap();

    let err = document
        .add_overlay(Overlay::text("NOPE", Area::BottomRight))
        .unwrap_err();
    assert!(matches!(err, MarisolError::AreaReserved { area: Area::BottomRight }));

    for area in [Area::TopLeft, Area::TopRight, Area::BottomLeft] {
        document.add_overlay(Overlay::text("OK", area)).unwrap();
    }
    assert_eq!(document.overlays().len(), 4);
}

#[test]
fn test_legend_on_every_page() {
    let mut collection = letter_collection(2);
    collection
        .add_overlay_to_all(Overlay::text("CONFIDENTIAL", Area::TopLeft))
        .unwrap();

    let bytes = collection.get(0).unwrap().to_bytes().unwrap();
    for index in 0..2 {
        assert!(page_text(&bytes, index).contains("CONFIDENTIAL"));
    }
}

#[test]
fn test_redaction_bounds_are_inclusive() {
    let mut collection = letter_collection(1);

    let err = collection
        .add_redaction("ABC000001", Redaction::new(0.0, 0.0, 613.0, 792.0))
        .unwrap_err();
    assert!(matches!(err, MarisolError::OutsideBoundaries { .. }));
    assert!(collection.get(0).unwrap().page(0).unwrap().redactions().is_empty());

    collection
        .add_redaction("ABC000001", Redaction::new(0.0, 0.0, 612.0, 792.0))
        .unwrap();
    assert_eq!(collection.get(0).unwrap().page(0).unwrap().redactions().len(), 1);
}

#[test]
fn test_redaction_is_drawn_after_overlays() {
    let mut collection = letter_collection(1);
    collection
        .add_redaction(
            "ABC000001",
            Redaction::new(100.0, 100.0, 200.0, 50.0)
                .with_text("PRIVILEGED")
                .with_style(RedactionStyle::Outline),
        )
        .unwrap();

    let bytes = collection.get(0).unwrap().to_bytes().unwrap();
    let text = page_text(&bytes, 0);
    let number = text.find("ABC000001").unwrap();
    let label = text.find("PRIVILEGED").unwrap();
    assert!(number < label);
    assert!(text.contains(" re"));
}

#[test]
fn test_unknown_page_size_fails_render() {
    let mut collection = Collection::new("ABC", 6, 1);
    collection
        .append_bytes(&build_pdf(1, 100.0, 100.0), None)
        .unwrap();

    let err = collection.get(0).unwrap().to_bytes().unwrap_err();
    assert!(matches!(err, MarisolError::UnknownPageSize { .. }));
}

#[test]
fn test_landscape_pages_are_recognised() {
    let mut collection = Collection::new("ABC", 6, 1);
    collection
        .append_bytes(&build_pdf(1, 842.0, 595.0), None)
        .unwrap();

    let page = collection.get(0).unwrap().page(0).unwrap();
    let (size, orientation) = page.size().unwrap();
    assert_eq!(size.name, "A4");
    assert_eq!(orientation, marisol::Orientation::Landscape);
}
