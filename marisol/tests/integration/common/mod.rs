//! Shared helpers for integration tests.
//!
//! PDFs are synthesised with lopdf so no binary fixtures are needed.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// A PDF with `pages` pages of `width` x `height` points.
///
/// The MediaBox and font resources live on the page tree root so pages
/// inherit them.
pub fn build_pdf(pages: usize, width: f32, height: f32) -> Vec<u8> {
    build(&vec![(width, height); pages], true)
}

/// A PDF with one page per entry of `sizes`, each with its own MediaBox.
pub fn build_pdf_with_sizes(sizes: &[(f32, f32)]) -> Vec<u8> {
    build(sizes, false)
}

fn build(sizes: &[(f32, f32)], inherit: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let media_box = |(w, h): (f32, f32)| {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(w),
            Object::Real(h),
        ])
    };

    let mut kids = Vec::with_capacity(sizes.len());
    for (i, &size) in sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(24)]),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(400)]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode test content"),
        ));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !inherit {
            page.set("MediaBox", media_box(size));
            page.set("Resources", resources_id);
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(sizes.len() as i64),
    };
    if inherit {
        let first = sizes.first().copied().unwrap_or((612.0, 792.0));
        pages.set("MediaBox", media_box(first));
        pages.set("Resources", resources_id);
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save test pdf");
    bytes
}

/// Write a `pages`-page Letter PDF named `name` into `dir`.
pub fn write_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages, 612.0, 792.0)).expect("write test pdf");
    path
}

/// Concatenated text of every content stream of page `index`.
pub fn page_text(bytes: &[u8], index: usize) -> String {
    let doc = Document::load_mem(bytes).expect("load output pdf");
    let page_id = doc
        .get_pages()
        .into_values()
        .nth(index)
        .expect("page exists");
    let content = doc.get_page_content(page_id).expect("page content");
    String::from_utf8_lossy(&content).into_owned()
}
