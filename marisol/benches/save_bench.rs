//! Performance benchmarks for marisol.
//!
//! Run with: cargo bench
//!
//! Documents are synthesised in memory, so no fixtures are needed.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use marisol::{Area, Collection, Overlay, Redaction, SaveOptions};
use tempfile::TempDir;

/// A Letter-sized PDF with `pages` pages of text.
fn letter_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = (0..pages)
        .map(|i| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 400.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {i}"))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn collection_of(documents: usize, pages: usize) -> Collection {
    let bytes = letter_pdf(pages);
    let mut collection = Collection::new("BENCH", 6, 1);
    for _ in 0..documents {
        collection.append_bytes(&bytes, None).unwrap();
    }
    collection
}

/// Benchmark: Append documents to a collection
fn bench_append(c: &mut Criterion) {
    let bytes = letter_pdf(10);

    c.bench_function("append_10_documents", |b| {
        b.iter(|| {
            let mut collection = Collection::new("BENCH", 6, 1);
            for _ in 0..10 {
                collection.append_bytes(black_box(&bytes), None).unwrap();
            }
            collection
        });
    });
}

/// Benchmark: Render one document with overlays and redactions
fn bench_render(c: &mut Criterion) {
    let mut collection = collection_of(1, 20);
    collection
        .add_overlay_to_all(Overlay::text("CONFIDENTIAL", Area::TopLeft))
        .unwrap();
    collection
        .add_redaction("BENCH000005", Redaction::new(72.0, 72.0, 200.0, 40.0).with_text("X"))
        .unwrap();
    let document = collection.get(0).unwrap();

    c.bench_function("render_20_pages", |b| {
        b.iter(|| black_box(document).to_bytes().unwrap());
    });
}

/// Benchmark: Save a collection with varying pool sizes
fn bench_save_all(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let collection = collection_of(50, 2);
    let mut group = c.benchmark_group("save_all_50_documents");
    group.sample_size(10);

    for threads in [1, 4, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{threads}_threads")),
            &threads,
            |b, &threads| {
                b.to_async(&rt).iter(|| async {
                    let dir = TempDir::new().unwrap();
                    let options = SaveOptions {
                        output_dir: dir.path().to_path_buf(),
                        threads,
                        ..SaveOptions::default()
                    };
                    let outcomes = collection.save_all(&options).await;
                    assert!(outcomes.iter().all(|o| o.is_success()));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_render, bench_save_all);

criterion_main!(benches);
