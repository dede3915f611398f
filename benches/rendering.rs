//! Benchmarks for document rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tern::document::{Block, Document, EditorState, default_document};
use tern::schema::render_document;

fn bench_default_document(c: &mut Criterion) {
    let state = EditorState::new(default_document().unwrap());

    c.bench_function("render_default_document", |b| {
        b.iter(|| render_document(black_box(&state), black_box(80)))
    });
}

fn bench_long_document(c: &mut Criterion) {
    let nodes = (0..500)
        .map(|i| match i % 4 {
            0 => Block::paragraph(&format!("Paragraph {i} with enough words to wrap across the line")),
            1 => Block::check_list_item(&format!("Task {i}"), i % 8 == 1),
            2 => Block::table(3, 3),
            _ => Block::image("http://x/img.png", 300, 200),
        })
        .collect();
    let state = EditorState::new(Document::new(nodes));

    c.bench_function("render_long_document", |b| {
        b.iter(|| render_document(black_box(&state), black_box(80)))
    });
}

criterion_group!(benches, bench_default_document, bench_long_document);
criterion_main!(benches);
