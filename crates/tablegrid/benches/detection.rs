//! Performance benchmarks for tablegrid.
//!
//! Benchmarks cover the detection pipeline on synthetic pages:
//! - Lattice: ruled grids of increasing size with text in every cell
//! - Two-column: key/value text with no rulings (full fallback chain)
//! - Document: 10 mixed pages, sequential and (with `parallel`) rayon

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tablegrid::{
    BBox, Document, PageData, PaintOp, PathEvent, TextBlock, TextChar, TextLine, TextPage,
    detect_tables,
};

// ---------------------------------------------------------------------------
// Page fixture generators
// ---------------------------------------------------------------------------

fn letter() -> BBox {
    BBox::new(0.0, 0.0, 612.0, 792.0)
}

fn text_line(text: &str, x: f64, top: f64, size: f64) -> Option<TextLine> {
    let advance = size * 0.5;
    let chars = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let x0 = x + i as f64 * advance;
            TextChar::new(c, size, BBox::new(x0, top, x0 + advance, top + size))
        })
        .collect();
    TextLine::from_chars(chars)
}

fn stroke(x0: f64, top: f64, x1: f64, bottom: f64) -> PathEvent {
    PathEvent {
        bbox: BBox::new(x0, top, x1, bottom),
        paint_op: PaintOp::Stroke,
        line_width: 0.5,
    }
}

/// A `rows x cols` ruled grid at (72, 150) with cells 80pt wide, 20pt tall.
fn lattice_page(rows: usize, cols: usize) -> PageData {
    let (x_start, y_start, cell_w, cell_h) = (72.0, 150.0, 80.0, 20.0);
    let table_w = cols as f64 * cell_w;
    let table_h = rows as f64 * cell_h;

    let mut paths = Vec::new();
    for r in 0..=rows {
        let y = y_start + r as f64 * cell_h;
        paths.push(stroke(x_start, y, x_start + table_w, y + 0.5));
    }
    for c in 0..=cols {
        let x = x_start + c as f64 * cell_w;
        paths.push(stroke(x, y_start, x + 0.5, y_start + table_h));
    }

    let mut lines = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let x = x_start + c as f64 * cell_w + 4.0;
            let y = y_start + r as f64 * cell_h + 6.0;
            lines.extend(text_line(&format!("R{}C{}", r + 1, c + 1), x, y, 8.0));
        }
    }

    PageData::new(letter())
        .with_paths(paths)
        .with_text(TextPage::new(TextBlock::from_lines(lines).into_iter().collect()))
}

/// Key/value text: labels at x=72, values 200pt to the right.
fn two_column_page(rows: usize) -> PageData {
    let mut lines = Vec::new();
    for r in 0..rows {
        let top = 100.0 + r as f64 * 16.0;
        let label = text_line(&format!("Field {}", r + 1), 72.0, top, 10.0);
        let value = text_line(&format!("Value number {}", r + 1), 272.0, top, 10.0);
        if let (Some(label), Some(value)) = (label, value) {
            let mut chars = label.chars;
            chars.extend(value.chars);
            lines.extend(TextLine::from_chars(chars));
        }
    }
    PageData::new(letter()).with_text(TextPage::new(TextBlock::from_lines(lines).into_iter().collect()))
}

fn mixed_document() -> Document {
    let pages = (0..10)
        .map(|i| {
            if i % 2 == 0 {
                lattice_page(10, 5)
            } else {
                two_column_page(20)
            }
        })
        .collect();
    Document::new(pages)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice");

    for (name, rows, cols) in [("5x3", 5, 3), ("20x5", 20, 5), ("30x7", 30, 7)] {
        let page = lattice_page(rows, cols);
        group.bench_function(name, |b| {
            b.iter(|| black_box(detect_tables(black_box(&page)).len()));
        });
    }

    group.finish();
}

fn bench_two_column(c: &mut Criterion) {
    let page = two_column_page(25);
    c.bench_function("two_column_25rows", |b| {
        b.iter(|| black_box(detect_tables(black_box(&page)).len()));
    });
}

fn bench_document(c: &mut Criterion) {
    let doc = mixed_document();
    let mut group = c.benchmark_group("document");

    group.bench_function("sequential_10page", |b| {
        b.iter(|| black_box(doc.detect_all().len()));
    });

    #[cfg(feature = "parallel")]
    group.bench_function("parallel_10page", |b| {
        b.iter(|| black_box(doc.detect_all_parallel().len()));
    });

    group.finish();
}

criterion_group!(benches, bench_lattice, bench_two_column, bench_document);
criterion_main!(benches);
