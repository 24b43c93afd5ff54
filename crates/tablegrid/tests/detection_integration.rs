//! End-to-end detection tests.
//!
//! Each test builds a page the way a renderer would report it (painted paths
//! plus structured text) and runs it through the public entry points.

use tablegrid::{
    BBox, DetectionSettings, Document, PageData, PaintOp, PathEvent, Strategy, TableBlock,
    TextBlock, TextChar, TextLine, TextPage, detect_tables, detect_with_report,
};

/// Helper: US letter page bounds.
fn letter() -> BBox {
    BBox::new(0.0, 0.0, 612.0, 792.0)
}

/// Helper: one line of text with a fixed advance of half the font size.
fn line(text: &str, x: f64, top: f64, size: f64) -> TextLine {
    let advance = size * 0.5;
    let chars = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let x0 = x + i as f64 * advance;
            TextChar::new(c, size, BBox::new(x0, top, x0 + advance, top + size))
        })
        .collect();
    TextLine::from_chars(chars).unwrap()
}

/// Helper: wrap lines into a single-block text page.
fn text_page(lines: Vec<TextLine>) -> TextPage {
    TextPage::new(TextBlock::from_lines(lines).into_iter().collect())
}

/// Helper: a thin stroked line.
fn stroke(x0: f64, top: f64, x1: f64, bottom: f64) -> PathEvent {
    PathEvent {
        bbox: BBox::new(x0, top, x1, bottom),
        paint_op: PaintOp::Stroke,
        line_width: 0.5,
    }
}

/// Helper: a filled rectangle.
fn fill(x0: f64, top: f64, x1: f64, bottom: f64) -> PathEvent {
    PathEvent {
        bbox: BBox::new(x0, top, x1, bottom),
        paint_op: PaintOp::Fill,
        line_width: 0.0,
    }
}

/// Rulings for a grid with the given column and row boundaries.
fn ruled(xs: &[f64], ys: &[f64]) -> Vec<PathEvent> {
    let (x0, x1) = (xs[0], xs[xs.len() - 1]);
    let (y0, y1) = (ys[0], ys[ys.len() - 1]);
    let mut paths: Vec<PathEvent> = ys.iter().map(|&y| stroke(x0, y, x1, y + 0.5)).collect();
    paths.extend(xs.iter().map(|&x| stroke(x, y0, x + 0.5, y1)));
    paths
}

fn price_list_text() -> TextPage {
    text_page(vec![
        line("Item", 110.0, 108.0, 10.0),
        line("Price", 260.0, 108.0, 10.0),
        line("Tea", 110.0, 138.0, 10.0),
        line("3.50", 260.0, 138.0, 10.0),
        line("Cake", 110.0, 168.0, 10.0),
        line("4.00", 260.0, 168.0, 10.0),
    ])
}

#[test]
fn ruled_grid_yields_three_by_two_table() {
    // 4 horizontal and 3 vertical rulings.
    let page = PageData::new(letter())
        .with_paths(ruled(&[100.0, 250.0, 400.0], &[100.0, 130.0, 160.0, 190.0]))
        .with_text(price_list_text());

    let tables = detect_tables(&page);
    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.strategy, Strategy::Grid);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_count(), 2);
    assert_eq!(
        table.text_grid(),
        vec![
            vec![Some("Item".to_string()), Some("Price".to_string())],
            vec![Some("Tea".to_string()), Some("3.50".to_string())],
            vec![Some("Cake".to_string()), Some("4.00".to_string())],
        ]
    );
}

#[test]
fn ruled_grid_without_text_is_kept() {
    let page = PageData::new(letter())
        .with_paths(ruled(&[100.0, 250.0, 400.0], &[100.0, 130.0, 160.0, 190.0]));
    let tables = detect_tables(&page);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].row_count(), 3);
    assert_eq!(tables[0].column_count(), 2);
}

#[test]
fn filled_cell_backgrounds_form_a_grid() {
    let mut paths = Vec::new();
    for (top, bottom) in [(100.0, 130.0), (130.0, 160.0), (160.0, 190.0)] {
        paths.push(fill(100.0, top, 250.0, bottom));
        paths.push(fill(250.0, top, 400.0, bottom));
    }
    let page = PageData::new(letter())
        .with_paths(paths)
        .with_text(price_list_text());

    let tables = detect_tables(&page);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].row_count(), 3);
    assert_eq!(tables[0].column_count(), 2);
    assert_eq!(tables[0].rows[1].cells[1].text.as_deref(), Some("3.50"));
}

#[test]
fn page_frame_is_not_a_table() {
    // A border around the whole page, split into two halves.
    let page = PageData::new(letter()).with_paths(ruled(
        &[10.0, 306.0, 602.0],
        &[10.0, 150.0, 300.0, 450.0, 600.0, 782.0],
    ));
    let (tables, report) = detect_with_report(&page, &DetectionSettings::default()).unwrap();
    assert!(tables.is_empty());
    assert_eq!(report.winner, None);
}

#[test]
fn horizontal_rules_fall_back_to_divider_table() {
    let paths = [100.0, 130.0, 160.0, 190.0]
        .iter()
        .map(|&y| stroke(100.0, y, 400.0, y + 0.5))
        .collect();
    let page = PageData::new(letter())
        .with_paths(paths)
        .with_text(price_list_text());

    let (tables, report) = detect_with_report(&page, &DetectionSettings::default()).unwrap();
    assert_eq!(report.attempted, vec![Strategy::Grid, Strategy::HorizontalDividers]);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].strategy, Strategy::HorizontalDividers);
    assert_eq!(tables[0].row_count(), 3);
    assert_eq!(tables[0].column_count(), 2);
    assert_eq!(tables[0].rows[2].cells[0].text.as_deref(), Some("Cake"));
}

#[test]
fn key_value_text_becomes_two_column_table() {
    let pairs = [
        ("Name", "Ada Lovelace, Countess of Lovelace"),
        ("Born", "10 December 1815, London"),
        ("Known for", "Notes on the Analytical Engine"),
        ("Spouse", "William King-Noel"),
    ];
    let mut lines = Vec::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        let top = 100.0 + i as f64 * 20.0;
        lines.push(line(key, 72.0, top, 10.0));
        lines.push(line(value, 272.0, top, 10.0));
    }
    let page = PageData::new(letter()).with_text(text_page(lines));

    let (tables, report) = detect_with_report(&page, &DetectionSettings::default()).unwrap();
    assert_eq!(report.winner, Some(Strategy::TwoColumn));
    assert_eq!(report.attempted.len(), 3);
    assert_eq!(tables.len(), 1);

    let table = &tables[0];
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.column_count(), 2);
    let left: f64 = table.rows.iter().filter_map(|r| r.cells[0].bbox).map(|b| b.width()).sum();
    let right: f64 = table.rows.iter().filter_map(|r| r.cells[1].bbox).map(|b| b.width()).sum();
    assert!(right >= left * 1.2);
    assert_eq!(table.rows[0].cells[0].text.as_deref(), Some("Name"));
    assert_eq!(table.rows[3].cells[1].text.as_deref(), Some("William King-Noel"));
}

#[test]
fn prose_page_has_no_tables() {
    let lines = (0..12)
        .map(|i| {
            line(
                "The quick brown fox jumps over the lazy dog again and again.",
                72.0,
                100.0 + i as f64 * 14.0,
                10.0,
            )
        })
        .collect();
    let page = PageData::new(letter()).with_text(text_page(lines));
    assert!(detect_tables(&page).is_empty());
}

#[test]
fn table_block_summarizes_detected_table() {
    let page = PageData::new(letter())
        .with_paths(ruled(&[100.0, 250.0, 400.0], &[100.0, 130.0, 160.0, 190.0]))
        .with_text(price_list_text());
    let table = detect_tables(&page).remove(0);
    let block = TableBlock::from(table);
    assert_eq!(block.row_count, 3);
    assert_eq!(block.column_count, 2);
    assert_eq!(block.cell_count, 6);
    assert_eq!(block.column_consistency, 1.0);
    assert_eq!(block.confidence, 1.0);
}

#[test]
fn markdown_rendering_of_detected_table() {
    let page = PageData::new(letter())
        .with_paths(ruled(&[100.0, 250.0, 400.0], &[100.0, 130.0, 160.0, 190.0]))
        .with_text(price_list_text());
    let md = detect_tables(&page)[0].to_markdown();
    assert!(md.starts_with("| Item | Price |\n"));
    assert!(md.contains("| Cake | 4.00 |"));
}

#[test]
fn document_detects_each_page() {
    let ruled_page = PageData::new(letter())
        .with_paths(ruled(&[100.0, 250.0, 400.0], &[100.0, 130.0, 160.0, 190.0]));
    let blank = PageData::new(letter());
    let doc = Document::new(vec![ruled_page.clone(), blank, ruled_page]);
    let counts: Vec<usize> = doc.detect_all().iter().map(Vec::len).collect();
    assert_eq!(counts, vec![1, 0, 1]);
}
