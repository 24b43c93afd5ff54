//! Integration tests for the `edges` subcommand.

use assert_cmd::Command;
use std::io::Write;
use tablegrid::{BBox, PageData, PaintOp, PathEvent};

fn cmd() -> Command {
    Command::cargo_bin("tablegrid").unwrap()
}

fn event(x0: f64, top: f64, x1: f64, bottom: f64, paint_op: PaintOp) -> PathEvent {
    PathEvent {
        bbox: BBox::new(x0, top, x1, bottom),
        paint_op,
        line_width: 1.0,
    }
}

fn write_temp_page(page: &PageData) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    f.write_all(serde_json::to_string(page).unwrap().as_bytes())
        .unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn edges_json_reports_merged_counts() {
    // Two overlapping strokes on one row, a filled box, and a curve-sized blob.
    let page = PageData::new(BBox::new(0.0, 0.0, 612.0, 792.0)).with_paths(vec![
        event(100.0, 100.0, 200.0, 101.0, PaintOp::Stroke),
        event(195.0, 100.5, 300.0, 101.5, PaintOp::Stroke),
        event(100.0, 200.0, 150.0, 240.0, PaintOp::Fill),
        event(400.0, 400.0, 450.0, 450.0, PaintOp::Stroke),
    ]);
    let f = write_temp_page(&page);

    let output = cmd()
        .args(["edges", f.path().to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let pages: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["page"], 1);
    assert_eq!(pages[0]["captured"], 6);
    // The two strokes join; the fill adds a top and a bottom edge.
    assert_eq!(pages[0]["horizontal"].as_array().unwrap().len(), 3);
    assert_eq!(pages[0]["vertical"].as_array().unwrap().len(), 2);
}

#[test]
fn edges_text_format_has_page_header() {
    let page = PageData::new(BBox::new(0.0, 0.0, 612.0, 792.0)).with_paths(vec![event(
        100.0,
        100.0,
        300.0,
        101.0,
        PaintOp::Stroke,
    )]);
    let f = write_temp_page(&page);

    let output = cmd()
        .args(["edges", f.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--- Page 1: 1 captured, 1 horizontal, 0 vertical ---"));
    assert!(stdout.contains("horizontal"));
}
