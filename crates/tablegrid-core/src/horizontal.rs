//! Tables bounded by horizontal rules only.
//!
//! Many reports separate rows with horizontal lines and leave out vertical
//! rulings. Rows come from the rules; columns are inferred from where text
//! runs start inside the ruled area.

use tracing::debug;

use crate::edges::Edge;
use crate::geometry::BBox;
use crate::settings::{DetectionSettings, Strategy};
use crate::table::{Table, TableCell, TableRow};
use crate::text::TextPage;

/// Upper bound on inferred columns.
pub const MAX_COLUMNS: usize = 32;

/// Minimum gap (page units) that starts a new column.
const MIN_COLUMN_GAP: f64 = 15.0;

/// Sorted, de-duplicated y positions of horizontal rules.
fn divider_positions(h_edges: &[Edge], tolerance: f64) -> Vec<f64> {
    let mut ys: Vec<f64> = h_edges.iter().map(|e| e.top).collect();
    ys.sort_by(f64::total_cmp);
    let mut out: Vec<f64> = Vec::with_capacity(ys.len());
    for y in ys {
        match out.last() {
            Some(&last) if (y - last).abs() < tolerance => {}
            _ => out.push(y),
        }
    }
    out
}

/// Return the index of the column at `x`, adding one if none is within `tolerance`.
fn find_or_add_column(columns: &mut Vec<f64>, x: f64, tolerance: f64) -> Option<usize> {
    if let Some(i) = columns.iter().position(|c| (c - x).abs() <= tolerance) {
        return Some(i);
    }
    if columns.len() >= MAX_COLUMNS {
        return None;
    }
    columns.push(x);
    Some(columns.len() - 1)
}

/// Column start positions from text runs inside `top..bottom`.
fn infer_columns(text: &TextPage, top: f64, bottom: f64, gap_multiplier: f64) -> Vec<f64> {
    let mut columns = Vec::new();
    let mut lines = 0usize;

    for line in text.lines() {
        if line.bbox.top < top || line.bbox.bottom > bottom {
            continue;
        }
        lines += 1;

        let mut prev_x1: Option<f64> = None;
        for ch in &line.chars {
            if ch.c == '\0' {
                continue;
            }
            let tolerance = (ch.size * 0.5).max(3.0);
            let column_gap = (tolerance * 2.0).max(MIN_COLUMN_GAP) * gap_multiplier;
            let starts_run = match prev_x1 {
                None => true,
                Some(px) => (ch.bbox.x0 - px).abs() > column_gap,
            };
            if starts_run && !ch.is_whitespace() {
                find_or_add_column(&mut columns, ch.bbox.x0, tolerance);
            }
            prev_x1 = Some(ch.bbox.x1);
        }
    }

    columns.sort_by(f64::total_cmp);
    debug!(lines, columns = columns.len(), "inferred text columns");
    columns
}

/// Build one table from horizontal rules and text-inferred columns.
///
/// Requires at least `min_dividers` distinct rule positions (so at least two
/// rows) and two inferred columns. The table spans the horizontal extent of
/// the rules; each row lies between consecutive rules and each column runs
/// from its text start to the next column's start.
pub fn find_horizontal_divider_table(
    h_edges: &[Edge],
    text: &TextPage,
    settings: &DetectionSettings,
) -> Option<Table> {
    if h_edges.len() < 2 {
        debug!(edges = h_edges.len(), "not enough horizontal edges");
        return None;
    }

    let ys = divider_positions(h_edges, settings.divider_merge_tolerance);
    if ys.len() < settings.min_dividers.max(2) {
        debug!(dividers = ys.len(), "not enough row boundaries");
        return None;
    }

    let x0 = h_edges.iter().map(|e| e.x0).fold(f64::INFINITY, f64::min);
    let x1 = h_edges.iter().map(|e| e.x1).fold(f64::NEG_INFINITY, f64::max);
    let (top, bottom) = (ys[0], ys[ys.len() - 1]);

    let columns = infer_columns(text, top, bottom, settings.column_gap_multiplier);
    if columns.len() < 2 {
        debug!(columns = columns.len(), "not enough text columns");
        return None;
    }

    let rows = ys
        .windows(2)
        .map(|w| {
            let (row_top, row_bottom) = (w[0], w[1]);
            let cells = columns
                .iter()
                .enumerate()
                .map(|(c, &start)| {
                    let cell_x0 = if c == 0 { x0.min(start) } else { start };
                    let cell_x1 = columns.get(c + 1).copied().unwrap_or(x1);
                    TableCell::new(BBox::new(cell_x0, row_top, cell_x1, row_bottom))
                })
                .collect();
            TableRow {
                cells,
                bbox: BBox::new(x0, row_top, x1, row_bottom),
            }
        })
        .collect();

    debug!(
        rows = ys.len() - 1,
        columns = columns.len(),
        "built horizontal-divider table"
    );
    Some(Table {
        rows,
        bbox: BBox::new(x0, top, x1, bottom),
        strategy: Strategy::HorizontalDividers,
    })
}
