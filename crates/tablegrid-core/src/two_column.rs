//! Two-column table synthesis from text layout.
//!
//! Key/value tables are often typeset without any rulings: a short label on
//! the left, a longer value on the right, repeated down the page. This
//! strategy recovers them purely from line geometry.

use tracing::debug;

use crate::geometry::{BBox, float_key};
use crate::settings::{DetectionSettings, Strategy};
use crate::table::{Table, TableCell, TableRow, union_all};
use crate::text::{TextLine, TextPage};

/// A contiguous glyph run inside a line.
#[derive(Debug, Clone, Copy)]
struct Run {
    bbox: BBox,
    visible: bool,
}

/// A line reduced to at most two runs.
#[derive(Debug, Clone)]
struct LineGeom {
    bbox: BBox,
    runs: Vec<Run>,
    /// Midpoint between the two runs, for two-run lines.
    split_x: Option<f64>,
}

impl LineGeom {
    fn is_aligned_pair(&self) -> bool {
        self.runs.len() == 2 && self.runs.iter().all(|r| r.visible)
    }

    fn is_visible(&self) -> bool {
        self.runs.iter().any(|r| r.visible)
    }
}

/// Split a line into runs separated by gaps wider than `max(15, 2 × size)`.
///
/// Returns `None` for lines without glyphs or with more than two runs.
fn build_line_geom(line: &TextLine) -> Option<LineGeom> {
    let mut runs: Vec<Run> = Vec::with_capacity(2);
    let mut prev_x1: Option<f64> = None;

    for ch in &line.chars {
        if ch.c == '\0' || ch.is_whitespace() {
            continue;
        }
        let split_gap = (ch.size * 2.0).max(15.0);
        let new_run = prev_x1.is_none_or(|px| ch.bbox.x0 - px > split_gap);
        prev_x1 = Some(ch.bbox.x1);

        let visible = !ch.c.is_control();
        if new_run {
            if runs.len() == 2 {
                return None;
            }
            runs.push(Run {
                bbox: ch.bbox,
                visible,
            });
        } else if let Some(run) = runs.last_mut() {
            run.bbox = run.bbox.union(&ch.bbox);
            run.visible |= visible;
        }
    }

    let bbox = union_all(runs.iter().map(|r| r.bbox))?;
    let split_x = match runs.as_slice() {
        [a, b] => Some((a.bbox.x1 + b.bbox.x0) * 0.5),
        _ => None,
    };
    Some(LineGeom {
        bbox,
        runs,
        split_x,
    })
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    Some(if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    })
}

/// End index (exclusive) of the y band starting at `start`.
fn band_end(lines: &[LineGeom], start: usize, tolerance: f64) -> usize {
    let y_ref = lines[start].bbox.top;
    let mut end = start + 1;
    while end < lines.len() && (lines[end].bbox.top - y_ref).abs() < tolerance {
        end += 1;
    }
    end
}

/// Leftmost and rightmost line (by x0) in a band, filtered by `accept`.
fn band_extremes(
    lines: &[LineGeom],
    band: std::ops::Range<usize>,
    accept: impl Fn(&LineGeom) -> bool,
) -> (Option<usize>, Option<usize>) {
    let mut left: Option<usize> = None;
    let mut right: Option<usize> = None;
    for j in band {
        if !accept(&lines[j]) {
            continue;
        }
        if left.is_none_or(|l| lines[j].bbox.x0 < lines[l].bbox.x0) {
            left = Some(j);
        }
        if right.is_none_or(|r| lines[j].bbox.x0 > lines[r].bbox.x0) {
            right = Some(j);
        }
    }
    (left, right)
}

#[derive(Debug, Clone)]
struct SynthRow {
    left: Option<BBox>,
    right: Option<BBox>,
    bbox: BBox,
}

impl SynthRow {
    fn complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Thresholds shared by the candidate and row passes.
struct Geometry {
    split_tol: f64,
    band_y_tol: f64,
    min_sep: f64,
    max_gap: f64,
    continuation_y_tol: f64,
}

/// Close the current group, promoting it to `best` when it is the longest
/// qualifying group so far.
fn finish_group(best: &mut Vec<SynthRow>, current: &mut Vec<SynthRow>, min_rows: usize) {
    let complete = current.iter().filter(|r| r.complete()).count();
    if current.len() >= min_rows && complete >= 2 && current.len() > best.len() {
        *best = std::mem::take(current);
    }
    current.clear();
}

/// Infer a two-column table from text lines.
///
/// 1. lines split into at most two runs (more runs exclude the line);
/// 2. split candidates come from two-run lines and from pairs of single-run
///    lines in the same y band at least `max(50, 15% of content width)` apart;
/// 3. the median split and median right-column start are taken over at
///    least three candidates;
/// 4. rows are created from aligned lines or straddling pairs; other lines
///    may continue the previous row's left or right cell;
/// 5. the longest contiguous group with two complete rows wins;
/// 6. the right column must be at least 1.2× as wide in total as the left.
pub fn synthesize_two_column_table(text: &TextPage, settings: &DetectionSettings) -> Option<Table> {
    let mut lines: Vec<LineGeom> = text.lines().filter_map(build_line_geom).collect();
    if lines.len() < 3 {
        debug!(lines = lines.len(), "not enough text lines");
        return None;
    }

    let min_x = lines.iter().map(|l| l.bbox.x0).fold(f64::INFINITY, f64::min);
    let max_x = lines.iter().map(|l| l.bbox.x1).fold(f64::NEG_INFINITY, f64::max);
    let content_width = max_x - min_x;
    if content_width <= 0.0 {
        return None;
    }

    lines.sort_by_key(|l| (float_key(l.bbox.top), float_key(l.bbox.x0)));

    let body = text.body_font_size();
    let geo = Geometry {
        split_tol: (content_width * 0.03).max(12.0),
        band_y_tol: (body * 0.8).max(4.0),
        min_sep: (content_width * 0.15).max(50.0),
        max_gap: (body * 3.0).max(25.0),
        continuation_y_tol: body * 1.5,
    };

    // Split candidates.
    let mut splits: Vec<f64> = Vec::new();
    let mut right_starts: Vec<f64> = Vec::new();
    for lg in lines.iter().filter(|l| l.is_aligned_pair()) {
        if let Some(split) = lg.split_x {
            splits.push(split);
            right_starts.push(lg.runs[1].bbox.x0);
        }
    }
    let mut i = 0;
    while i < lines.len() {
        let end = band_end(&lines, i, geo.band_y_tol);
        let (left, right) = band_extremes(&lines, i..end, |l| l.runs.len() == 1 && l.runs[0].visible);
        if let (Some(l), Some(r)) = (left, right) {
            if l != r && lines[r].bbox.x0 - lines[l].bbox.x0 >= geo.min_sep {
                splits.push((lines[l].bbox.x1 + lines[r].bbox.x0) * 0.5);
                right_starts.push(lines[r].bbox.x0);
            }
        }
        i = end;
    }

    if splits.len() < 3 {
        debug!(candidates = splits.len(), "not enough column split candidates");
        return None;
    }
    let split = median(&mut splits)?;
    let right_x0 = median(&mut right_starts)?;

    // Row pass.
    let mut best: Vec<SynthRow> = Vec::new();
    let mut current: Vec<SynthRow> = Vec::new();
    let mut prev_y1: Option<f64> = None;

    let mut i = 0;
    while i < lines.len() {
        let end = band_end(&lines, i, geo.band_y_tol);
        let band = i..end;
        let y_ref = lines[i].bbox.top;
        let band_y1 = lines[band.clone()]
            .iter()
            .map(|l| l.bbox.bottom)
            .fold(f64::NEG_INFINITY, f64::max);
        i = end;

        let aligned = band.clone().find(|&j| {
            let lg = &lines[j];
            lg.is_aligned_pair()
                && lg
                    .split_x
                    .is_some_and(|s| (s - split).abs() <= geo.split_tol)
        });
        let (left, right) = band_extremes(&lines, band, LineGeom::is_visible);

        let straddle = geo.split_tol * 0.10;
        let new_row = if let Some(j) = aligned {
            Some((lines[j].runs[0].bbox, lines[j].runs[1].bbox))
        } else {
            match (left, right) {
                (Some(l), Some(r))
                    if l != r
                        && lines[r].bbox.x0 - lines[l].bbox.x0 >= geo.min_sep
                        && lines[l].bbox.x1 < split - straddle
                        && lines[r].bbox.x0 > split + straddle =>
                {
                    Some((lines[l].bbox, lines[r].bbox))
                }
                _ => None,
            }
        };

        let mut left_cont = false;
        let mut right_cont = false;
        if new_row.is_none() {
            if let Some(prev) = current.last() {
                let near = |b: &BBox| (b.top - prev.bbox.bottom).abs() < geo.continuation_y_tol;
                if let Some(l) = left {
                    let b = &lines[l].bbox;
                    left_cont = b.x0 < split - straddle && near(b);
                }
                if let Some(r) = right {
                    let b = &lines[r].bbox;
                    right_cont = b.x0 >= split + geo.split_tol * 0.25
                        && (b.x0 - right_x0).abs() <= geo.split_tol
                        && near(b);
                }
            }
        }

        if new_row.is_none() && !left_cont && !right_cont {
            continue;
        }

        match prev_y1 {
            None => prev_y1 = Some(band_y1),
            Some(py) if y_ref - py > geo.max_gap => {
                finish_group(&mut best, &mut current, settings.min_two_column_rows);
                prev_y1 = Some(band_y1);
            }
            Some(py) => prev_y1 = Some(py.max(band_y1)),
        }

        if let Some((l, r)) = new_row {
            current.push(SynthRow {
                left: Some(l),
                right: Some(r),
                bbox: l.union(&r),
            });
        } else if let Some(row) = current.last_mut() {
            let (slot, idx) = if left_cont {
                (&mut row.left, left)
            } else {
                (&mut row.right, right)
            };
            if let Some(b) = idx.map(|j| lines[j].bbox) {
                *slot = Some(slot.map_or(b, |s| s.union(&b)));
                row.bbox = row.bbox.union(&b);
            }
        }
    }
    if prev_y1.is_some() {
        finish_group(&mut best, &mut current, settings.min_two_column_rows);
    }

    if best.len() < settings.min_two_column_rows.max(1) {
        debug!(rows = best.len(), "no qualifying two-column region");
        return None;
    }

    let left_total: f64 = best.iter().filter_map(|r| r.left).map(|b| b.width()).sum();
    let right_total: f64 = best.iter().filter_map(|r| r.right).map(|b| b.width()).sum();
    if right_total < left_total * 1.2 {
        debug!(left_total, right_total, "right column not wider than left");
        return None;
    }

    let rows: Vec<TableRow> = best
        .into_iter()
        .map(|r| TableRow {
            cells: vec![
                r.left.map_or_else(TableCell::empty, TableCell::new),
                r.right.map_or_else(TableCell::empty, TableCell::new),
            ],
            bbox: r.bbox,
        })
        .collect();
    debug!(rows = rows.len(), split, "synthesized two-column table");
    Table::from_rows(rows, Strategy::TwoColumn)
}
