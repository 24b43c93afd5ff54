//! Table data structures.

use crate::geometry::BBox;
use crate::settings::Strategy;
use crate::text::has_visible_text;

/// A grid slot of a table.
///
/// `bbox` is `None` for a slot left empty by column normalization. `text`
/// is `None` until the cell text fill runs.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableCell {
    pub bbox: Option<BBox>,
    pub text: Option<String>,
}

impl TableCell {
    /// A cell covering `bbox`, without text.
    pub fn new(bbox: BBox) -> Self {
        Self {
            bbox: Some(bbox),
            text: None,
        }
    }

    /// An empty grid slot.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_text(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox: Some(bbox),
            text: Some(text.into()),
        }
    }

    /// True for a slot with no cell geometry.
    pub fn is_empty(&self) -> bool {
        self.bbox.is_none()
    }

    /// True when the cell carries non-whitespace text.
    pub fn has_visible_text(&self) -> bool {
        self.text.as_deref().is_some_and(has_visible_text)
    }

    /// Cell text, or the empty string.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// One row of a table, cells ordered left to right.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub bbox: BBox,
}

impl TableRow {
    /// Build a row whose bbox is the union of its non-empty cells.
    pub fn from_cells(cells: Vec<TableCell>) -> Option<Self> {
        let bbox = union_all(cells.iter().filter_map(|c| c.bbox))?;
        Some(Self { cells, bbox })
    }

    /// Number of non-empty cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

/// A detected table, rows ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub bbox: BBox,
    /// The strategy that produced this table.
    pub strategy: Strategy,
}

impl Table {
    /// Build a table whose bbox is the union of its rows.
    pub fn from_rows(rows: Vec<TableRow>, strategy: Strategy) -> Option<Self> {
        let bbox = union_all(rows.iter().map(|r| r.bbox))?;
        Some(Self {
            rows,
            bbox,
            strategy,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row's cell count.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Cell texts as a row-major grid, `None` for empty or unfilled cells.
    pub fn text_grid(&self) -> Vec<Vec<Option<String>>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.text.clone()).collect())
            .collect()
    }

    /// Whether any cell has non-whitespace text.
    pub fn has_visible_text(&self) -> bool {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .any(TableCell::has_visible_text)
    }

    /// Recompute row and table bboxes after cells were removed.
    pub(crate) fn refresh_bboxes(&mut self) {
        for row in &mut self.rows {
            if let Some(b) = union_all(row.cells.iter().filter_map(|c| c.bbox)) {
                row.bbox = b;
            }
        }
        if let Some(b) = union_all(self.rows.iter().map(|r| r.bbox)) {
            self.bbox = b;
        }
    }
}

pub(crate) fn union_all(boxes: impl IntoIterator<Item = BBox>) -> Option<BBox> {
    boxes.into_iter().reduce(|a, b| a.union(&b))
}

/// A table together with its structural summary.
///
/// Created by consuming a [`Table`]; the rows move into the block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableBlock {
    pub table: Table,
    pub row_count: usize,
    pub column_count: usize,
    pub cell_count: usize,
    /// Mean over columns of the fraction of rows with an occupied cell.
    pub column_consistency: f64,
    /// Consistency plus a bonus for wide (≥4 columns) and long (≥6 rows) tables, capped at 1.
    pub confidence: f64,
}

fn occupied(cell: &TableCell) -> bool {
    !cell.is_empty() && cell.text.as_deref().is_none_or(has_visible_text)
}

impl From<Table> for TableBlock {
    fn from(table: Table) -> Self {
        let row_count = table.row_count();
        let column_count = table.column_count();

        let column_consistency = if row_count == 0 || column_count == 0 {
            0.0
        } else {
            let total: f64 = (0..column_count)
                .map(|c| {
                    let filled = table
                        .rows
                        .iter()
                        .filter(|r| r.cells.get(c).is_some_and(occupied))
                        .count();
                    filled as f64 / row_count as f64
                })
                .sum();
            (total / column_count as f64).min(1.0)
        };

        let mut confidence = column_consistency;
        if column_count >= 4 {
            confidence += 0.15;
        }
        if row_count >= 6 {
            confidence += 0.15;
        }

        Self {
            table,
            row_count,
            column_count,
            cell_count: row_count * column_count,
            column_consistency,
            confidence: confidence.min(1.0),
        }
    }
}
