//! Structural validation of grid tables.

use std::fmt;

use tracing::debug;

use crate::geometry::BBox;
use crate::settings::DetectionSettings;
use crate::table::Table;

/// Why a table failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The table extends beyond the page margin.
    OutsidePage,
    /// The table covers too much of the page to be a data table.
    TooLarge { height_ratio: f64, width_ratio: f64 },
    /// Too many rows disagree with the modal cell count.
    InconsistentRows { inconsistent: usize, rows: usize },
    /// Fewer than 2 usable rows or 2 columns.
    TooSmall { rows: usize, columns: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutsidePage => write!(f, "table lies outside the page"),
            Rejection::TooLarge {
                height_ratio,
                width_ratio,
            } => write!(
                f,
                "table too large ({:.1}% height, {:.1}% width)",
                height_ratio * 100.0,
                width_ratio * 100.0
            ),
            Rejection::InconsistentRows { inconsistent, rows } => {
                write!(f, "inconsistent rows ({inconsistent}/{rows})")
            }
            Rejection::TooSmall { rows, columns } => {
                write!(f, "table too small ({rows} rows, {columns} columns)")
            }
        }
    }
}

/// Most common value; ties go to the larger value.
fn mode(values: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for &v in values {
        let n = values.iter().filter(|&&x| x == v).count();
        best = match best {
            Some((bv, bn)) if bn > n || (bn == n && bv >= v) => Some((bv, bn)),
            _ => Some((v, n)),
        };
    }
    best.map(|(v, _)| v)
}

/// Check one table against the page.
///
/// Gates, in order: the bbox lies within the page plus `table_page_margin`;
/// height and width stay under the page-size ratios; fewer than
/// `max_inconsistent_row_ratio` of the rows (those within the page plus
/// `row_page_margin`) differ from the modal non-empty cell count; at least 2
/// such rows and 2 columns remain.
pub fn validate_table(
    table: &Table,
    page: &BBox,
    settings: &DetectionSettings,
) -> std::result::Result<(), Rejection> {
    if !table.bbox.within(page, settings.table_page_margin) {
        return Err(Rejection::OutsidePage);
    }

    let height_ratio = table.bbox.height() / page.height();
    let width_ratio = table.bbox.width() / page.width();
    if height_ratio > settings.max_table_height_ratio || width_ratio > settings.max_table_width_ratio
    {
        return Err(Rejection::TooLarge {
            height_ratio,
            width_ratio,
        });
    }

    let counts: Vec<usize> = table
        .rows
        .iter()
        .filter(|r| r.bbox.within(page, settings.row_page_margin))
        .map(|r| r.filled_count())
        .filter(|&n| n > 0)
        .collect();
    let rows = counts.len();
    if let Some(modal) = mode(&counts) {
        let inconsistent = counts.iter().filter(|&&n| n != modal).count();
        if inconsistent as f64 >= rows as f64 * settings.max_inconsistent_row_ratio {
            return Err(Rejection::InconsistentRows { inconsistent, rows });
        }
    }

    let columns = table.column_count();
    if rows < 2 || columns < 2 {
        return Err(Rejection::TooSmall { rows, columns });
    }
    Ok(())
}

/// True when any table passes [`validate_table`].
pub fn validate_tables(tables: &[Table], page: &BBox, settings: &DetectionSettings) -> bool {
    tables
        .iter()
        .any(|t| validate_table(t, page, settings).is_ok())
}

/// Keep only the tables that pass validation.
pub fn retain_valid_tables(
    tables: Vec<Table>,
    page: &BBox,
    settings: &DetectionSettings,
) -> Vec<Table> {
    tables
        .into_iter()
        .filter(|t| match validate_table(t, page, settings) {
            Ok(()) => true,
            Err(reason) => {
                debug!(%reason, rows = t.row_count(), "rejected grid table");
                false
            }
        })
        .collect()
}
