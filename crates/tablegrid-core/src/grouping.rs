//! Grouping of cells into rows and tables, with column normalization.

use tracing::debug;

use crate::error::{Result, try_push};
use crate::geometry::{BBox, float_key};
use crate::settings::{DetectionSettings, Strategy};
use crate::table::{Table, TableCell, TableRow};

/// Cells of one visual row, before normalization.
struct RawRow {
    cells: Vec<BBox>,
    bottom: f64,
}

impl RawRow {
    fn new(first: BBox) -> Self {
        Self {
            bottom: first.bottom,
            cells: vec![first],
        }
    }

    fn push(&mut self, cell: BBox) {
        self.bottom = self.bottom.max(cell.bottom);
        self.cells.push(cell);
    }
}

/// Group deduplicated cells into tables.
///
/// 1. sort cells by (top in `row_sort_bin` bins, x0);
/// 2. consecutive cells whose top is within the row tolerance of the row's
///    first cell form one row;
/// 3. a gap above a row larger than the split threshold starts a new table;
/// 4. the row with the most cells defines the column positions, and every
///    row is rebuilt on that grid by nearest x0;
/// 5. columns empty in every row are removed;
/// 6. rows left without cells are removed;
/// 7. tables with fewer than 2 rows or 2 columns are discarded.
///
/// Every row of a returned table has the same number of cells.
pub fn group_cells_into_tables(
    mut cells: Vec<BBox>,
    page: &BBox,
    settings: &DetectionSettings,
) -> Result<Vec<Table>> {
    let tol = settings.tolerances(page);
    let mut tables = Vec::new();
    if cells.is_empty() {
        return Ok(tables);
    }

    let bin = settings.row_sort_bin.max(f64::EPSILON);
    cells.sort_by_key(|c| ((c.top / bin).round() as i64, float_key(c.x0)));

    // Steps 2-3: rows, split into tables on large gaps.
    let mut groups: Vec<Vec<RawRow>> = Vec::new();
    let mut current: Vec<RawRow> = Vec::new();
    let mut row: Option<RawRow> = None;
    let mut row_y0 = 0.0;

    for cell in cells {
        if let Some(r) = row.as_mut() {
            if (cell.top - row_y0).abs() <= tol.row_y {
                r.push(cell);
                continue;
            }
        }

        if let Some(finished) = row.take() {
            try_push(&mut current, finished, "grouping rows")?;
        }
        if let Some(prev) = current.last() {
            let prev_cell_bottom = prev.cells.last().map_or(prev.bottom, |c| c.bottom);
            let gap = cell.top - prev.bottom.max(prev_cell_bottom);
            if gap > tol.split_gap {
                try_push(&mut groups, std::mem::take(&mut current), "splitting tables")?;
            }
        }
        row_y0 = cell.top;
        row = Some(RawRow::new(cell));
    }
    if let Some(finished) = row {
        try_push(&mut current, finished, "grouping rows")?;
    }
    if !current.is_empty() {
        try_push(&mut groups, current, "splitting tables")?;
    }

    let group_count = groups.len();
    for rows in groups {
        if let Some(table) = normalize_table(rows)? {
            try_push(&mut tables, table, "collecting tables")?;
        }
    }

    debug!(
        groups = group_count,
        tables = tables.len(),
        "grouped cells into tables"
    );
    Ok(tables)
}

/// Steps 4-7 for one table candidate.
fn normalize_table(mut rows: Vec<RawRow>) -> Result<Option<Table>> {
    for row in &mut rows {
        row.cells.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    }

    let Some(reference) = rows
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.cells.len().cmp(&b.cells.len()).then(ib.cmp(ia)))
        .map(|(i, _)| i)
    else {
        return Ok(None);
    };
    let columns: Vec<f64> = rows[reference].cells.iter().map(|c| c.x0).collect();
    if columns.len() < 2 {
        return Ok(None);
    }

    // Step 4: nearest-x0 assignment, keeping the closest cell on collisions.
    let mut grid: Vec<Vec<Option<BBox>>> = Vec::new();
    for row in &rows {
        let mut slots: Vec<Option<BBox>> = vec![None; columns.len()];
        for cell in &row.cells {
            let col = nearest_column(&columns, cell.x0);
            let replace = match slots[col] {
                None => true,
                Some(existing) => (cell.x0 - columns[col]).abs() < (existing.x0 - columns[col]).abs(),
            };
            if replace {
                slots[col] = Some(*cell);
            }
        }
        try_push(&mut grid, slots, "normalizing columns")?;
    }

    // Step 5: drop columns empty in every row.
    let keep: Vec<bool> = (0..columns.len())
        .map(|c| grid.iter().any(|slots| slots[c].is_some()))
        .collect();
    if keep.iter().any(|k| !k) {
        for slots in &mut grid {
            let mut c = 0;
            slots.retain(|_| {
                let kept = keep[c];
                c += 1;
                kept
            });
        }
    }

    // Step 6: drop rows without cells.
    let table_rows: Vec<TableRow> = grid
        .into_iter()
        .filter_map(|slots| {
            let cells = slots
                .into_iter()
                .map(|slot| slot.map_or_else(TableCell::empty, TableCell::new))
                .collect();
            TableRow::from_cells(cells)
        })
        .collect();

    // Step 7
    let column_count = keep.iter().filter(|k| **k).count();
    if table_rows.len() < 2 || column_count < 2 {
        return Ok(None);
    }
    Ok(Table::from_rows(table_rows, Strategy::Grid))
}

fn nearest_column(columns: &[f64], x: f64) -> usize {
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - x).abs().total_cmp(&(*b - x).abs()))
        .map_or(0, |(i, _)| i)
}
