//! Cell text fill and post-fill cleanup.

use crate::table::Table;
use crate::text::{TextPage, extract_text_in_rect};

/// Populate `text` of every non-empty cell from the page text.
///
/// Line breaks inside a cell are flattened to spaces.
pub fn fill_cell_text(tables: &mut [Table], text: &TextPage) {
    for table in tables {
        for row in &mut table.rows {
            for cell in &mut row.cells {
                if let Some(bbox) = cell.bbox {
                    let content = extract_text_in_rect(text, &bbox).replace(['\n', '\r'], " ");
                    cell.text = Some(content);
                }
            }
        }
    }
}

/// Remove columns where no cell has visible text.
///
/// Nothing is removed when every column is blank; callers decide whether to
/// keep such a table. A two-column table with one blank column comes back
/// with a single column. Returns the number of columns removed.
pub fn prune_textless_columns(table: &mut Table) -> usize {
    let columns = table.column_count();
    let keep: Vec<bool> = (0..columns)
        .map(|c| {
            table
                .rows
                .iter()
                .any(|r| r.cells.get(c).is_some_and(|cell| cell.has_visible_text()))
        })
        .collect();

    let kept = keep.iter().filter(|k| **k).count();
    if kept == 0 || kept == columns {
        return 0;
    }

    for row in &mut table.rows {
        let mut c = 0;
        row.cells.retain(|_| {
            let k = keep.get(c).copied().unwrap_or(false);
            c += 1;
            k
        });
    }
    table.refresh_bboxes();
    columns - kept
}
