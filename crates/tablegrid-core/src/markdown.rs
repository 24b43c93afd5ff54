//! GitHub Flavored Markdown rendering of detected tables.

use crate::table::Table;

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Convert a Table to GitHub Flavored Markdown table syntax.
///
/// The first row becomes the header. Empty or unfilled cells render blank.
pub fn table_to_gfm(table: &Table) -> String {
    if table.rows.is_empty() {
        return String::new();
    }

    let width = table.column_count();
    let mut lines = Vec::with_capacity(table.rows.len() + 1);

    for (i, row) in table.rows.iter().enumerate() {
        let mut cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| escape_cell(cell.text_or_empty()))
            .collect();
        cells.resize(width, String::new());
        lines.push(format!("| {} |", cells.join(" | ")));

        // Add separator after first row (header)
        if i == 0 {
            let sep = vec!["---"; width];
            lines.push(format!("| {} |", sep.join(" | ")));
        }
    }

    lines.join("\n")
}

impl Table {
    /// Render as a GFM table.
    pub fn to_markdown(&self) -> String {
        table_to_gfm(self)
    }
}
