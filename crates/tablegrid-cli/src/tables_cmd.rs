use std::path::Path;

use tablegrid::{DetectionSettings, Table, TableBlock, detect_with_report};
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::shared::{CliError, csv_escape, load_document, resolve_pages};

/// A detected table and the 0-based page it came from.
struct PageTable {
    page: usize,
    table: Table,
}

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    settings: DetectionSettings,
) -> Result<(), CliError> {
    let doc = load_document(file)?.with_settings(settings);
    let page_indices = resolve_pages(pages, doc.page_count())?;

    let mut found = Vec::new();
    for &idx in &page_indices {
        let page = &doc.pages()[idx];
        match detect_with_report(page, doc.settings()) {
            Ok((tables, report)) => {
                info!(
                    page = idx + 1,
                    tables = tables.len(),
                    winner = report.winner.map(|s| s.name()).unwrap_or("none"),
                    attempted = report.attempted.len(),
                    "page done"
                );
                found.extend(tables.into_iter().map(|table| PageTable { page: idx, table }));
            }
            Err(err) => warn!(page = idx + 1, error = %err, "skipping page"),
        }
    }

    match format {
        OutputFormat::Text => write_grid(&found),
        OutputFormat::Json => write_json(found)?,
        OutputFormat::Csv => write_csv(&found),
        OutputFormat::Markdown => write_markdown(&found),
    }
    Ok(())
}

fn write_grid(found: &[PageTable]) {
    for (i, PageTable { page, table }) in found.iter().enumerate() {
        println!(
            "--- Table {} (page {}, {}, bbox: [{:.1}, {:.1}, {:.1}, {:.1}]) ---",
            i + 1,
            page + 1,
            table.strategy,
            table.bbox.x0,
            table.bbox.top,
            table.bbox.x1,
            table.bbox.bottom,
        );

        let col_count = table.column_count();
        let text_rows: Vec<Vec<&str>> = table
            .rows
            .iter()
            .map(|row| {
                let mut texts: Vec<&str> = row.cells.iter().map(|c| c.text_or_empty()).collect();
                texts.resize(col_count, "");
                texts
            })
            .collect();

        let mut col_widths = vec![1usize; col_count];
        for row in &text_rows {
            for (ci, text) in row.iter().enumerate() {
                col_widths[ci] = col_widths[ci].max(text.chars().count());
            }
        }

        for row in &text_rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&col_widths)
                .map(|(text, &width)| format!("{text:<width$}"))
                .collect();
            println!("| {} |", cells.join(" | "));
        }
        println!();
    }

    if found.is_empty() {
        println!("No tables found.");
    }
}

fn write_json(found: Vec<PageTable>) -> Result<(), CliError> {
    let tables: Vec<serde_json::Value> = found
        .into_iter()
        .map(|PageTable { page, table }| {
            let rows = table.text_grid();
            let block = TableBlock::from(table);
            serde_json::json!({
                "page": page + 1,
                "strategy": block.table.strategy.name(),
                "bbox": {
                    "x0": block.table.bbox.x0,
                    "top": block.table.bbox.top,
                    "x1": block.table.bbox.x1,
                    "bottom": block.table.bbox.bottom,
                },
                "row_count": block.row_count,
                "column_count": block.column_count,
                "confidence": block.confidence,
                "rows": rows,
            })
        })
        .collect();

    println!("{}", serde_json::to_string(&tables)?);
    Ok(())
}

fn write_csv(found: &[PageTable]) {
    for (i, PageTable { table, .. }) in found.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let col_count = table.column_count();
        for row in &table.rows {
            let mut cells: Vec<String> = row
                .cells
                .iter()
                .map(|cell| csv_escape(cell.text_or_empty()))
                .collect();
            cells.resize(col_count, String::new());
            println!("{}", cells.join(","));
        }
    }
}

fn write_markdown(found: &[PageTable]) {
    for (i, PageTable { page, table }) in found.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("### Table {} (page {})", i + 1, page + 1);
        println!();
        println!("{}", table.to_markdown());
    }
}
