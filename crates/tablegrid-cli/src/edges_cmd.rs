use std::path::Path;

use tablegrid::tablegrid_core::{merge_edges, split_by_orientation};
use tablegrid::{DetectionSettings, Edge, EdgeCapture, PageSource};
use tracing::warn;

use crate::cli::EdgesFormat;
use crate::shared::{CliError, load_document, resolve_pages};

/// Captured and merged edges of one page.
struct PageEdges {
    page: usize,
    captured: usize,
    horizontal: Vec<Edge>,
    vertical: Vec<Edge>,
}

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &EdgesFormat,
    settings: &DetectionSettings,
) -> Result<(), CliError> {
    let doc = load_document(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;

    let mut results = Vec::new();
    for &idx in &page_indices {
        let page = &doc.pages()[idx];
        let mut capture = EdgeCapture::new();
        if let Err(err) = page.render(&mut capture) {
            warn!(page = idx + 1, error = %err, "skipping page");
            continue;
        }
        let edges = capture.finish();
        let tol = settings.tolerances(&page.bounds());
        match merge_edges(&edges, tol.snap, tol.join) {
            Ok(merged) => {
                let (horizontal, vertical) = split_by_orientation(merged);
                results.push(PageEdges {
                    page: idx,
                    captured: edges.len(),
                    horizontal,
                    vertical,
                });
            }
            Err(err) => warn!(page = idx + 1, error = %err, "skipping page"),
        }
    }

    match format {
        EdgesFormat::Text => write_text(&results),
        EdgesFormat::Json => write_json(&results)?,
    }
    Ok(())
}

fn write_text(results: &[PageEdges]) {
    for r in results {
        println!(
            "--- Page {}: {} captured, {} horizontal, {} vertical ---",
            r.page + 1,
            r.captured,
            r.horizontal.len(),
            r.vertical.len()
        );
        for e in r.horizontal.iter().chain(&r.vertical) {
            println!(
                "{:<10} {:>8.2} {:>8.2} {:>8.2} {:>8.2}  {:?}",
                format!("{:?}", e.orientation).to_lowercase(),
                e.x0,
                e.top,
                e.x1,
                e.bottom,
                e.source
            );
        }
    }
}

fn write_json(results: &[PageEdges]) -> Result<(), CliError> {
    let pages: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "page": r.page + 1,
                "captured": r.captured,
                "horizontal": r.horizontal,
                "vertical": r.vertical,
            })
        })
        .collect();
    println!("{}", serde_json::to_string(&pages)?);
    Ok(())
}
