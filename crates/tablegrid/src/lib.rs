//! tablegrid: Detect tables in rendered PDF pages.
//!
//! This is the public API facade crate. It re-exports the types from
//! tablegrid-core and drives a [`PageSource`] through edge capture and the
//! detection strategy chain.
//!
//! # Architecture
//!
//! - **tablegrid-core**: Geometry, edge processing and table strategies
//! - **tablegrid** (this crate): Page sources, single-page entry points and
//!   multi-page [`Document`] detection

mod document;
mod page;

pub use document::{Document, DocumentError};
pub use page::{PageData, PageSource};
pub use tablegrid_core;
pub use tablegrid_core::{
    BBox, DetectionReport, DetectionSettings, DrawingHandler, Edge, EdgeCapture, EdgeSource,
    Orientation, PaintOp, PathEvent, Point, Rejection, Result, Strategy, Table, TableBlock,
    TableCell, TableError, TableFinder, TableRow, TextBlock, TextChar, TextLine, TextPage,
};

use tracing::{debug, warn};

/// Detect tables on a page with the default settings.
///
/// Never fails: a page that cannot be processed yields no tables and a
/// warning in the log.
pub fn detect_tables<P: PageSource + ?Sized>(page: &P) -> Vec<Table> {
    detect_tables_with(page, &DetectionSettings::default())
}

/// Detect tables on a page with custom settings.
pub fn detect_tables_with<P: PageSource + ?Sized>(
    page: &P,
    settings: &DetectionSettings,
) -> Vec<Table> {
    match try_detect_tables_with(page, settings) {
        Ok(tables) => tables,
        Err(err) => {
            warn!(error = %err, "table detection failed");
            Vec::new()
        }
    }
}

/// Detect tables on a page with the default settings, surfacing errors.
pub fn try_detect_tables<P: PageSource + ?Sized>(page: &P) -> Result<Vec<Table>> {
    try_detect_tables_with(page, &DetectionSettings::default())
}

pub fn try_detect_tables_with<P: PageSource + ?Sized>(
    page: &P,
    settings: &DetectionSettings,
) -> Result<Vec<Table>> {
    detect_with_report(page, settings).map(|(tables, _)| tables)
}

/// Detect tables and report which strategies ran.
pub fn detect_with_report<P: PageSource + ?Sized>(
    page: &P,
    settings: &DetectionSettings,
) -> Result<(Vec<Table>, DetectionReport)> {
    let bounds = page.bounds();
    page::check_bounds(&bounds)?;

    let mut capture = EdgeCapture::new();
    page.render(&mut capture)?;
    let edges = capture.finish();
    let text = page.text_page()?;
    debug!(edges = edges.len(), "captured page");

    TableFinder::new(bounds, edges, text, settings.clone()).find_tables_with_report()
}
