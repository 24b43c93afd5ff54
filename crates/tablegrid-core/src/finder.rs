//! Orchestration of the detection strategies for one page.

use tracing::{debug, warn};

use crate::cell_text::{fill_cell_text, prune_textless_columns};
use crate::cells::{clip_cells_to_page, deduplicate_cells, find_cells};
use crate::edge_processor::{find_intersections, merge_edges};
use crate::edges::{Edge, split_by_orientation};
use crate::error::{Result, TableError};
use crate::geometry::{BBox, Orientation};
use crate::grouping::group_cells_into_tables;
use crate::horizontal::find_horizontal_divider_table;
use crate::settings::{DetectionSettings, Strategy};
use crate::spatial_hash::SpatialHash;
use crate::table::Table;
use crate::text::TextPage;
use crate::two_column::synthesize_two_column_table;
use crate::validate::{retain_valid_tables, validate_tables};

/// What happened while running the strategy chain.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionReport {
    /// Strategies that were run, in order.
    pub attempted: Vec<Strategy>,
    /// The strategy whose tables were returned.
    pub winner: Option<Strategy>,
    /// Strategies that failed with an error (treated as a miss).
    pub failed: Vec<Strategy>,
}

/// Orchestrator for the table detection pipeline.
///
/// Holds everything captured from one page: its bounds, the edges from the
/// render pass, and the structured text. [`TableFinder::find_tables`] tries
/// each configured strategy in order and stops at the first that produces
/// tables.
#[derive(Debug, Clone)]
pub struct TableFinder {
    page: BBox,
    edges: Vec<Edge>,
    text: TextPage,
    settings: DetectionSettings,
}

impl TableFinder {
    /// Create a new TableFinder for a page.
    pub fn new(page: BBox, edges: Vec<Edge>, text: TextPage, settings: DetectionSettings) -> Self {
        Self {
            page,
            edges,
            text,
            settings,
        }
    }

    /// Get a reference to the settings.
    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Get a reference to the captured edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn text(&self) -> &TextPage {
        &self.text
    }

    pub fn page(&self) -> BBox {
        self.page
    }

    /// Run the strategy chain and return the detected tables.
    pub fn find_tables(&self) -> Result<Vec<Table>> {
        self.find_tables_with_report().map(|(tables, _)| tables)
    }

    /// Run the strategy chain, also reporting which strategies ran.
    ///
    /// A strategy that fails is logged and treated as producing nothing, so
    /// the next strategy still runs. Only an unusable page is an error.
    pub fn find_tables_with_report(&self) -> Result<(Vec<Table>, DetectionReport)> {
        if !self.page.is_finite() || self.page.width() <= 0.0 || self.page.height() <= 0.0 {
            return Err(TableError::InvalidPage(format!(
                "bounds {:?} have no area",
                self.page
            )));
        }

        let mut report = DetectionReport::default();
        let mut found = None;

        for &strategy in &self.settings.strategies {
            report.attempted.push(strategy);
            match self.run_strategy(strategy) {
                Ok(Some(tables)) => {
                    debug!(%strategy, tables = tables.len(), "strategy produced tables");
                    report.winner = Some(strategy);
                    found = Some(tables);
                    break;
                }
                Ok(None) => debug!(%strategy, "strategy found no tables"),
                Err(err) => {
                    warn!(%strategy, error = %err, "strategy failed, trying the next one");
                    report.failed.push(strategy);
                }
            }
        }

        let mut tables = found.unwrap_or_default();
        self.finish(&mut tables);
        Ok((tables, report))
    }

    /// Run a single strategy. `Ok(None)` means the strategy does not apply.
    pub fn run_strategy(&self, strategy: Strategy) -> Result<Option<Vec<Table>>> {
        match strategy {
            Strategy::Grid => self.grid_tables(),
            Strategy::HorizontalDividers => self.horizontal_divider_tables(),
            Strategy::TwoColumn => {
                Ok(synthesize_two_column_table(&self.text, &self.settings).map(|t| vec![t]))
            }
        }
    }

    /// Ruled grid: merge → intersections → cells → tables → validation.
    fn grid_tables(&self) -> Result<Option<Vec<Table>>> {
        let tol = self.settings.tolerances(&self.page);

        // Step 1: canonical edge set
        let merged = merge_edges(&self.edges, tol.snap, tol.join)?;
        let (h_edges, v_edges) = split_by_orientation(merged);
        debug!(
            captured = self.edges.len(),
            horizontal = h_edges.len(),
            vertical = v_edges.len(),
            "merged edges"
        );
        let min = self.settings.min_grid_edges;
        if h_edges.len() < min || v_edges.len() < min {
            return Ok(None);
        }

        // Step 2: intersections
        let mut hash = SpatialHash::new();
        find_intersections(&v_edges, &h_edges, tol.intersection, &mut hash)?;
        if hash.len() < 4 {
            debug!(points = hash.len(), "not enough intersections");
            return Ok(None);
        }
        let mut points = Vec::new();
        hash.drain_into(&mut points)?;

        // Step 3: cells
        let cells = find_cells(&points, &tol)?;
        let cells = clip_cells_to_page(cells, &self.page, self.settings.page_clip_margin);
        let cells = deduplicate_cells(cells);

        // Step 4: tables
        let tables = group_cells_into_tables(cells, &self.page, &self.settings)?;

        // Step 5: validation
        if !validate_tables(&tables, &self.page, &self.settings) {
            return Ok(None);
        }
        let tables = retain_valid_tables(tables, &self.page, &self.settings);
        Ok((!tables.is_empty()).then_some(tables))
    }

    fn horizontal_divider_tables(&self) -> Result<Option<Vec<Table>>> {
        let tol = self.settings.tolerances(&self.page);
        let horizontal: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| e.orientation == Orientation::Horizontal)
            .cloned()
            .collect();
        let merged = merge_edges(&horizontal, tol.snap, tol.join)?;
        Ok(find_horizontal_divider_table(&merged, &self.text, &self.settings).map(|t| vec![t]))
    }

    /// Fill cell text and drop text-less columns and tables.
    ///
    /// The text cleanup only runs when the page has text at all.
    fn finish(&self, tables: &mut Vec<Table>) {
        if tables.is_empty() {
            return;
        }
        fill_cell_text(tables, &self.text);
        if self.text.is_empty() {
            return;
        }
        if self.settings.drop_textless_columns {
            for table in tables.iter_mut() {
                let removed = prune_textless_columns(table);
                if removed > 0 {
                    debug!(removed, "pruned columns without text");
                }
            }
        }
        if self.settings.drop_textless_tables {
            tables.retain(Table::has_visible_text);
        }
    }
}
