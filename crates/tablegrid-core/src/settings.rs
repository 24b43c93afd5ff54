//! Detection configuration.
//!
//! Every geometric threshold is expressed relative to the page so the same
//! settings work for any page size.

use crate::geometry::BBox;

/// A table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Ruled grid: edges → intersections → cells → tables, then validation.
    Grid,
    /// Horizontal rules bound the rows; columns are inferred from text.
    HorizontalDividers,
    /// Rule-less key/value layout inferred from text line geometry.
    TwoColumn,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Grid => "grid",
            Strategy::HorizontalDividers => "horizontal_dividers",
            Strategy::TwoColumn => "two_column",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for table detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectionSettings {
    /// Strategies tried in order; the first to produce tables wins.
    pub strategies: Vec<Strategy>,
    /// Edge snap tolerance as a fraction of page width.
    pub snap_tolerance_ratio: f64,
    /// Edge join tolerance as a fraction of page width.
    pub join_tolerance_ratio: f64,
    /// Intersection tolerance as a fraction of the page diagonal.
    pub intersection_tolerance_ratio: f64,
    /// Minimum merged edges per orientation before the grid strategy runs.
    pub min_grid_edges: usize,
    /// Minimum cell side as a fraction of the smaller page dimension.
    pub min_cell_size_ratio: f64,
    /// Maximum cell width as a fraction of page width.
    pub max_cell_width_ratio: f64,
    /// Maximum cell height as a fraction of page height.
    pub max_cell_height_ratio: f64,
    /// Cells sticking out of the page by more than this are dropped.
    pub page_clip_margin: f64,
    /// Row grouping tolerance as a fraction of page height.
    pub row_y_tolerance_ratio: f64,
    /// Bin size used to order cells into rows.
    pub row_sort_bin: f64,
    /// Vertical gap that starts a new table, as a fraction of page height.
    pub table_split_gap_ratio: f64,
    /// Allowed overhang of a table beyond the page.
    pub table_page_margin: f64,
    /// Allowed overhang of a row beyond the page.
    pub row_page_margin: f64,
    /// Tables taller than this fraction of the page are layout, not data.
    pub max_table_height_ratio: f64,
    /// Tables wider than this fraction of the page are layout, not data.
    pub max_table_width_ratio: f64,
    /// A table is rejected when this fraction of its rows have an off-mode cell count.
    pub max_inconsistent_row_ratio: f64,
    /// Horizontal rules closer than this collapse into one row boundary.
    pub divider_merge_tolerance: f64,
    /// Minimum row boundaries for the horizontal-divider strategy.
    pub min_dividers: usize,
    /// Scales the text gap that starts a new column in the horizontal-divider strategy.
    pub column_gap_multiplier: f64,
    /// Minimum rows for a synthesized two-column table.
    pub min_two_column_rows: usize,
    /// Remove columns with no visible text after the cell text fill.
    pub drop_textless_columns: bool,
    /// Drop tables with no visible text at all after the cell text fill.
    pub drop_textless_tables: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            strategies: vec![
                Strategy::Grid,
                Strategy::HorizontalDividers,
                Strategy::TwoColumn,
            ],
            snap_tolerance_ratio: 0.005,
            join_tolerance_ratio: 0.005,
            intersection_tolerance_ratio: 0.0015,
            min_grid_edges: 3,
            min_cell_size_ratio: 0.005,
            max_cell_width_ratio: 0.95,
            max_cell_height_ratio: 0.20,
            page_clip_margin: 10.0,
            row_y_tolerance_ratio: 0.015,
            row_sort_bin: 5.0,
            table_split_gap_ratio: 0.10,
            table_page_margin: 50.0,
            row_page_margin: 10.0,
            max_table_height_ratio: 0.6,
            max_table_width_ratio: 0.9,
            max_inconsistent_row_ratio: 0.4,
            divider_merge_tolerance: 2.0,
            min_dividers: 3,
            column_gap_multiplier: 1.0,
            min_two_column_rows: 3,
            drop_textless_columns: true,
            drop_textless_tables: true,
        }
    }
}

/// Absolute tolerances for one page, derived from [`DetectionSettings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTolerances {
    pub snap: f64,
    pub join: f64,
    pub intersection: f64,
    pub point_merge: f64,
    pub min_cell: f64,
    pub max_cell_width: f64,
    pub max_cell_height: f64,
    pub row_y: f64,
    pub split_gap: f64,
}

impl DetectionSettings {
    /// Resolve the ratio-based thresholds against a page.
    pub fn tolerances(&self, page: &BBox) -> PageTolerances {
        let width = page.width();
        let height = page.height();
        PageTolerances {
            snap: width * self.snap_tolerance_ratio,
            join: width * self.join_tolerance_ratio,
            intersection: page.diagonal() * self.intersection_tolerance_ratio,
            point_merge: width * self.snap_tolerance_ratio,
            min_cell: width.min(height) * self.min_cell_size_ratio,
            max_cell_width: width * self.max_cell_width_ratio,
            max_cell_height: height * self.max_cell_height_ratio,
            row_y: height * self.row_y_tolerance_ratio,
            split_gap: height * self.table_split_gap_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_chain_order() {
        let settings = DetectionSettings::default();
        assert_eq!(
            settings.strategies,
            vec![
                Strategy::Grid,
                Strategy::HorizontalDividers,
                Strategy::TwoColumn
            ]
        );
    }

    #[test]
    fn test_default_values() {
        let settings = DetectionSettings::default();
        assert_eq!(settings.snap_tolerance_ratio, 0.005);
        assert_eq!(settings.intersection_tolerance_ratio, 0.0015);
        assert_eq!(settings.max_cell_height_ratio, 0.20);
        assert_eq!(settings.table_split_gap_ratio, 0.10);
        assert_eq!(settings.max_inconsistent_row_ratio, 0.4);
        assert_eq!(settings.column_gap_multiplier, 1.0);
        assert!(settings.drop_textless_tables);
    }

    #[test]
    fn test_custom_construction_keeps_defaults() {
        let settings = DetectionSettings {
            strategies: vec![Strategy::TwoColumn],
            column_gap_multiplier: 2.0,
            ..DetectionSettings::default()
        };
        assert_eq!(settings.strategies, vec![Strategy::TwoColumn]);
        assert_eq!(settings.column_gap_multiplier, 2.0);
        assert_eq!(settings.min_dividers, 3);
    }

    #[test]
    fn test_tolerances_for_letter_page() {
        let page = BBox::new(0.0, 0.0, 600.0, 800.0);
        let tol = DetectionSettings::default().tolerances(&page);
        assert!((tol.snap - 3.0).abs() < 1e-9);
        assert!((tol.join - 3.0).abs() < 1e-9);
        // diagonal 1000
        assert!((tol.intersection - 1.5).abs() < 1e-9);
        assert!((tol.min_cell - 3.0).abs() < 1e-9);
        assert!((tol.max_cell_width - 570.0).abs() < 1e-9);
        assert!((tol.max_cell_height - 160.0).abs() < 1e-9);
        assert!((tol.row_y - 12.0).abs() < 1e-9);
        assert!((tol.split_gap - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Grid.to_string(), "grid");
        assert_eq!(Strategy::HorizontalDividers.to_string(), "horizontal_dividers");
        assert_eq!(Strategy::TwoColumn.to_string(), "two_column");
    }
}
