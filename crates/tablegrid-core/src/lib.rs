//! tablegrid-core: Backend-independent table detection.
//!
//! This crate turns the vector graphics and text of one rendered page into
//! tables. It knows nothing about PDF parsing: a renderer reports painted
//! paths through [`DrawingHandler`] and supplies a structured [`TextPage`].
//!
//! # Pipeline
//!
//! 1. [`EdgeCapture`] records thin strokes and rectangle fills as [`Edge`]s.
//! 2. [`merge_edges`] snaps and joins them into a canonical set.
//! 3. [`find_intersections`] collects crossing points in a [`SpatialHash`].
//! 4. [`find_cells`] builds rectangles from corner points.
//! 5. [`group_cells_into_tables`] forms rows and tables.
//! 6. [`validate_table`] rejects page frames and layout grids.
//!
//! When no ruled grid is found, [`TableFinder`] falls back to
//! [`find_horizontal_divider_table`] and then to
//! [`synthesize_two_column_table`].

pub mod capture;
pub mod cell_text;
pub mod cells;
pub mod edge_processor;
pub mod edges;
pub mod error;
pub mod finder;
pub mod geometry;
pub mod grouping;
pub mod horizontal;
pub mod markdown;
pub mod settings;
pub mod spatial_hash;
pub mod table;
pub mod text;
pub mod two_column;
pub mod validate;

pub use capture::{DrawingHandler, EDGE_MAX_WIDTH, EDGE_MIN_LENGTH, EdgeCapture, PaintOp, PathEvent};
pub use cell_text::{fill_cell_text, prune_textless_columns};
pub use cells::{clip_cells_to_page, deduplicate_cells, find_cells};
pub use edge_processor::{find_intersections, merge_edges};
pub use edges::{Edge, EdgeSource, edges_from_fill, split_by_orientation};
pub use error::{Result, TableError};
pub use finder::{DetectionReport, TableFinder};
pub use geometry::{BBox, Orientation, Point};
pub use grouping::group_cells_into_tables;
pub use horizontal::find_horizontal_divider_table;
pub use markdown::table_to_gfm;
pub use settings::{DetectionSettings, PageTolerances, Strategy};
pub use spatial_hash::SpatialHash;
pub use table::{Table, TableBlock, TableCell, TableRow};
pub use text::{TextBlock, TextChar, TextLine, TextPage, extract_text_in_rect, has_visible_text};
pub use two_column::synthesize_two_column_table;
pub use validate::{Rejection, retain_valid_tables, validate_table, validate_tables};
