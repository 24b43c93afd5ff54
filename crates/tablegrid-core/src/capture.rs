//! Edge capture from the rendering callback stream.
//!
//! The rendering collaborator replays a page's drawing operations and calls
//! [`DrawingHandler::on_path_painted`] once per painted path. [`EdgeCapture`]
//! turns thin strokes and filled rectangles into [`Edge`]s.

use crate::edges::{Edge, EdgeSource, edges_from_fill};
use crate::error::{Result, reserve, try_push};
use crate::geometry::BBox;

/// Maximum thickness of a stroked path that still counts as a ruling line.
pub const EDGE_MAX_WIDTH: f64 = 3.0;

/// Minimum length of a stroked path that still counts as a ruling line.
pub const EDGE_MIN_LENGTH: f64 = 3.0;

/// The painting operation applied to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaintOp {
    /// Path is stroked (outlined).
    Stroke,
    /// Path is filled.
    Fill,
    /// Path is both filled and stroked.
    FillAndStroke,
}

/// A painted path, reduced to its device-space bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEvent {
    /// Bounding box of the path after transformation (top-left origin).
    pub bbox: BBox,
    /// The paint operation applied.
    pub paint_op: PaintOp,
    /// Stroke line width.
    pub line_width: f64,
}

/// Callback interface driven by the rendering collaborator.
///
/// Returning an error stops the replay; the collaborator must propagate it.
pub trait DrawingHandler {
    /// Called when a path is painted.
    fn on_path_painted(&mut self, _event: PathEvent) -> Result<()> {
        Ok(())
    }
}

/// Collects table edges from painted paths.
#[derive(Debug, Default)]
pub struct EdgeCapture {
    edges: Vec<Edge>,
}

impl EdgeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edges captured so far.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Consume the capture and return its edges.
    pub fn finish(self) -> Vec<Edge> {
        self.edges
    }

    fn capture_stroke(&mut self, bbox: &BBox) -> Result<()> {
        let w = bbox.width();
        let h = bbox.height();
        if h <= EDGE_MAX_WIDTH && w >= EDGE_MIN_LENGTH {
            let edge = Edge::horizontal(bbox.x0, bbox.x1, bbox.top, EdgeSource::Stroke);
            try_push(&mut self.edges, edge, "capturing stroke edges")?;
        } else if w <= EDGE_MAX_WIDTH && h >= EDGE_MIN_LENGTH {
            let edge = Edge::vertical(bbox.x0, bbox.top, bbox.bottom, EdgeSource::Stroke);
            try_push(&mut self.edges, edge, "capturing stroke edges")?;
        }
        Ok(())
    }

    fn capture_fill(&mut self, bbox: &BBox) -> Result<()> {
        if bbox.width() > 0.0 && bbox.height() > 0.0 {
            reserve(&mut self.edges, 4, "capturing fill edges")?;
            self.edges.extend(edges_from_fill(bbox));
        }
        Ok(())
    }
}

impl DrawingHandler for EdgeCapture {
    fn on_path_painted(&mut self, event: PathEvent) -> Result<()> {
        if !event.bbox.is_finite() {
            return Ok(());
        }
        match event.paint_op {
            PaintOp::Stroke => self.capture_stroke(&event.bbox),
            PaintOp::Fill => self.capture_fill(&event.bbox),
            PaintOp::FillAndStroke => {
                self.capture_fill(&event.bbox)?;
                self.capture_stroke(&event.bbox)
            }
        }
    }
}
