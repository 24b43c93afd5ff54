//! Edge derivation from painted paths.
//!
//! Edges are axis-aligned line segments taken from thin stroked paths and
//! from the perimeter of filled rectangles. They are the raw material of
//! grid table detection.

use crate::geometry::{BBox, Orientation};

/// Source of an edge, tracking which painted primitive it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeSource {
    /// A thin stroked path (a ruling line).
    Stroke,
    /// Top side of a filled rectangle.
    FillTop,
    /// Bottom side of a filled rectangle.
    FillBottom,
    /// Left side of a filled rectangle.
    FillLeft,
    /// Right side of a filled rectangle.
    FillRight,
}

/// A line segment edge for table detection.
///
/// Horizontal edges have `top == bottom`; vertical edges have `x0 == x1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    /// Edge orientation.
    pub orientation: Orientation,
    /// Where this edge was derived from.
    pub source: EdgeSource,
}

impl Edge {
    /// Horizontal edge at `y` spanning `x0..x1`.
    pub fn horizontal(x0: f64, x1: f64, y: f64, source: EdgeSource) -> Self {
        Self {
            x0: x0.min(x1),
            top: y,
            x1: x0.max(x1),
            bottom: y,
            orientation: Orientation::Horizontal,
            source,
        }
    }

    /// Vertical edge at `x` spanning `top..bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64, source: EdgeSource) -> Self {
        Self {
            x0: x,
            top: top.min(bottom),
            x1: x,
            bottom: top.max(bottom),
            orientation: Orientation::Vertical,
            source,
        }
    }

    /// Coordinate on the axis perpendicular to the edge (y for horizontal, x for vertical).
    pub fn position(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.top,
            Orientation::Vertical => self.x0,
        }
    }

    /// Start and end along the edge direction.
    pub fn span(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.x0, self.x1),
            Orientation::Vertical => (self.top, self.bottom),
        }
    }

    pub fn length(&self) -> f64 {
        let (start, end) = self.span();
        end - start
    }
}

/// Derive 4 Edges from a filled rectangle (top, bottom, left, right).
pub fn edges_from_fill(rect: &BBox) -> [Edge; 4] {
    [
        Edge::horizontal(rect.x0, rect.x1, rect.top, EdgeSource::FillTop),
        Edge::horizontal(rect.x0, rect.x1, rect.bottom, EdgeSource::FillBottom),
        Edge::vertical(rect.x0, rect.top, rect.bottom, EdgeSource::FillLeft),
        Edge::vertical(rect.x1, rect.top, rect.bottom, EdgeSource::FillRight),
    ]
}

/// Split a mixed edge list into `(horizontal, vertical)` sets.
pub fn split_by_orientation(edges: Vec<Edge>) -> (Vec<Edge>, Vec<Edge>) {
    edges
        .into_iter()
        .partition(|e| e.orientation == Orientation::Horizontal)
}
