/// A 2D point in page space (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Orientation of an axis-aligned segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area, or 0.0 for degenerate boxes.
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Overlapping region, or `None` when the boxes do not overlap with positive area.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);
        (x1 > x0 && bottom > top).then(|| BBox::new(x0, top, x1, bottom))
    }

    /// Intersection over union. Zero when either box is degenerate.
    pub fn iou(&self, other: &BBox) -> f64 {
        let inter = self.intersection(other).map_or(0.0, |b| b.area());
        let union = self.area() + other.area() - inter;
        if union > 0.0 { inter / union } else { 0.0 }
    }

    /// Whether the box lies inside `outer` grown by `margin` on every side.
    pub fn within(&self, outer: &BBox, margin: f64) -> bool {
        self.x0 >= outer.x0 - margin
            && self.top >= outer.top - margin
            && self.x1 <= outer.x1 + margin
            && self.bottom <= outer.bottom + margin
    }

    pub fn contains_point(&self, x: f64, y: f64, margin: f64) -> bool {
        x >= self.x0 - margin && x <= self.x1 + margin && y >= self.top - margin && y <= self.bottom + margin
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.top.is_finite() && self.x1.is_finite() && self.bottom.is_finite()
    }
}

/// Fixed-point key used for sorting and exact comparison of coordinates.
pub(crate) fn float_key(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}
