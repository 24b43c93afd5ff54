//! Tolerance-aware point set used to collect edge intersections.
//!
//! Points are bucketed on a uniform grid and chained through an index-linked
//! node arena. Chains refer to nodes by index, so growing the arena never
//! invalidates them.

use crate::error::{Result, reserve};
use crate::geometry::Point;

/// Side length of one grid cell, in page units.
pub const GRID_CELL_SIZE: f64 = 2.0;

/// Two points closer than this in both axes are considered the same point.
pub const POINT_TOLERANCE: f64 = 0.1;

/// Number of hash buckets (a power of two).
pub const HASH_SIZE: usize = 4096;

const INITIAL_POOL: usize = 256;
const PRIME_X: i64 = 73_856_093;
const PRIME_Y: i64 = 19_349_663;

#[derive(Debug, Clone)]
struct Node {
    point: Point,
    next: Option<usize>,
}

/// Set of points with tolerance-based de-duplication.
///
/// No two stored points are within [`POINT_TOLERANCE`] of each other in both
/// axes. Points are returned in insertion order.
#[derive(Debug, Clone)]
pub struct SpatialHash {
    buckets: Vec<Option<usize>>,
    nodes: Vec<Node>,
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new()
    }
}

fn grid_cell(v: f64) -> i64 {
    (v / GRID_CELL_SIZE).floor() as i64
}

fn bucket_index(cx: i64, cy: i64) -> usize {
    let h = cx.wrapping_mul(PRIME_X) ^ cy.wrapping_mul(PRIME_Y);
    (h as u64 as usize) & (HASH_SIZE - 1)
}

impl SpatialHash {
    pub fn new() -> Self {
        Self {
            buckets: vec![None; HASH_SIZE],
            nodes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a point within tolerance of `(x, y)` is stored.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let (cx, cy) = (grid_cell(x), grid_cell(y));
        for dy in -1..=1 {
            for dx in -1..=1 {
                let mut cursor = self.buckets[bucket_index(cx + dx, cy + dy)];
                while let Some(idx) = cursor {
                    let node = &self.nodes[idx];
                    if (node.point.x - x).abs() <= POINT_TOLERANCE
                        && (node.point.y - y).abs() <= POINT_TOLERANCE
                    {
                        return true;
                    }
                    cursor = node.next;
                }
            }
        }
        false
    }

    /// Insert a point unless a near-duplicate is already stored.
    ///
    /// Returns `Ok(true)` when the point was stored, `Ok(false)` when it was a
    /// duplicate (or not finite).
    pub fn insert(&mut self, point: Point) -> Result<bool> {
        if !point.x.is_finite() || !point.y.is_finite() || self.contains(point.x, point.y) {
            return Ok(false);
        }
        if self.nodes.len() == self.nodes.capacity() {
            let grow = self.nodes.capacity().max(INITIAL_POOL);
            reserve(&mut self.nodes, grow, "growing the spatial hash pool")?;
        }
        let bucket = bucket_index(grid_cell(point.x), grid_cell(point.y));
        let idx = self.nodes.len();
        self.nodes.push(Node {
            point,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(idx);
        Ok(true)
    }

    /// Move every stored point into `out` in insertion order, leaving the set empty.
    pub fn drain_into(&mut self, out: &mut Vec<Point>) -> Result<()> {
        reserve(out, self.nodes.len(), "draining the spatial hash")?;
        out.extend(self.nodes.drain(..).map(|n| n.point));
        self.buckets.fill(None);
        Ok(())
    }

    /// Stored points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.nodes.iter().map(|n| n.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut hash = SpatialHash::new();
        assert!(hash.insert(Point::new(10.0, 20.0)).unwrap());
        assert!(hash.contains(10.0, 20.0));
        assert!(hash.contains(10.05, 19.95));
        assert!(!hash.contains(10.2, 20.0));
        assert_eq!(hash.len(), 1);
    }

    #[test]
    fn test_duplicate_within_tolerance_rejected() {
        let mut hash = SpatialHash::new();
        assert!(hash.insert(Point::new(10.0, 20.0)).unwrap());
        assert!(!hash.insert(Point::new(10.08, 20.09)).unwrap());
        assert_eq!(hash.len(), 1);
    }

    #[test]
    fn test_duplicate_across_grid_cell_border() {
        // 1.98 and 2.03 fall into different grid cells.
        let mut hash = SpatialHash::new();
        assert!(hash.insert(Point::new(1.98, 5.0)).unwrap());
        assert!(!hash.insert(Point::new(2.03, 5.0)).unwrap());
        assert!(hash.insert(Point::new(20.0, 3.98)).unwrap());
        assert!(!hash.insert(Point::new(20.0, 4.05)).unwrap());
        assert_eq!(hash.len(), 2);
    }

    #[test]
    fn test_distinct_points_kept() {
        let mut hash = SpatialHash::new();
        for i in 0..10 {
            assert!(hash.insert(Point::new(i as f64 * 0.5, 0.0)).unwrap());
        }
        assert_eq!(hash.len(), 10);
    }

    #[test]
    fn test_growth_preserves_chains() {
        let mut hash = SpatialHash::new();
        // Far more points than the initial pool, many sharing buckets.
        for i in 0..2000 {
            let p = Point::new((i % 50) as f64 * 3.0, (i / 50) as f64 * 3.0);
            assert!(hash.insert(p).unwrap());
        }
        assert_eq!(hash.len(), 2000);
        for i in 0..2000 {
            assert!(hash.contains((i % 50) as f64 * 3.0, (i / 50) as f64 * 3.0));
        }
    }

    #[test]
    fn test_negative_coordinates() {
        let mut hash = SpatialHash::new();
        assert!(hash.insert(Point::new(-3.0, -7.5)).unwrap());
        assert!(hash.contains(-3.0, -7.5));
        assert!(!hash.insert(Point::new(-3.05, -7.45)).unwrap());
    }

    #[test]
    fn test_non_finite_ignored() {
        let mut hash = SpatialHash::new();
        assert!(!hash.insert(Point::new(f64::NAN, 1.0)).unwrap());
        assert!(!hash.insert(Point::new(1.0, f64::INFINITY)).unwrap());
        assert!(hash.is_empty());
    }

    #[test]
    fn test_drain_into_insertion_order() {
        let mut hash = SpatialHash::new();
        hash.insert(Point::new(5.0, 5.0)).unwrap();
        hash.insert(Point::new(1.0, 1.0)).unwrap();
        hash.insert(Point::new(9.0, 2.0)).unwrap();

        let mut out = Vec::new();
        hash.drain_into(&mut out).unwrap();
        assert_eq!(
            out,
            vec![Point::new(5.0, 5.0), Point::new(1.0, 1.0), Point::new(9.0, 2.0)]
        );
        assert!(hash.is_empty());
        assert!(!hash.contains(5.0, 5.0));
    }

    #[test]
    fn test_no_pair_within_tolerance() {
        let mut hash = SpatialHash::new();
        for i in 0..400 {
            let x = (i % 20) as f64 * 0.07;
            let y = (i / 20) as f64 * 0.07;
            hash.insert(Point::new(x, y)).unwrap();
        }
        let pts: Vec<Point> = hash.points().collect();
        for (i, a) in pts.iter().enumerate() {
            for b in &pts[i + 1..] {
                let close = (a.x - b.x).abs() <= POINT_TOLERANCE
                    && (a.y - b.y).abs() <= POINT_TOLERANCE;
                assert!(!close, "{a:?} and {b:?} are within tolerance");
            }
        }
    }
}
