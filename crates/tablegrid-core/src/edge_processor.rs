//! Edge merging and intersection search.
//!
//! Captured edges are noisy: a single ruling line often arrives as several
//! overlapping strokes, or as the two long sides of a thin filled rectangle.
//! [`merge_edges`] snaps near-collinear edges to a shared position and joins
//! their spans; [`find_intersections`] then collects every crossing of a
//! vertical and a horizontal edge into a [`SpatialHash`].

use crate::edges::Edge;
use crate::error::{Result, reserve, try_push};
use crate::geometry::{Orientation, Point, float_key};
use crate::spatial_hash::SpatialHash;

/// Snap and join edges.
///
/// Edges of each orientation are processed independently:
///
/// 1. sort by the perpendicular coordinate, then by span start, on
///    fixed-point keys;
/// 2. cluster consecutive edges whose position is within `snap_tolerance`
///    of the cluster's running average, and snap the cluster to that average;
/// 3. inside a cluster, join spans whose gap to the running far endpoint is
///    within `join_tolerance`.
///
/// Snapped positions are kept on the fixed-point grid, so the result is a
/// fixed point: merging the output again returns it unchanged.
pub fn merge_edges(edges: &[Edge], snap_tolerance: f64, join_tolerance: f64) -> Result<Vec<Edge>> {
    let mut result = Vec::new();
    reserve(&mut result, edges.len(), "merging edges")?;

    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let mut group: Vec<Edge> = Vec::new();
        reserve(&mut group, edges.len(), "merging edges")?;
        group.extend(edges.iter().filter(|e| e.orientation == orientation).cloned());
        merge_group(group, snap_tolerance, join_tolerance, &mut result)?;
    }

    Ok(result)
}

fn merge_group(
    mut edges: Vec<Edge>,
    snap_tolerance: f64,
    join_tolerance: f64,
    out: &mut Vec<Edge>,
) -> Result<()> {
    if edges.is_empty() {
        return Ok(());
    }

    edges.sort_by_key(|e| (float_key(e.position()), float_key(e.span().0)));

    let snap_key = snap_tolerance * 1000.0;
    let mut cluster_start = 0;
    let mut sum = float_key(edges[0].position());
    let mut avg = sum;

    for i in 1..=edges.len() {
        if i < edges.len() {
            let key = float_key(edges[i].position());
            if (key - avg) as f64 <= snap_key {
                sum += key;
                avg = rounded_mean(sum, i + 1 - cluster_start);
                continue;
            }
        }

        let position = avg as f64 / 1000.0;
        join_cluster(&mut edges[cluster_start..i], position, join_tolerance, out)?;

        if i < edges.len() {
            cluster_start = i;
            sum = float_key(edges[i].position());
            avg = sum;
        }
    }

    Ok(())
}

fn rounded_mean(sum: i64, count: usize) -> i64 {
    (sum as f64 / count as f64).round() as i64
}

/// Join the spans of one snapped cluster into as few edges as possible.
fn join_cluster(
    cluster: &mut [Edge],
    position: f64,
    join_tolerance: f64,
    out: &mut Vec<Edge>,
) -> Result<()> {
    cluster.sort_by(|a, b| a.span().0.total_cmp(&b.span().0));

    let build = |proto: &Edge, start: f64, end: f64| -> Edge {
        match proto.orientation {
            Orientation::Horizontal => Edge::horizontal(start, end, position, proto.source),
            Orientation::Vertical => Edge::vertical(position, start, end, proto.source),
        }
    };

    let (mut cur_start, mut cur_end) = cluster[0].span();
    let mut proto = 0;
    for k in 1..cluster.len() {
        let (s, e) = cluster[k].span();
        if s - cur_end <= join_tolerance {
            cur_end = cur_end.max(e);
        } else {
            try_push(out, build(&cluster[proto], cur_start, cur_end), "joining edges")?;
            cur_start = s;
            cur_end = e;
            proto = k;
        }
    }
    try_push(out, build(&cluster[proto], cur_start, cur_end), "joining edges")
}

/// Insert every vertical/horizontal crossing into `hash`.
///
/// A crossing exists when the horizontal edge's y lies within the vertical
/// edge's span and the vertical edge's x lies within the horizontal edge's
/// span, both widened by `tolerance`. Duplicates are absorbed by the hash.
pub fn find_intersections(
    v_edges: &[Edge],
    h_edges: &[Edge],
    tolerance: f64,
    hash: &mut SpatialHash,
) -> Result<()> {
    for v in v_edges {
        let x = v.x0;
        for h in h_edges {
            let y = h.top;
            if y >= v.top - tolerance
                && y <= v.bottom + tolerance
                && x >= h.x0 - tolerance
                && x <= h.x1 + tolerance
            {
                hash.insert(Point::new(x, y))?;
            }
        }
    }
    Ok(())
}
