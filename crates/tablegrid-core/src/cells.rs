//! Cell assembly from intersection points.

use tracing::debug;

use crate::error::{Result, reserve, try_push};
use crate::geometry::{BBox, Point};
use crate::settings::PageTolerances;

/// Containment (intersection / smaller area) above which the larger cell is dropped.
pub const CONTAINMENT_THRESHOLD: f64 = 0.9;

/// IoU above which the larger of two overlapping cells is dropped.
pub const IOU_THRESHOLD: f64 = 0.6;

/// Merge points closer than `distance` in both axes into their centroid.
fn premerge_points(points: &[Point], distance: f64) -> Result<Vec<Point>> {
    // (sum_x, sum_y, count)
    let mut clusters: Vec<(f64, f64, usize)> = Vec::new();
    reserve(&mut clusters, points.len(), "merging intersection points")?;

    for p in points {
        let hit = clusters.iter_mut().find(|(sx, sy, n)| {
            let cx = *sx / *n as f64;
            let cy = *sy / *n as f64;
            (p.x - cx).abs() < distance && (p.y - cy).abs() < distance
        });
        match hit {
            Some((sx, sy, n)) => {
                *sx += p.x;
                *sy += p.y;
                *n += 1;
            }
            None => clusters.push((p.x, p.y, 1)),
        }
    }

    Ok(clusters
        .into_iter()
        .map(|(sx, sy, n)| Point::new(sx / n as f64, sy / n as f64))
        .collect())
}

/// Build candidate cells from intersection points.
///
/// For every top-left corner `p1`, each point `p2` to its right on the same
/// row becomes a top-right corner. The first point `p3` straight below `p1`
/// closes the cell. The bottom-right corner is not required: grids with
/// merged cells or missing rulings still produce the rectangle.
///
/// Cells outside `[min_cell, max_cell_width]` × `[min_cell, max_cell_height]`
/// are discarded.
pub fn find_cells(points: &[Point], tol: &PageTolerances) -> Result<Vec<BBox>> {
    let mut cells = Vec::new();
    if points.len() < 4 {
        return Ok(cells);
    }

    let mut pts = premerge_points(points, tol.point_merge)?;
    pts.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let eps = tol.intersection;
    let mut lenient = 0usize;

    for p1 in &pts {
        let Some(p3) = pts
            .iter()
            .filter(|p| p.y > p1.y + eps)
            .find(|p| (p.x - p1.x).abs() <= eps)
        else {
            continue;
        };

        for p2 in &pts {
            if (p2.y - p1.y).abs() > eps || p2.x <= p1.x + eps {
                continue;
            }

            let has_corner = pts
                .iter()
                .any(|p4| (p4.x - p2.x).abs() <= eps && (p4.y - p3.y).abs() <= eps);
            if !has_corner {
                lenient += 1;
            }

            let cell = BBox::new(p1.x, p1.y, p2.x, p3.y);
            let (w, h) = (cell.width(), cell.height());
            if w >= tol.min_cell
                && w <= tol.max_cell_width
                && h >= tol.min_cell
                && h <= tol.max_cell_height
            {
                try_push(&mut cells, cell, "assembling cells")?;
            }
        }
    }

    debug!(
        points = pts.len(),
        cells = cells.len(),
        lenient,
        "assembled candidate cells"
    );
    Ok(cells)
}

/// Drop cells that stick out of the page by more than `margin`; clip the rest.
pub fn clip_cells_to_page(cells: Vec<BBox>, page: &BBox, margin: f64) -> Vec<BBox> {
    cells
        .into_iter()
        .filter(|c| c.within(page, margin))
        .filter_map(|c| c.intersection(page))
        .collect()
}

/// Non-maximum suppression over candidate cells.
///
/// For each overlapping pair, when the containment ratio exceeds
/// [`CONTAINMENT_THRESHOLD`] or the IoU exceeds [`IOU_THRESHOLD`], the larger
/// cell is discarded. On equal areas the first cell is discarded.
pub fn deduplicate_cells(cells: Vec<BBox>) -> Vec<BBox> {
    let n = cells.len();
    let mut removed = vec![false; n];

    for i in 0..n {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..n {
            if removed[j] {
                continue;
            }
            let (a, b) = (&cells[i], &cells[j]);
            let Some(inter) = a.intersection(b) else {
                continue;
            };
            let (area_a, area_b) = (a.area(), b.area());
            let smaller = area_a.min(area_b);
            if smaller <= 0.0 {
                continue;
            }
            let duplicate =
                inter.area() / smaller > CONTAINMENT_THRESHOLD || a.iou(b) > IOU_THRESHOLD;
            if !duplicate {
                continue;
            }
            if area_b > area_a {
                removed[j] = true;
            } else {
                removed[i] = true;
                break;
            }
        }
    }

    let kept: Vec<BBox> = cells
        .into_iter()
        .zip(removed)
        .filter_map(|(c, r)| (!r).then_some(c))
        .collect();
    debug!(before = n, after = kept.len(), "deduplicated cells");
    kept
}
