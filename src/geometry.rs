// src/geometry.rs

use crate::types::{Point, Quad};
use thiserror::Error;

/// Signed areas smaller than this are treated as collapsed.
const AREA_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("candidate has {0} points, expected 4")]
    InvalidTopology(usize),
    #[error("degenerate quadrilateral")]
    DegenerateQuadrilateral,
}

pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

pub fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let sx: f64 = points.iter().map(|p| p.x).sum();
    let sy: f64 = points.iter().map(|p| p.y).sum();
    Point::new(sx / n, sy / n)
}

/// Shoelace area, halved. In the y-down image frame a positive sign means
/// the corners run clockwise as seen on screen; that sign is the winding
/// invariant every canonical quad satisfies.
pub fn signed_area(corners: &[Point; 4]) -> f64 {
    let mut sum = 0.0;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Reorder four unordered detector points into canonical form: clockwise
/// on screen, starting from the corner with minimal x + y. Sorting by
/// `atan2` about the centroid already yields screen-clockwise order in
/// y-down coordinates; the signed area is checked anyway and the order is
/// reversed if the sign disagrees.
pub fn canonicalize(points: &[Point]) -> Result<Quad, GeometryError> {
    if points.len() != 4 {
        return Err(GeometryError::InvalidTopology(points.len()));
    }

    let c = centroid(points);
    let mut corners: [Point; 4] = [points[0], points[1], points[2], points[3]];
    corners.sort_by(|a, b| {
        let aa = (a.y - c.y).atan2(a.x - c.x);
        let ab = (b.y - c.y).atan2(b.x - c.x);
        aa.partial_cmp(&ab).unwrap_or(std::cmp::Ordering::Equal)
    });

    let area = signed_area(&corners);
    if area.abs() < AREA_EPSILON {
        return Err(GeometryError::DegenerateQuadrilateral);
    }
    if area < 0.0 {
        corners.reverse();
    }

    // Root the ordering at the corner nearest the top-left.
    let mut min_index = 0;
    let mut min_sum = f64::INFINITY;
    for (i, p) in corners.iter().enumerate() {
        let s = p.x + p.y;
        if s < min_sum {
            min_sum = s;
            min_index = i;
        }
    }
    corners.rotate_left(min_index);

    Ok(Quad::new(corners))
}
