// src/traversal.rs

use crate::types::{Point, Quad};

/// A continuous position on the quad perimeter: [0, 4), integer part =
/// edge index, fractional part = how far along that edge. Advances at a
/// constant rate in perimeter-units per 100 ms and wraps at 4.
pub struct PerimeterCursor {
    position: f64,
    speed: f64,
}

impl PerimeterCursor {
    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            speed,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.position = (self.position + self.speed * dt_ms / 100.0).rem_euclid(4.0);
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
    }

    /// The pixel coordinate this cursor maps to on the given quad.
    pub fn point_on(&self, quad: &Quad) -> Point {
        point_on_perimeter(quad, self.position)
    }
}

/// Linear interpolation along edge `floor(position)` of the quad.
pub fn point_on_perimeter(quad: &Quad, position: f64) -> Point {
    let position = position.rem_euclid(4.0);
    let edge_index = position.floor() as usize % 4;
    let t = position - position.floor();

    let p0 = quad.corners[edge_index];
    let p1 = quad.corners[(edge_index + 1) % 4];
    Point::new(p0.x * (1.0 - t) + p1.x * t, p0.y * (1.0 - t) + p1.y * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Quad {
        Quad::new([
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ])
    }

    #[test]
    fn test_advance_accumulates() {
        let mut cursor = PerimeterCursor::new(0.02);
        cursor.advance(500.0);
        assert!((cursor.position() - 0.1).abs() < 1e-9);
        cursor.advance(500.0);
        assert!((cursor.position() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_at_four() {
        let mut cursor = PerimeterCursor::new(0.02);
        cursor.position = 3.9;
        cursor.advance(1000.0);
        assert!((cursor.position() - 0.1).abs() < 1e-9);
        // After the wrap the point lies on edge 0, not edge 3.
        let target = cursor.point_on(&square());
        assert!((target.x - 10.0).abs() < 1e-6);
        assert!(target.y.abs() < 1e-6);
    }

    #[test]
    fn test_point_on_each_edge() {
        let q = square();
        let top = point_on_perimeter(&q, 0.5);
        assert!((top.x - 50.0).abs() < 1e-9 && top.y.abs() < 1e-9);
        let right = point_on_perimeter(&q, 1.5);
        assert!((right.x - 100.0).abs() < 1e-9 && (right.y - 50.0).abs() < 1e-9);
        let bottom = point_on_perimeter(&q, 2.5);
        assert!((bottom.x - 50.0).abs() < 1e-9 && (bottom.y - 100.0).abs() < 1e-9);
        let left = point_on_perimeter(&q, 3.5);
        assert!(left.x.abs() < 1e-9 && (left.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_corner_positions() {
        let q = square();
        for i in 0..4 {
            let point = point_on_perimeter(&q, i as f64);
            assert_eq!(point, q.corners[i]);
        }
    }

    #[test]
    fn test_reset() {
        let mut cursor = PerimeterCursor::new(0.01);
        cursor.advance(12345.0);
        cursor.reset();
        assert_eq!(cursor.position(), 0.0);
    }
}
