// src/quality.rs

use crate::geometry::GeometryError;
use crate::types::Quad;

/// How rectangle-like a canonical quad is, in [0, 1]. Edge-length
/// uniformity carries 60% of the score and closeness of the interior
/// angles to 90 degrees the remaining 40%; angle deviation is normalized
/// against a worst case of 45 degrees.
pub fn score(quad: &Quad) -> Result<f64, GeometryError> {
    let edges = quad.edge_lengths();
    let max_edge = edges.iter().cloned().fold(0.0_f64, f64::max);
    let min_edge = edges.iter().cloned().fold(f64::INFINITY, f64::min);
    if max_edge <= 0.0 || min_edge <= 0.0 {
        return Err(GeometryError::DegenerateQuadrilateral);
    }
    let edge_score = 1.0 - (max_edge - min_edge) / max_edge;

    let mut deviation_sum = 0.0;
    for i in 0..4 {
        let prev = quad.corners[(i + 3) % 4];
        let curr = quad.corners[i];
        let next = quad.corners[(i + 1) % 4];

        let v1 = (prev.x - curr.x, prev.y - curr.y);
        let v2 = (next.x - curr.x, next.y - curr.y);

        let v1_len = edges[(i + 3) % 4];
        let v2_len = edges[i];

        let cos_theta = ((v1.0 * v2.0 + v1.1 * v2.1) / (v1_len * v2_len)).clamp(-1.0, 1.0);
        let angle_deg = cos_theta.acos().to_degrees();
        deviation_sum += (angle_deg - 90.0).abs();
    }
    let angle_deviation = deviation_sum / 4.0;
    let angle_score = (1.0 - angle_deviation / 45.0).clamp(0.0, 1.0);

    Ok(0.6 * edge_score + 0.4 * angle_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::canonicalize;
    use crate::types::Point;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn quad_of(points: [Point; 4]) -> Quad {
        canonicalize(&points).unwrap()
    }

    #[test]
    fn test_perfect_square_scores_one() {
        let quad = quad_of([p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0), p(0.0, 100.0)]);
        let s = score(&quad).unwrap();
        assert!((s - 1.0).abs() < 1e-9, "square scored {}", s);
    }

    #[test]
    fn test_two_to_one_rectangle() {
        // Right angles everywhere, but edges 200 vs 100:
        // edge_score = 0.5, angle_score = 1.0 => 0.6 * 0.5 + 0.4 = 0.7
        let quad = quad_of([p(0.0, 0.0), p(200.0, 0.0), p(200.0, 100.0), p(0.0, 100.0)]);
        let s = score(&quad).unwrap();
        assert!((s - 0.7).abs() < 1e-9, "rectangle scored {}", s);
    }

    #[test]
    fn test_score_bounds() {
        let shapes = [
            [p(0.0, 0.0), p(120.0, 10.0), p(110.0, 90.0), p(5.0, 100.0)],
            [p(10.0, 0.0), p(200.0, 40.0), p(180.0, 60.0), p(0.0, 30.0)],
            [p(0.0, 50.0), p(60.0, 0.0), p(120.0, 50.0), p(60.0, 100.0)],
        ];
        for corners in shapes {
            let quad = quad_of(corners);
            let s = score(&quad).unwrap();
            assert!((0.0..=1.0).contains(&s), "score {} out of bounds", s);
        }
    }

    #[test]
    fn test_zero_length_edge_fails() {
        // Two coincident corners give a zero edge. Such a shape cannot come
        // out of canonicalize, so build the quad directly.
        let quad = Quad::new([p(0.0, 0.0), p(0.0, 0.0), p(100.0, 0.0), p(50.0, 80.0)]);
        assert_eq!(score(&quad), Err(GeometryError::DegenerateQuadrilateral));
    }

    #[test]
    fn test_tilted_square_still_scores_high() {
        // 45-degree rotated square: equal edges, right angles.
        let quad = quad_of([p(50.0, 0.0), p(100.0, 50.0), p(50.0, 100.0), p(0.0, 50.0)]);
        let s = score(&quad).unwrap();
        assert!((s - 1.0).abs() < 1e-9, "tilted square scored {}", s);
    }
}
