// src/stabilizer.rs

use crate::geometry::distance;
use crate::history::QuadHistory;
use crate::types::{Point, Quad};

/// Turns per-frame detections into a jitter-free quad. Live detections are
/// compensated for detector bias, pushed into the history ring and replaced
/// by the recency-weighted average; missed frames push an absence and fall
/// back to whatever the history still holds.
pub struct Stabilizer {
    history: QuadHistory,
    border_offset_ratio: f64,
}

impl Stabilizer {
    pub fn new(history_size: usize, border_offset_ratio: f64) -> Self {
        Self {
            history: QuadHistory::new(history_size),
            border_offset_ratio,
        }
    }

    /// One call per frame. `None` means the selector found nothing.
    pub fn update(&mut self, detection: Option<&Quad>) -> Option<Quad> {
        let entry = detection.map(|quad| averaging_rect(quad, self.border_offset_ratio));
        self.history.push(entry);
        self.history.weighted_average()
    }
}

/// The raw detector systematically lands outside the physical border. The
/// quad fed to history is the midpoint between the detection and an inset
/// copy shrunk by `ratio` of the shorter adjacent edge pair, pulling each
/// corner inward along its interior-angle bisector.
fn averaging_rect(quad: &Quad, ratio: f64) -> Quad {
    let w = distance(quad.corners[0], quad.corners[1]);
    let h = distance(quad.corners[1], quad.corners[2]);
    let border = w.min(h) * ratio;

    let mut corners = quad.corners;
    for i in 0..4 {
        let prev = quad.corners[(i + 3) % 4];
        let curr = quad.corners[i];
        let next = quad.corners[(i + 1) % 4];

        let v1 = normalize(prev.x - curr.x, prev.y - curr.y);
        let v2 = normalize(next.x - curr.x, next.y - curr.y);
        let bisector = normalize(v1.0 + v2.0, v1.1 + v2.1);

        let inner_x = curr.x + bisector.0 * border;
        let inner_y = curr.y + bisector.1 * border;
        corners[i] = Point::new((curr.x + inner_x) / 2.0, (curr.y + inner_y) / 2.0);
    }
    Quad::new(corners)
}

fn normalize(x: f64, y: f64) -> (f64, f64) {
    let len = (x * x + y * y).sqrt();
    if len > 0.0 {
        (x / len, y / len)
    } else {
        (0.0, 0.0)
    }
}
