// src/history.rs

use crate::types::{Point, Quad};
use std::collections::VecDeque;

/// Fixed-capacity ring of per-frame stabilized quads. Exactly one entry is
/// pushed per processed frame, detection or not; an absence occupies a slot
/// and dilutes the average until it falls off the back.
pub struct QuadHistory {
    entries: VecDeque<Option<Quad>>,
    capacity: usize,
}

impl QuadHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity);
        entries.resize(capacity, None);
        Self { entries, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Overwrite the oldest slot. The buffer always holds exactly
    /// `capacity` entries.
    pub fn push(&mut self, entry: Option<Quad>) {
        self.entries.pop_front();
        self.entries.push_back(entry);
    }

    /// Recency-weighted mean of the present entries, corner by corner.
    /// An entry of age `a` (0 = just pushed) weighs `capacity - a`; with
    /// the front of the deque oldest that is simply `index + 1`. Returns
    /// `None` when every slot is an absence.
    ///
    /// Corner-wise averaging is only meaningful because every stored quad
    /// shares the canonical winding and root corner.
    pub fn weighted_average(&self) -> Option<Quad> {
        let mut sums = [[0.0_f64; 2]; 4];
        let mut total_weight = 0.0_f64;

        for (index, entry) in self.entries.iter().enumerate() {
            let quad = match entry {
                Some(q) => q,
                None => continue,
            };
            let weight = (index + 1) as f64;
            total_weight += weight;
            for (j, corner) in quad.corners.iter().enumerate() {
                sums[j][0] += corner.x * weight;
                sums[j][1] += corner.y * weight;
            }
        }

        if total_weight <= 0.0 {
            return None;
        }

        let corners = [
            Point::new(sums[0][0] / total_weight, sums[0][1] / total_weight),
            Point::new(sums[1][0] / total_weight, sums[1][1] / total_weight),
            Point::new(sums[2][0] / total_weight, sums[2][1] / total_weight),
            Point::new(sums[3][0] / total_weight, sums[3][1] / total_weight),
        ];
        Some(Quad::new(corners))
    }
}
