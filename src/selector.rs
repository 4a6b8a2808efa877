// src/selector.rs

use crate::geometry::canonicalize;
use crate::quality;
use crate::types::{Point, Quad};
use tracing::debug;

/// The winning candidate of one frame, with the quality that selected it.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub quad: Quad,
    pub score: f64,
}

/// Pick the best-quality candidate above `min_quality`. Candidates that
/// fail canonicalization or scoring are dropped for this frame; a bad
/// detector output is never an error, just a non-detection.
pub fn select_best(candidates: &[Vec<Point>], min_quality: f64) -> Option<Selection> {
    let mut best: Option<Selection> = None;

    for (i, raw) in candidates.iter().enumerate() {
        let quad = match canonicalize(raw) {
            Ok(q) => q,
            Err(e) => {
                debug!("candidate {} discarded: {}", i, e);
                continue;
            }
        };
        let score = match quality::score(&quad) {
            Ok(s) => s,
            Err(e) => {
                debug!("candidate {} discarded: {}", i, e);
                continue;
            }
        };
        if score <= min_quality {
            continue;
        }
        if best.map_or(true, |b| score > b.score) {
            best = Some(Selection { quad, score });
        }
    }

    best
}
