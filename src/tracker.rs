// src/tracker.rs

use crate::selector;
use crate::stabilizer::Stabilizer;
use crate::traversal::PerimeterCursor;
use crate::types::{Point, Quad, TrackingConfig, TraversalConfig};
use tracing::debug;

/// What one processed frame produced for the downstream collaborators.
/// `target` and `score` are `Some` only when a stabilized quad exists for
/// the frame; a missing target is an outcome, not an error.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput {
    pub stabilized: Option<Quad>,
    pub target: Option<Point>,
    pub score: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TrackerStats {
    pub frames_total: u64,
    pub frames_detected: u64,
    pub frames_bridged: u64,
    pub frames_no_target: u64,
}

/// Owns all cross-frame state: the stabilizer (and its history ring), the
/// perimeter cursor, the pause flag and the last frame timestamp. One call
/// to `process_frame` per acquired frame, in arrival order.
pub struct QuadTracker {
    stabilizer: Stabilizer,
    cursor: PerimeterCursor,
    min_quality: f64,
    last_stabilized: Option<Quad>,
    last_timestamp_ms: Option<f64>,
    paused: bool,
    stats: TrackerStats,
}

impl QuadTracker {
    pub fn new(tracking: &TrackingConfig, traversal: &TraversalConfig) -> Self {
        Self {
            stabilizer: Stabilizer::new(tracking.history_size, tracking.border_offset_ratio),
            cursor: PerimeterCursor::new(traversal.speed),
            min_quality: tracking.min_quality,
            last_stabilized: None,
            last_timestamp_ms: None,
            paused: false,
            stats: TrackerStats::default(),
        }
    }

    pub fn process_frame(&mut self, candidates: &[Vec<Point>], timestamp_ms: f64) -> FrameOutput {
        let dt_ms = match self.last_timestamp_ms {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);
        self.stats.frames_total += 1;

        let selection = selector::select_best(candidates, self.min_quality);
        let score = selection.as_ref().map(|s| s.score);

        let stabilized = self.stabilizer.update(selection.as_ref().map(|s| &s.quad));

        match (&selection, &stabilized) {
            (Some(_), _) => self.stats.frames_detected += 1,
            (None, Some(_)) => {
                self.stats.frames_bridged += 1;
                debug!("no detection, bridging from history");
            }
            (None, None) => self.stats.frames_no_target += 1,
        }

        let target = match &stabilized {
            Some(quad) => {
                if !self.paused {
                    self.cursor.advance(dt_ms);
                }
                self.last_stabilized = Some(*quad);
                Some(self.cursor.point_on(quad))
            }
            None => None,
        };

        FrameOutput {
            stabilized,
            target,
            score,
        }
    }

    /// Toggle the pause flag; returns the new state. Pausing freezes the
    /// cursor but frames keep flowing into the history.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Rewind the cursor to position 0 and un-pause.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn traversal_position(&self) -> f64 {
        self.cursor.position()
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn state_name(&self) -> &'static str {
        if self.paused {
            "PAUSED"
        } else if self.last_stabilized.is_some() {
            "TRACKING"
        } else {
            "SEARCHING"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square_candidates() -> Vec<Vec<Point>> {
        vec![vec![
            p(0.0, 0.0),
            p(100.0, 0.0),
            p(100.0, 100.0),
            p(0.0, 100.0),
        ]]
    }

    fn tracker() -> QuadTracker {
        QuadTracker::new(&TrackingConfig::default(), &TraversalConfig::default())
    }

    #[test]
    fn test_cold_start_has_no_target() {
        let mut t = tracker();
        let out = t.process_frame(&[], 0.0);
        assert!(out.stabilized.is_none());
        assert!(out.target.is_none());
        assert!(out.score.is_none());
        assert_eq!(t.stats().frames_no_target, 1);
    }

    #[test]
    fn test_first_detection_starts_tracking() {
        let mut t = tracker();
        let out = t.process_frame(&square_candidates(), 0.0);
        assert!(out.stabilized.is_some());
        assert!(out.target.is_some());
        assert!((out.score.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(t.state_name(), "TRACKING");
    }

    #[test]
    fn test_pause_freezes_cursor() {
        let mut t = tracker();
        t.process_frame(&square_candidates(), 0.0);
        t.process_frame(&square_candidates(), 100.0);
        let frozen = t.traversal_position();
        assert!(frozen > 0.0);

        assert!(t.toggle_pause());
        t.process_frame(&square_candidates(), 200.0);
        t.process_frame(&square_candidates(), 300.0);
        assert_eq!(t.traversal_position(), frozen);

        // Un-pausing resumes from the frozen value, not from a jump over
        // the paused interval.
        assert!(!t.toggle_pause());
        t.process_frame(&square_candidates(), 400.0);
        let expected = frozen + 0.02 * 100.0 / 100.0;
        assert!((t.traversal_position() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_reset_rewinds_and_unpauses() {
        let mut t = tracker();
        t.process_frame(&square_candidates(), 0.0);
        t.process_frame(&square_candidates(), 500.0);
        t.toggle_pause();
        t.reset();
        assert_eq!(t.traversal_position(), 0.0);
        assert!(!t.is_paused());
    }

    #[test]
    fn test_occlusion_bridged_without_discontinuity() {
        // Frames 1-5 see a stable square, frame 6 sees nothing, frame 7
        // sees the square again. The stabilized quad must survive frame 6
        // and the target point must keep advancing smoothly.
        let mut t = tracker();
        let mut last_position = 0.0;
        let mut frame6_quad = None;

        for frame in 1..=7_u64 {
            let candidates = if frame == 6 {
                Vec::new()
            } else {
                square_candidates()
            };
            let ts = (frame - 1) as f64 * 100.0;
            let out = t.process_frame(&candidates, ts);

            assert!(out.stabilized.is_some(), "frame {} lost the quad", frame);
            assert!(out.target.is_some(), "frame {} lost the target", frame);

            let position = t.traversal_position();
            if frame > 1 {
                let step = position - last_position;
                assert!(
                    (step - 0.02).abs() < 1e-9,
                    "frame {} advanced by {} instead of 0.02",
                    frame,
                    step
                );
            }
            last_position = position;

            if frame == 6 {
                frame6_quad = out.stabilized;
            }
        }

        // The bridged quad is still (approximately) the square's averaging
        // rect: centered on (50, 50) with ~91px edges.
        let q = frame6_quad.unwrap();
        let c = q.centroid();
        assert!((c.x - 50.0).abs() < 1e-6);
        assert!((c.y - 50.0).abs() < 1e-6);

        let stats = t.stats();
        assert_eq!(stats.frames_total, 7);
        assert_eq!(stats.frames_detected, 6);
        assert_eq!(stats.frames_bridged, 1);
        assert_eq!(stats.frames_no_target, 0);
    }

    #[test]
    fn test_history_expiry_returns_to_searching() {
        let mut t = QuadTracker::new(
            &TrackingConfig {
                history_size: 3,
                ..TrackingConfig::default()
            },
            &TraversalConfig::default(),
        );
        t.process_frame(&square_candidates(), 0.0);
        t.process_frame(&[], 100.0);
        t.process_frame(&[], 200.0);
        let out = t.process_frame(&[], 300.0);
        assert!(out.stabilized.is_none());
        assert_eq!(t.stats().frames_no_target, 1);
    }

    #[test]
    fn test_low_quality_frame_counts_as_miss() {
        let mut t = tracker();
        t.process_frame(&square_candidates(), 0.0);
        // A sliver of a quad: well under the 0.6 threshold.
        let sliver = vec![vec![
            p(0.0, 0.0),
            p(300.0, 2.0),
            p(300.0, 8.0),
            p(0.0, 6.0),
        ]];
        let out = t.process_frame(&sliver, 100.0);
        assert!(out.score.is_none());
        assert!(out.stabilized.is_some(), "history should bridge the gap");
        assert_eq!(t.stats().frames_bridged, 1);
    }
}
