// src/types.rs

use serde::{Deserialize, Serialize};

/// A pixel-space coordinate. Stored as f64 so history averaging and
/// perimeter interpolation stay sub-pixel; rounding happens only at the
/// transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Four corners in canonical order: clockwise on screen (y-down image
/// frame), index 0 at the corner nearest the top-left (minimal x + y).
/// Constructed only by `geometry::canonicalize` or by averaging quads that
/// already share that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    pub fn centroid(&self) -> Point {
        let sx: f64 = self.corners.iter().map(|p| p.x).sum();
        let sy: f64 = self.corners.iter().map(|p| p.y).sum();
        Point::new(sx / 4.0, sy / 4.0)
    }

    /// Edge lengths in corner order: 0-1, 1-2, 2-3, 3-0.
    pub fn edge_lengths(&self) -> [f64; 4] {
        let c = &self.corners;
        [
            crate::geometry::distance(c[0], c[1]),
            crate::geometry::distance(c[1], c[2]),
            crate::geometry::distance(c[2], c[3]),
            crate::geometry::distance(c[3], c[0]),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub frame: FrameConfig,
    pub tracking: TrackingConfig,
    pub traversal: TraversalConfig,
    pub transport: TransportConfig,
    pub replay: ReplayConfig,
    #[serde(default)]
    pub planner: Option<PlannerConfig>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Ring buffer capacity for the temporal average.
    pub history_size: usize,
    /// Minimum quality score a candidate must reach to be selected.
    pub min_quality: f64,
    /// Inward shrink per vertex, as a fraction of the shorter adjacent edge.
    pub border_offset_ratio: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            history_size: 7,
            min_quality: 0.6,
            border_offset_ratio: 0.12,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Perimeter units per 100 ms.
    pub speed: f64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self { speed: 0.02 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransportConfig {
    pub enabled: bool,
    pub min_interval_ms: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_ms: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub input_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub grid_path: String,
    pub entrance: [usize; 2],
    pub exit: [usize; 2],
    /// Pixel size of one grid cell, used to report path length.
    pub cell_size: f64,
}
