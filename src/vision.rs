// src/vision.rs

use crate::types::Point;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One frame's worth of detector output: a timestamp and zero or more raw
/// candidate polygons with no ordering or stability guarantees. Candidates
/// are kept as plain point lists here; point-count validation happens in
/// the canonicalizer.
#[derive(Debug, Clone)]
pub struct FrameDetections {
    pub timestamp_ms: f64,
    pub candidates: Vec<Vec<Point>>,
}

/// Boundary to the external vision module. The real system calls into a
/// camera and a rectangle detector; tests and offline runs replay recorded
/// detections instead.
pub trait VisionSource {
    /// Blocking fetch of the next frame's detections; `None` means the
    /// source is exhausted.
    fn next_frame(&mut self) -> Result<Option<FrameDetections>>;
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    timestamp_ms: f64,
    #[serde(default)]
    candidates: Vec<Vec<[f64; 2]>>,
}

/// Replays detector output from a JSONL file, one frame per line:
/// `{"timestamp_ms": 100.0, "candidates": [[[x, y], ...], ...]}`.
pub struct JsonlReplay<R> {
    reader: R,
    line: String,
    line_number: u64,
}

impl JsonlReplay<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("opening replay file {}", path.as_ref().display()))?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlReplay<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> VisionSource for JsonlReplay<R> {
    fn next_frame(&mut self) -> Result<Option<FrameDetections>> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line)?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            if self.line.trim().is_empty() {
                continue;
            }

            let record: FrameRecord = serde_json::from_str(self.line.trim())
                .with_context(|| format!("replay line {}", self.line_number))?;

            let candidates = record
                .candidates
                .into_iter()
                .map(|poly| poly.into_iter().map(|[x, y]| Point::new(x, y)).collect())
                .collect();

            return Ok(Some(FrameDetections {
                timestamp_ms: record.timestamp_ms,
                candidates,
            }));
        }
    }
}
