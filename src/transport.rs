// src/transport.rs

use crate::tracker::FrameOutput;
use crate::types::{FrameConfig, Point, TransportConfig};
use std::io::{self, Write};

/// Single-byte control commands arriving over the command channel.
/// Anything unrecognized is silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Reset,
    ToggleSend,
}

impl Command {
    pub fn parse(byte: u8) -> Option<Command> {
        match byte {
            b'P' => Some(Command::TogglePause),
            b'R' => Some(Command::Reset),
            b'S' => Some(Command::ToggleSend),
            _ => None,
        }
    }
}

/// Writes the per-frame ASCII records to a byte sink: `C` centroid, `T`
/// traversal target, `P` all four corners, or `E` when no stabilized quad
/// exists. At most one burst per frame, never two bursts closer than the
/// configured interval. Coordinates are rounded and clamped to the frame.
pub struct RecordEmitter<W: Write> {
    sink: W,
    enabled: bool,
    min_interval_ms: f64,
    last_emit_ms: Option<f64>,
    frame_width: u32,
    frame_height: u32,
    records_emitted: u64,
}

impl<W: Write> RecordEmitter<W> {
    pub fn new(sink: W, transport: &TransportConfig, frame: &FrameConfig) -> Self {
        Self {
            sink,
            enabled: transport.enabled,
            min_interval_ms: transport.min_interval_ms,
            last_emit_ms: None,
            frame_width: frame.width,
            frame_height: frame.height,
            records_emitted: 0,
        }
    }

    /// Toggle emission; returns the new state.
    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    pub fn emit(&mut self, output: &FrameOutput, timestamp_ms: f64) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(last) = self.last_emit_ms {
            if timestamp_ms - last < self.min_interval_ms {
                return Ok(());
            }
        }

        match &output.stabilized {
            Some(quad) => {
                let (cx, cy) = self.clamp(quad.centroid());
                writeln!(self.sink, "C,{},{}", cx, cy)?;
                self.records_emitted += 1;

                if let Some(target) = &output.target {
                    let (tx, ty) = self.clamp(*target);
                    writeln!(self.sink, "T,{},{}", tx, ty)?;
                    self.records_emitted += 1;
                }

                let c: Vec<(i64, i64)> = quad.corners.iter().map(|p| self.clamp(*p)).collect();
                writeln!(
                    self.sink,
                    "P,{},{},{},{},{},{},{},{}",
                    c[0].0, c[0].1, c[1].0, c[1].1, c[2].0, c[2].1, c[3].0, c[3].1
                )?;
                self.records_emitted += 1;
            }
            None => {
                writeln!(self.sink, "E,No rectangle detected")?;
                self.records_emitted += 1;
            }
        }

        self.sink.flush()?;
        self.last_emit_ms = Some(timestamp_ms);
        Ok(())
    }

    fn clamp(&self, p: Point) -> (i64, i64) {
        let x = (p.x.round() as i64).clamp(0, self.frame_width as i64 - 1);
        let y = (p.y.round() as i64).clamp(0, self.frame_height as i64 - 1);
        (x, y)
    }
}
