// src/main.rs

mod config;
mod geometry;
mod history;
mod planner;
mod quality;
mod selector;
mod stabilizer;
mod tracker;
mod transport;
mod traversal;
mod types;
mod vision;

use anyhow::Result;
use std::io::Read;
use std::sync::mpsc;
use tracker::QuadTracker;
use tracing::{error, info, warn};
use transport::{Command, RecordEmitter};
use types::{Config, PlannerConfig};
use vision::VisionSource;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "quadtrack=info".to_string()),
        )
        .init();

    info!("🎯 Quadrilateral tracking system starting");

    let config = Config::load("config.yaml")?;
    info!("✓ Configuration loaded");
    info!(
        "Tracking config: history={}, min_quality={:.2}, border_offset={:.2}, speed={:.3}/100ms",
        config.tracking.history_size,
        config.tracking.min_quality,
        config.tracking.border_offset_ratio,
        config.traversal.speed
    );

    if let Some(planner_config) = &config.planner {
        if let Err(e) = run_planner(planner_config) {
            warn!("Planner failed: {}. Continuing without a path.", e);
        }
    }

    let mut source = vision::JsonlReplay::open(&config.replay.input_path)?;
    info!("✓ Replay source ready: {}", config.replay.input_path);

    let mut tracker = QuadTracker::new(&config.tracking, &config.traversal);
    let mut emitter = RecordEmitter::new(std::io::stdout(), &config.transport, &config.frame);
    let commands = spawn_command_reader();

    let mut frame_count: u64 = 0;

    loop {
        while let Ok(cmd) = commands.try_recv() {
            apply_command(cmd, &mut tracker, &mut emitter);
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                error!("Frame read failed: {}", e);
                continue;
            }
        };
        frame_count += 1;

        let output = tracker.process_frame(&frame.candidates, frame.timestamp_ms);

        if let Err(e) = emitter.emit(&output, frame.timestamp_ms) {
            warn!("Transport write failed: {}", e);
        }

        if frame_count % 50 == 0 {
            info!(
                "Progress: frame {} | State: {} | Position: {:.2} | Score: {}",
                frame_count,
                tracker.state_name(),
                tracker.traversal_position(),
                output
                    .score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }

    let stats = tracker.stats();
    info!("\n📊 Final Report:");
    info!("  Total frames: {}", stats.frames_total);
    info!(
        "  Live detections: {} ({:.1}%)",
        stats.frames_detected,
        100.0 * stats.frames_detected as f64 / stats.frames_total.max(1) as f64
    );
    info!("  Bridged from history: {}", stats.frames_bridged);
    info!("  No target: {}", stats.frames_no_target);
    info!("  Records emitted: {}", emitter.records_emitted());

    Ok(())
}

fn apply_command<W: std::io::Write>(
    cmd: Command,
    tracker: &mut QuadTracker,
    emitter: &mut RecordEmitter<W>,
) {
    match cmd {
        Command::TogglePause => {
            let paused = tracker.toggle_pause();
            info!("Pause: {}", if paused { "ON" } else { "OFF" });
        }
        Command::Reset => {
            tracker.reset();
            info!("RESET");
        }
        Command::ToggleSend => {
            let enabled = emitter.toggle_enabled();
            info!("Send: {}", if enabled { "ON" } else { "OFF" });
        }
    }
}

/// Single-byte commands arrive on stdin; a reader thread forwards them so
/// the frame loop never blocks on the command channel.
fn spawn_command_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for byte in stdin.lock().bytes() {
            match byte {
                Ok(b) => {
                    if let Some(cmd) = Command::parse(b) {
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn run_planner(config: &PlannerConfig) -> Result<()> {
    let text = std::fs::read_to_string(&config.grid_path)?;
    let grid = planner::Grid::parse(&text)?;
    let start = (config.entrance[0], config.entrance[1]);
    let end = (config.exit[0], config.exit[1]);

    match planner::plan(&grid, start, end) {
        Some(path) => {
            let length = planner::path_length(&path, config.cell_size);
            info!(
                "✓ Planned path: {} cells, {:.1}px from {:?} to {:?}",
                path.len(),
                length,
                start,
                end
            );
        }
        None => warn!("No path from {:?} to {:?}", start, end),
    }
    Ok(())
}
