//! Frames-per-second counter, reported once per window.

use std::time::{Duration, Instant};

/// Length of one measurement window.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts frames and yields the average rate at the end of every window.
#[derive(Debug)]
pub struct FrameStats {
    window_start: Instant,
    frames: u32,
    total_frames: u64,
    last_fps: Option<f64>,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            total_frames: 0,
            last_fps: None,
        }
    }

    /// Count one frame presented at `now`. Returns the average FPS when a
    /// window has just closed.
    pub fn record_frame(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        self.total_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames = 0;
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// Rate measured over the last completed window.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}
