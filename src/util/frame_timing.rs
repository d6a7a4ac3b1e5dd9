//! Ticker pacing: target-time scheduling and measured playback rate.

use web_time::{Duration, Instant};

/// Drift-corrected frame pacing with a smoothed measured rate.
///
/// Holds accumulate onto a running target time measured from the start, so
/// a slow step shortens the next wait instead of pushing every later frame
/// back.
pub struct FrameTiming {
    /// When pacing started
    start: Instant,
    /// Sum of all holds scheduled so far
    target: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Frames completed
    frames: u64,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Start pacing now, seeding the measured rate with `nominal_fps`.
    pub fn new(nominal_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            target: Duration::ZERO,
            last_frame: now,
            frames: 0,
            smoothed_fps: nominal_fps as f32,
            smoothing: 0.2,
        }
    }

    /// Schedule a hold and return how long is left to wait for it.
    ///
    /// Zero when pacing is already behind.
    pub fn schedule(&mut self, hold: Duration) -> Duration {
        self.target += hold;
        self.target.saturating_sub(self.start.elapsed())
    }

    /// Call after each completed frame to update the measured rate.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the measured FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
