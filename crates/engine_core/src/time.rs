//! Frame timing for the render loop.
//!
//! Orbital motion is advanced per frame, not per second, so this clock is only
//! used for diagnostics (FPS reporting).

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Frames counted in the current reporting window.
    window_frames: u32,
    /// Time accumulated in the current reporting window.
    window_time: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Length of one FPS reporting window.
    pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            window_frames: 0,
            window_time: Duration::ZERO,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        self.advance(Instant::now());
    }

    /// Advance the clock to `now`. Split out from `update` so it can be driven
    /// with synthetic instants.
    pub fn advance(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.window_frames += 1;
        self.window_time += self.delta;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }

    /// Returns the average FPS over the last reporting window once the window
    /// is full, then starts a new window.
    pub fn take_report(&mut self) -> Option<f32> {
        if self.window_time < Self::REPORT_INTERVAL {
            return None;
        }
        let fps = self.window_frames as f32 / self.window_time.as_secs_f32();
        self.window_frames = 0;
        self.window_time = Duration::ZERO;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_counts_frames_and_delta() {
        let mut time = Time::new();
        let start = time.last_frame;
        time.advance(start + Duration::from_millis(16));
        time.advance(start + Duration::from_millis(32));
        assert_eq!(time.frame_count(), 2);
        assert!((time.delta_seconds() - 0.016).abs() < 1e-4);
        assert!((time.fps() - 62.5).abs() < 0.1);
    }

    #[test]
    fn report_only_after_full_window() {
        let mut time = Time::new();
        let start = time.last_frame;
        for i in 1..=30 {
            time.advance(start + Duration::from_millis(20 * i));
        }
        assert!(time.take_report().is_none());
        for i in 31..=50 {
            time.advance(start + Duration::from_millis(20 * i));
        }
        let fps = time.take_report().expect("window is full");
        assert!((fps - 50.0).abs() < 0.5);
        assert!(time.take_report().is_none());
    }
}
