//! Frame timing for the viewer loop: smoothed FPS and periodic reporting.

use web_time::{Duration, Instant};

/// How often smoothed statistics are pushed to the UI.
pub const REPORT_INTERVAL: Duration = Duration::from_millis(250);

/// Frame timing with smoothed FPS and periodic reporting.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time statistics were reported
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a timer starting now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Mark the end of a frame. Returns seconds since the previous frame.
    pub fn end_frame(&mut self) -> f32 {
        self.end_frame_at(Instant::now())
    }

    fn end_frame_at(&mut self, now: Instant) -> f32 {
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// `true` at most once per [`REPORT_INTERVAL`].
    pub fn report_due(&mut self) -> bool {
        self.report_due_at(Instant::now())
    }

    fn report_due_at(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_report) < REPORT_INTERVAL {
            return false;
        }
        self.last_report = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_converges_towards_frame_rate() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start);
        let step = Duration::from_millis(10);
        let mut now = start;
        for _ in 0..500 {
            now += step;
            let dt = timing.end_frame_at(now);
            assert!((dt - 0.01).abs() < 1e-4);
        }
        assert!((timing.fps() - 100.0).abs() < 1.0);
    }

    #[test]
    fn reports_are_throttled() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start);
        assert!(!timing.report_due_at(start + Duration::from_millis(100)));
        assert!(timing.report_due_at(start + Duration::from_millis(260)));
        assert!(!timing.report_due_at(start + Duration::from_millis(300)));
        assert!(timing.report_due_at(start + Duration::from_millis(520)));
    }
}
