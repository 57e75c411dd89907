//! Frame pacing

use std::time::{Duration, Instant};

/// Measures per-frame dt and sleeps out the rest of each frame budget
#[derive(Debug)]
pub struct FrameLimiter {
    budget: Duration,
    frame_start: Instant,
    last_start: Instant,
}

impl FrameLimiter {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            budget: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            frame_start: now,
            last_start: now,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Start a frame; returns seconds since the previous start. Stalls are
    /// passed through as-is.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_start).as_secs_f32();
        self.last_start = now;
        self.frame_start = now;
        dt
    }

    /// Sleep whatever is left of this frame's budget
    pub fn end_frame(&self) {
        let spent = self.frame_start.elapsed();
        if let Some(rest) = self.budget.checked_sub(spent) {
            std::thread::sleep(rest);
        } else {
            log::trace!("Frame over budget by {:?}", spent - self.budget);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_from_fps() {
        let limiter = FrameLimiter::new(50);
        assert_eq!(limiter.budget(), Duration::from_millis(20));
        assert_eq!(FrameLimiter::new(0).budget(), Duration::from_secs(1));
    }

    #[test]
    fn test_end_frame_fills_budget() {
        let mut limiter = FrameLimiter::new(100);
        limiter.begin_frame();
        limiter.end_frame();
        let dt = limiter.begin_frame();
        assert!(dt >= 0.009, "dt was {}", dt);
        assert!(dt < 0.5);
    }

    #[test]
    fn test_stall_passes_through() {
        let mut limiter = FrameLimiter::new(60);
        limiter.last_start -= Duration::from_secs(2);
        let dt = limiter.begin_frame();
        assert!(dt >= 1.9, "dt was {}", dt);
    }
}
