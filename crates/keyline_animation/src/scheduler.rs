//! Frame pacing
//!
//! The host calls [`FrameScheduler::poll`] from its own loop (a display-link
//! callback, a sleep loop, a test); the scheduler answers whether a frame is
//! due at the configured rate. Leftover time carries into the next frame so
//! the average rate does not drift.

use std::time::{Duration, Instant};

use crate::timeline::Timeline;

/// Decides when a timeline should tick
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    interval: Duration,
    then: Instant,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(fps: f64, now: Instant) -> Self {
        Self {
            interval: Self::interval_for(fps),
            then: now,
            frames: 0,
        }
    }

    fn interval_for(fps: f64) -> Duration {
        let fps = if fps > 0.0 { fps } else { Timeline::DEFAULT_FPS };
        Duration::from_secs_f64(1.0 / fps)
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.interval = Self::interval_for(fps);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames fired so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether a frame is due at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.then);
        if elapsed <= self.interval {
            return false;
        }
        let interval_ns = self.interval.as_nanos().max(1);
        let carry = Duration::from_nanos((elapsed.as_nanos() % interval_ns) as u64);
        self.then = now.checked_sub(carry).unwrap_or(now);
        self.frames += 1;
        true
    }

    /// Tick `timeline` by one frame if one is due
    pub fn drive(&mut self, timeline: &mut Timeline, now: Instant) -> bool {
        let due = self.poll(now);
        if due {
            timeline.tick(None);
        }
        due
    }
}
