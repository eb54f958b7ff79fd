//! Frame timing
//!
//! Tracks the time between ticks and a coarse frames-per-second count,
//! sampled once per one-second window. Times are host milliseconds
//! (`performance.now()` in the browser).

use crate::game::constants::timing::RATE_WINDOW_MS;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    last_frame_ms: f64,
    last_sample_ms: f64,
    frame_count: u32,
}

impl FrameClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            last_frame_ms: start_ms,
            last_sample_ms: start_ms,
            frame_count: 0,
        }
    }

    /// Restart both the frame delta and the sampling window at `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        *self = Self::new(now_ms);
    }

    /// Seconds since the previous tick
    ///
    /// A host clock that goes backwards yields 0 rather than a negative delta.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt_ms = (now_ms - self.last_frame_ms).max(0.0);
        self.last_frame_ms = now_ms;
        (dt_ms / 1000.0) as f32
    }

    /// Count this frame, or close the window and emit its count
    ///
    /// Once more than one window has passed since the last emit, returns the
    /// frames counted in between and starts a new window at `now_ms` (the
    /// emitting frame itself is not counted). No smoothing across windows.
    pub fn sample(&mut self, now_ms: f64) -> Option<u32> {
        if now_ms > self.last_sample_ms + RATE_WINDOW_MS {
            let count = self.frame_count;
            self.last_sample_ms = now_ms;
            self.frame_count = 0;
            Some(count)
        } else {
            self.frame_count += 1;
            None
        }
    }

    /// Frames counted in the current window
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}
