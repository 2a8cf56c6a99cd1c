//! Host-side frame clock
//!
//! Turns raw frame timestamps (seconds) into deltas for `Drill::tick`.
//! Stalls are clamped and a rebase drops the gap left by a pause or a
//! backgrounded window.

use crate::consts::MAX_FRAME_DELTA;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    /// Timestamp of the previous frame; None until the first frame or after a rebase
    last: Option<f64>,
    /// Largest delta a single frame may report
    max_delta: f32,
    /// Sum of every delta handed out
    total: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA)
    }
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            max_delta: max_delta.max(0.0),
            total: 0.0,
        }
    }

    /// Delta since the previous frame, clamped to `[0, max_delta]`.
    /// The first frame after construction or `rebase` reports zero.
    pub fn frame(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((now - last) as f32).clamp(0.0, self.max_delta),
            None => 0.0,
        };
        // Timestamps that go backwards still move the baseline
        self.last = Some(now);
        if dt.is_nan() {
            return 0.0;
        }
        self.total += dt as f64;
        dt
    }

    /// Forget the previous timestamp
    pub fn rebase(&mut self) {
        self.last = None;
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}
