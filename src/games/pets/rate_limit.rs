//! Sliding-window limit on manual clicks.

use std::collections::VecDeque;

/// Sliding-window click gate.
#[derive(Clone, Debug)]
pub struct ClickRateLimiter {
    window_ms: f64,
    max_in_window: usize,
    stamps: VecDeque<f64>,
}

impl ClickRateLimiter {
    pub fn new(window_ms: u32, max_in_window: usize) -> Self {
        Self {
            window_ms: window_ms as f64,
            max_in_window,
            stamps: VecDeque::with_capacity(max_in_window),
        }
    }

    /// Record a click at `now_ms` if the window has room.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        while let Some(&oldest) = self.stamps.front() {
            if now_ms - oldest < self.window_ms {
                break;
            }
            self.stamps.pop_front();
        }
        if self.stamps.len() >= self.max_in_window {
            return false;
        }
        self.stamps.push_back(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.stamps.clear();
    }
}
