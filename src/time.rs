//! Monotonic game clock for continuous accrual.
//!
//! The host calls `update()` once per animation frame with a monotonic
//! timestamp (`performance.now()` or similar). Unlike a fixed-timestep
//! clock, every elapsed millisecond is credited: a tab that was suspended
//! for an hour earns an hour of accrual on the next frame.

pub struct GameClock {
    /// Timestamp of the last update (ms), None before the first frame.
    last_timestamp: Option<f64>,
    /// Total credited milliseconds since creation.
    pub total_ms: f64,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            total_ms: 0.0,
        }
    }

    /// Feed a monotonic timestamp and return the elapsed seconds since the
    /// previous frame.
    ///
    /// The first frame yields zero. A timestamp that goes backwards or is
    /// not finite yields zero and does not move the reference point
    /// backwards, so elapsed time is never negative.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let delta = match self.last_timestamp {
            Some(prev) if now_ms > prev => now_ms - prev,
            Some(_) => 0.0,
            None => 0.0,
        };
        if self.last_timestamp.map_or(true, |prev| now_ms > prev) {
            self.last_timestamp = Some(now_ms);
        }
        self.total_ms += delta;
        delta / 1000.0
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
