//! Search deadline
//!
//! The engines never own a clock. They poll a caller-supplied remaining-time
//! query before every node expansion and abort with [`SearchTimeout`] once the
//! remaining budget falls under a safety threshold.

use std::time::{Duration, Instant};

/// Default safety margin in milliseconds
pub const DEFAULT_TIMEOUT_THRESHOLD_MS: f64 = 20.0;

/// Raised when the remaining time drops below the threshold
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("search timed out with {remaining_ms:.1}ms left (threshold {threshold_ms:.1}ms)")]
pub struct SearchTimeout {
    pub remaining_ms: f64,
    pub threshold_ms: f64,
}

/// Cooperative cancellation check shared by all engines
pub struct Deadline<'a> {
    time_left: &'a dyn Fn() -> f64,
    threshold_ms: f64,
}

impl<'a> Deadline<'a> {
    pub fn new(time_left: &'a dyn Fn() -> f64, threshold_ms: f64) -> Self {
        Self {
            time_left,
            threshold_ms,
        }
    }

    /// Fresh reading of the remaining time, in milliseconds
    pub fn remaining_ms(&self) -> f64 {
        (self.time_left)()
    }

    pub fn check_time(&self) -> Result<(), SearchTimeout> {
        let remaining_ms = self.remaining_ms();
        if remaining_ms < self.threshold_ms {
            return Err(SearchTimeout {
                remaining_ms,
                threshold_ms: self.threshold_ms,
            });
        }
        Ok(())
    }
}

/// Wall-clock turn budget
#[derive(Clone, Copy, Debug)]
pub struct TurnTimer {
    start: Instant,
    limit: Duration,
}

impl TurnTimer {
    pub fn start(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Milliseconds left in the turn; negative once the budget is blown
    pub fn time_left_ms(&self) -> f64 {
        self.limit.as_secs_f64() * 1000.0 - self.elapsed().as_secs_f64() * 1000.0
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.limit
    }
}
