//! Deterministic time system
//!
//! Simulated time advances one unit per tick; wall-clock pacing is kept
//! separate so a slow frame never changes how far particles move.

use std::time::{Duration, Instant};

/// Simulated time step per tick. Speeds are expressed per tick.
pub const TICK_DT: f64 = 1.0;

/// Simulation tick counter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTime {
    tick_count: u64,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self { tick_count: 0 }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance_tick(&mut self) {
        self.tick_count += 1;
    }

    /// Total simulated time in tick units.
    pub fn total_time(&self) -> f64 {
        self.tick_count as f64 * TICK_DT
    }
}

/// Fixed-rate deadline generator.
///
/// Each deadline is the previous deadline plus the interval, never
/// `now + interval`, so an overrunning tick delays only itself and the
/// schedule keeps its phase.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    next_deadline: Instant,
}

impl TickClock {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    /// The first deadline lands one interval after `start`.
    pub fn starting_at(start: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Time left to wait before the pending deadline; zero once it passed.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }

    /// How far `now` is past the pending deadline.
    pub fn lag(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.next_deadline)
    }

    /// Consume the pending deadline and schedule the next one.
    pub fn advance(&mut self) -> Instant {
        let fired = self.next_deadline;
        self.next_deadline += self.interval;
        fired
    }
}
