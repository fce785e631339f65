//! Tick rate and tick cost tracking

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

/// Rolling measurement of how often ticks start and how long each one works.
///
/// `begin` marks the start of a tick, `end` marks the moment its barrier
/// released. The start-to-start interval gives the achieved tick rate, the
/// begin-to-end span gives the cost of dispatch plus barrier.
pub struct TickTimer {
    tick_start: Option<Instant>,
    intervals: RingBuffer<Duration>,
    work_times: RingBuffer<Duration>,
}

impl TickTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            tick_start: None,
            intervals: RingBuffer::new(capacity),
            work_times: RingBuffer::new(capacity),
        }
    }

    pub fn begin(&mut self) {
        let now = Instant::now();
        if let Some(previous) = self.tick_start {
            self.intervals.push(now.duration_since(previous));
        }
        self.tick_start = Some(now);
    }

    pub fn end(&mut self) {
        if let Some(start) = self.tick_start {
            self.work_times.push(start.elapsed());
        }
    }

    /// Measured ticks per second over the window; zero until two ticks began.
    pub fn rate(&self) -> f64 {
        let avg = self.intervals.average();
        if avg.as_secs_f64() > 0.0 {
            1.0 / avg.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn work_time_ms(&self) -> f64 {
        self.work_times.average().as_secs_f64() * 1000.0
    }

    pub fn work_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.work_times.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_rate_needs_two_ticks() {
        let mut timer = TickTimer::new(8);
        assert_eq!(timer.rate(), 0.0);

        timer.begin();
        timer.end();
        assert_eq!(timer.rate(), 0.0);
        assert!(timer.work_time_ms() >= 0.0);
    }

    #[test]
    fn test_rate_tracks_interval() {
        let mut timer = TickTimer::new(8);
        for _ in 0..4 {
            timer.begin();
            thread::sleep(Duration::from_millis(10));
            timer.end();
        }

        // Sleeping 10ms per tick caps the rate at 100 Hz
        let rate = timer.rate();
        assert!(rate > 0.0 && rate <= 100.0, "rate = {rate}");

        let (min, max) = timer.work_time_range_ms();
        assert!(min >= 10.0);
        assert!(max >= min);
    }
}
