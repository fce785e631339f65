//! Ricochet Metrics - tick telemetry for the simulation scheduler
//!
//! Provides zero-cost abstractions for timing ticks that completely
//! vanish in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use ricochet_metrics::TickTimer;
//!
//! let mut timer = TickTimer::new(60); // Track last 60 ticks
//! timer.begin();
//! // ... dispatch and join the tick ...
//! timer.end();
//! println!("TPS: {:.1}", timer.rate());
//! ```
//!
//! Without the `metrics` feature every call is a no-op and every
//! reading is zero.

#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod tick_timer;

#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;
#[cfg(feature = "metrics")]
pub use tick_timer::TickTimer;

// ============================================================================
// Macros for conditional compilation
// ============================================================================

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct TickTimer;

#[cfg(not(feature = "metrics"))]
impl TickTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn rate(&self) -> f64 { 0.0 }
    pub fn work_time_ms(&self) -> f64 { 0.0 }
    pub fn work_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_timer_api_is_available() {
        // Same surface with or without the feature
        let mut timer = super::TickTimer::new(60);
        timer.begin();
        timer.end();
        assert!(timer.rate() >= 0.0);
        assert!(timer.work_time_ms() >= 0.0);

        let mut buffer = super::RingBuffer::<std::time::Duration>::new(4);
        buffer.push(std::time::Duration::from_millis(1));
        assert!(buffer.len() <= 1);
    }
}
