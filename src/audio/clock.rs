// Audio clock - the shared sample counter the scheduler times against
// Advanced by the audio callback, read from the worker thread

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared audio-clock state
/// Event timestamps are taken on this clock, never on wall time, so timer
/// jitter in the worker cannot reach the rendered clicks
#[derive(Clone)]
pub struct SampleClock {
    /// Current sample position (incremented by the audio callback)
    position: Arc<AtomicU64>,
    /// Sample rate, for timestamp conversions
    sample_rate: f64,
}

impl SampleClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            position: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate as f64,
        }
    }

    /// Current sample position (called from the worker thread)
    pub fn current_sample(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    /// Advance the position (called from the audio callback)
    pub fn advance(&self, frames: usize) {
        self.position.fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Current time in seconds on the audio clock
    pub fn now_seconds(&self) -> f64 {
        self.current_sample() as f64 / self.sample_rate
    }

    /// Convert an absolute audio-clock time to a sample position
    pub fn seconds_to_samples(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate).round() as u64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = SampleClock::new(48000.0);
        assert_eq!(clock.current_sample(), 0);
        assert_eq!(clock.now_seconds(), 0.0);
        assert_eq!(clock.sample_rate(), 48000.0);
    }

    #[test]
    fn test_advance() {
        let clock = SampleClock::new(48000.0);
        clock.advance(480);
        assert_eq!(clock.current_sample(), 480);
        clock.advance(480);
        assert_eq!(clock.current_sample(), 960);
    }

    #[test]
    fn test_now_seconds() {
        let clock = SampleClock::new(48000.0);
        clock.advance(24000);
        assert_eq!(clock.now_seconds(), 0.5);
    }

    #[test]
    fn test_seconds_to_samples() {
        let clock = SampleClock::new(48000.0);
        assert_eq!(clock.seconds_to_samples(1.0), 48000);
        assert_eq!(clock.seconds_to_samples(0.5), 24000);
        assert_eq!(clock.seconds_to_samples(0.01), 480);
        // Past timestamps clamp to the clock origin instead of wrapping
        assert_eq!(clock.seconds_to_samples(-0.1), 0);
    }

    #[test]
    fn test_clones_share_the_position() {
        let clock = SampleClock::new(44100.0);
        let reader = clock.clone();
        clock.advance(1000);
        assert_eq!(reader.current_sample(), 1000);
    }
}
