// Tap tempo - BPM estimation from irregular human taps
// Sliding window of recent tap timestamps, smoothed into a tempo

use super::tempo::Tempo;
use std::collections::VecDeque;

/// Maximum number of tap timestamps kept in the window
const TAP_WINDOW: usize = 8;

/// Intervals at or above this are a pause, not a tempo sample
const PAUSE_THRESHOLD_MS: f64 = 2000.0;

/// Sliding-window tap tempo estimator
///
/// Timestamps come from a monotonic millisecond clock. Old taps are evicted
/// as new ones arrive; there is no explicit reset. A pause between taps is
/// filtered out of the estimate without clearing the window.
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    taps: VecDeque<f64>,
}

impl TapTempo {
    pub fn new() -> Self {
        Self {
            taps: VecDeque::with_capacity(TAP_WINDOW + 1),
        }
    }

    /// Number of taps currently buffered
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Record one tap at `at_ms` and return the new BPM estimate, if the
    /// window holds enough regular taps to produce one
    ///
    /// The estimate is the mean of the consecutive intervals shorter than the
    /// pause threshold, converted to BPM, rounded, and clamped to the tempo
    /// bounds. Fewer than two surviving intervals means no estimate.
    pub fn record(&mut self, at_ms: f64) -> Option<u32> {
        self.taps.push_back(at_ms);
        while self.taps.len() > TAP_WINDOW {
            self.taps.pop_front();
        }

        if self.taps.len() < 2 {
            return None;
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for (previous, current) in self.taps.iter().zip(self.taps.iter().skip(1)) {
            let interval = current - previous;
            if interval < PAUSE_THRESHOLD_MS {
                sum += interval;
                count += 1;
            }
        }

        if count < 2 {
            return None;
        }

        let mean_ms = sum / count as f64;
        let bpm = (60_000.0 / mean_ms).round() as u32;
        Some(Tempo::new(bpm).bpm())
    }
}
