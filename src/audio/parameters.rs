// Atomic parameters - Lock-free communication UI <-> audio thread
// Everything the UI pokes at while the stream runs lives here

use crate::audio::click::ClickTimbre;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Thread-safe f32 parameter using atomic operations
/// Converts f32 to u32 bits for atomic storage
#[derive(Clone)]
pub struct AtomicF32 {
    inner: Arc<AtomicU32>,
}

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self {
            inner: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    /// Set the value (called from the UI thread)
    pub fn set(&self, value: f32) {
        self.inner.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Get the value (called from the audio thread)
    pub fn get(&self) -> f32 {
        f32::from_bits(self.inner.load(Ordering::Relaxed))
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Shared click-timbre selector
#[derive(Clone)]
pub struct AtomicTimbre {
    inner: Arc<AtomicU8>,
}

impl AtomicTimbre {
    pub fn new(timbre: ClickTimbre) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(timbre as u8)),
        }
    }

    pub fn set(&self, timbre: ClickTimbre) {
        self.inner.store(timbre as u8, Ordering::Relaxed);
    }

    pub fn get(&self) -> ClickTimbre {
        ClickTimbre::from(self.inner.load(Ordering::Relaxed))
    }
}

/// Output stream health, for the UI status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Starting = 0,
    Running = 1,
    Failed = 2,
}

impl From<u8> for StreamStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => StreamStatus::Starting,
            1 => StreamStatus::Running,
            2 => StreamStatus::Failed,
            _ => StreamStatus::Failed,
        }
    }
}

/// Atomic wrapper to share the stream status between threads
#[derive(Clone)]
pub struct AtomicStreamStatus {
    inner: Arc<AtomicU8>,
}

impl AtomicStreamStatus {
    pub fn new(status: StreamStatus) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(status as u8)),
        }
    }

    pub fn get(&self) -> StreamStatus {
        StreamStatus::from(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, status: StreamStatus) {
        self.inner.store(status as u8, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f32_round_trip() {
        let param = AtomicF32::new(0.5);
        assert_eq!(param.get(), 0.5);

        let writer = param.clone();
        writer.set(0.8);
        assert_eq!(param.get(), 0.8);
    }

    #[test]
    fn test_atomic_timbre_round_trip() {
        let timbre = AtomicTimbre::new(ClickTimbre::Beep);
        for t in ClickTimbre::ALL {
            timbre.set(t);
            assert_eq!(timbre.get(), t);
        }
    }

    #[test]
    fn test_stream_status_round_trip() {
        let status = AtomicStreamStatus::new(StreamStatus::Starting);
        assert_eq!(status.get(), StreamStatus::Starting);
        status.set(StreamStatus::Running);
        assert_eq!(status.get(), StreamStatus::Running);
        status.set(StreamStatus::Failed);
        assert_eq!(status.get(), StreamStatus::Failed);
    }
}
