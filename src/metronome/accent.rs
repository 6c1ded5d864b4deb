// Accent model - Per-beat accent levels within one bar
// Pure data manipulation, no timing dependency

use serde::{Deserialize, Serialize};

/// Accent level for one beat of the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccentLevel {
    Mute,
    Normal,
    Strong,
}

impl AccentLevel {
    /// Next level in the edit cycle: Strong -> Normal -> Mute -> Strong
    pub fn cycled(self) -> Self {
        match self {
            AccentLevel::Strong => AccentLevel::Normal,
            AccentLevel::Normal => AccentLevel::Mute,
            AccentLevel::Mute => AccentLevel::Strong,
        }
    }
}

/// Per-bar accent pattern, one level per beat
/// Length tracks the time-signature numerator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccentPattern {
    levels: Vec<AccentLevel>,
}

impl AccentPattern {
    /// Creates a pattern of `len` beats: all Normal, first beat Strong
    pub fn new(len: usize) -> Self {
        let mut pattern = Self {
            levels: vec![AccentLevel::Normal; len],
        };
        if let Some(first) = pattern.levels.first_mut() {
            *first = AccentLevel::Strong;
        }
        pattern
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Accent level at `index`
    /// Out-of-range indices read as Normal so the scheduler never fails on a
    /// stale beat position after a numerator change
    pub fn level(&self, index: usize) -> AccentLevel {
        self.levels.get(index).copied().unwrap_or(AccentLevel::Normal)
    }

    pub fn levels(&self) -> &[AccentLevel] {
        &self.levels
    }

    /// Advance the level at `index` one step through the edit cycle
    /// Ignores out-of-range indices
    pub fn cycle(&mut self, index: usize) {
        if let Some(level) = self.levels.get_mut(index) {
            *level = level.cycled();
        }
    }

    /// Resize to `len` beats, preserving levels at shared indices and filling
    /// new beats with Normal
    pub fn resize(&mut self, len: usize) {
        self.levels.resize(len, AccentLevel::Normal);
    }

    /// Resize as part of a time-signature change: same as `resize`, then
    /// promote beat 0 to Strong if it is Normal
    /// An explicit Mute on beat 0 is left alone
    pub fn resize_for_signature(&mut self, len: usize) {
        self.resize(len);
        if let Some(first) = self.levels.first_mut() {
            if *first == AccentLevel::Normal {
                *first = AccentLevel::Strong;
            }
        }
    }

    /// Reinitialize to all-Normal with beat 0 Strong, keeping the length
    pub fn reset(&mut self) {
        let len = self.levels.len();
        *self = Self::new(len);
    }
}

impl Default for AccentPattern {
    fn default() -> Self {
        Self::new(4)
    }
}
