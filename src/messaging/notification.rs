// Notifications - Communication metronome worker / audio engine -> UI
// Typed state-change events the UI renders from

use crate::metronome::AccentPattern;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The applied (clamped) tempo changed, via slider or tap
    TempoChanged(u32),
    /// The accent pattern changed (edit, reset, or signature resize)
    AccentsChanged(AccentPattern),
    /// Bar/beat display position
    BeatPosition { beat: usize, beats_per_bar: usize },
    /// Playback started or stopped
    TransportChanged(bool),
    /// The audio stream reported an error
    StreamError(String),
}
