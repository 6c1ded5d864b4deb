// Pulsebox - Library exports for tests and benchmarks

pub mod audio;
pub mod messaging;
pub mod metronome;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::click::{ClickBank, ClickMixer, ClickTimbre, ScheduledClick};
pub use audio::clock::SampleClock;
pub use audio::engine::AudioEngine;
pub use messaging::channels::{
    create_click_channel, create_command_channel, create_notification_channel,
};
pub use messaging::command::Command;
pub use messaging::notification::Notification;
pub use metronome::{
    AccentLevel, AccentPattern, BeatPosition, BeatScheduler, ClickConfig, Metronome,
    MetronomeWorker, SubdivisionMode, TapTempo, Tempo, TickEvent, TickRole, TimeSignature,
    TransportState,
};
