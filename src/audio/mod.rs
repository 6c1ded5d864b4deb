// Audio output - CPAL engine, sample clock, click synthesis

pub mod click;
pub mod clock;
pub mod dsp;
pub mod engine;
pub mod parameters;

pub use click::{ClickBank, ClickMixer, ClickTimbre, ScheduledClick};
pub use clock::SampleClock;
pub use engine::AudioEngine;
pub use parameters::{AtomicF32, AtomicStreamStatus, AtomicTimbre, StreamStatus};

use thiserror::Error;

/// Audio device and stream errors
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("failed to query the output configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported sample format: {0:?}. Supported formats: F32, I16, U16")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build the audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start the audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub type AudioResult<T> = Result<T, AudioError>;
