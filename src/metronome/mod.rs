// Metronome core - tempo, accents, subdivisions, tap tempo, and the
// look-ahead scheduler

pub mod accent;
pub mod engine;
pub mod scheduler;
pub mod subdivision;
pub mod tap;
pub mod tempo;
pub mod worker;

pub use accent::{AccentLevel, AccentPattern};
pub use engine::{ClickConfig, Metronome, TransportState};
pub use scheduler::{BeatPosition, BeatScheduler, TickEvent, TickRole};
pub use subdivision::SubdivisionMode;
pub use tap::TapTempo;
pub use tempo::{Tempo, TimeSignature};
pub use worker::MetronomeWorker;
