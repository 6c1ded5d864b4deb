// Playback controller - transport state machine and configuration owner
// Every inbound operation funnels through here; inputs are clamped, never
// rejected

use super::accent::AccentPattern;
use super::scheduler::{BeatPosition, BeatScheduler, TickEvent};
use super::subdivision::SubdivisionMode;
use super::tap::TapTempo;
use super::tempo::{Tempo, TimeSignature};

/// Transport state (stopped/running)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Running,
}

impl TransportState {
    pub fn is_running(&self) -> bool {
        matches!(self, TransportState::Running)
    }
}

/// The shared click configuration read by the scheduler
/// Mutated only through the `Metronome` operations
#[derive(Debug, Clone)]
pub struct ClickConfig {
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    pub accents: AccentPattern,
    pub subdivision: SubdivisionMode,
    pub subdivision_enabled: bool,
}

impl Default for ClickConfig {
    fn default() -> Self {
        let time_signature = TimeSignature::default();
        Self {
            tempo: Tempo::default(),
            time_signature,
            accents: AccentPattern::new(time_signature.beats_per_bar()),
            subdivision: SubdivisionMode::default(),
            subdivision_enabled: false,
        }
    }
}

/// The metronome core: configuration, tap estimator, scheduler, transport
pub struct Metronome {
    config: ClickConfig,
    scheduler: BeatScheduler,
    tap: TapTempo,
    state: TransportState,
}

impl Metronome {
    pub fn new() -> Self {
        Self {
            config: ClickConfig::default(),
            scheduler: BeatScheduler::new(),
            tap: TapTempo::new(),
            state: TransportState::Stopped,
        }
    }

    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Set the tempo, clamped; returns the applied BPM
    /// Takes effect on the next scheduling pass, never retroactively
    pub fn set_bpm(&mut self, bpm: u32) -> u32 {
        self.config.tempo.set_bpm(bpm);
        self.config.tempo.bpm()
    }

    /// Set the time signature (clamped/snapped) and resize the accent
    /// pattern, promoting beat 0 to Strong where it was plain Normal
    pub fn set_time_signature(&mut self, numerator: u8, denominator: u8) -> TimeSignature {
        let signature = TimeSignature::new(numerator, denominator);
        self.config.time_signature = signature;
        self.config
            .accents
            .resize_for_signature(signature.beats_per_bar());
        signature
    }

    /// Cycle the accent at `index` one step (Strong -> Normal -> Mute)
    pub fn cycle_accent(&mut self, index: usize) {
        self.config.accents.cycle(index);
    }

    /// Reinitialize accents to all-Normal with a Strong first beat
    pub fn reset_accents(&mut self) {
        self.config.accents.reset();
    }

    pub fn set_subdivision_mode(&mut self, mode: SubdivisionMode) {
        self.config.subdivision = mode;
    }

    pub fn set_subdivision_enabled(&mut self, enabled: bool) {
        self.config.subdivision_enabled = enabled;
    }

    /// Record a tap; when the window yields an estimate, apply it as the new
    /// tempo and return it
    pub fn record_tap(&mut self, at_ms: f64) -> Option<u32> {
        let bpm = self.tap.record(at_ms)?;
        Some(self.set_bpm(bpm))
    }

    /// Start playback: arm the scheduler a small lead-in past `now` on the
    /// audio clock and reset the bar position. No-op while running.
    pub fn start(&mut self, now: f64) {
        if self.state.is_running() {
            return;
        }
        self.scheduler.arm(now);
        self.state = TransportState::Running;
    }

    /// Stop playback. No-op while stopped. Events already handed to the
    /// audio side are not recalled; the tail of the look-ahead horizon may
    /// still sound.
    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
    }

    pub fn toggle(&mut self, now: f64) {
        if self.state.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// One look-ahead pass against the current audio-clock time
    /// Does nothing while stopped
    pub fn run_scheduler(&mut self, now: f64, events: &mut Vec<TickEvent>) -> Option<BeatPosition> {
        if !self.state.is_running() {
            return None;
        }
        self.scheduler.schedule(now, &self.config, events)
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &BeatScheduler {
        &self.scheduler
    }
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new()
    }
}
