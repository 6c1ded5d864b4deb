// Click synthesis and mixing
// Clicks are pre-generated at engine start and rendered at absolute sample
// positions; the scheduler decides when, this module decides what it sounds
// like

use crate::metronome::TickRole;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Click sound family, selectable from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTimbre {
    Beep = 0,
    Click = 1,
    Woodblock = 2,
}

impl ClickTimbre {
    /// All timbres, in menu order
    pub const ALL: [ClickTimbre; 3] = [
        ClickTimbre::Beep,
        ClickTimbre::Click,
        ClickTimbre::Woodblock,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClickTimbre::Beep => "Beep",
            ClickTimbre::Click => "Click",
            ClickTimbre::Woodblock => "Woodblock",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl From<u8> for ClickTimbre {
    fn from(value: u8) -> Self {
        match value {
            0 => ClickTimbre::Beep,
            1 => ClickTimbre::Click,
            2 => ClickTimbre::Woodblock,
            _ => ClickTimbre::Beep,
        }
    }
}

/// A click scheduled at an absolute position on the sample clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledClick {
    pub start_sample: u64,
    pub role: TickRole,
    pub strength: f32,
}

/// Base gain per role, multiplied by the event strength at render time
const BEAT_GAIN: f32 = 0.9;
const SUBDIVISION_GAIN: f32 = 0.55;

pub fn role_gain(role: TickRole) -> f32 {
    match role {
        TickRole::Beat => BEAT_GAIN,
        TickRole::Subdivision => SUBDIVISION_GAIN,
    }
}

const BEEP_DURATION_MS: f32 = 80.0;
const CLICK_DURATION_MS: f32 = 60.0;
const WOOD_DURATION_MS: f32 = 70.0;

/// Pre-generated click samples for every timbre and role
/// Generating up front keeps the audio callback free of synthesis work
pub struct ClickBank {
    // buffers[timbre][role]
    buffers: [[Vec<f32>; 2]; 3],
}

impl ClickBank {
    pub fn new(sample_rate: f32) -> Self {
        let beep_len = ms_to_samples(sample_rate, BEEP_DURATION_MS);
        let click_len = ms_to_samples(sample_rate, CLICK_DURATION_MS);
        let wood_len = ms_to_samples(sample_rate, WOOD_DURATION_MS);

        // Beat-role clicks sit higher than subdivision clicks in each family
        Self {
            buffers: [
                [
                    generate_sine_click(sample_rate, beep_len, 880.0),
                    generate_sine_click(sample_rate, beep_len, 660.0),
                ],
                [
                    generate_square_click(sample_rate, click_len, 2000.0),
                    generate_square_click(sample_rate, click_len, 1400.0),
                ],
                [
                    generate_wood_click(sample_rate, wood_len, 1200.0),
                    generate_wood_click(sample_rate, wood_len, 900.0),
                ],
            ],
        }
    }

    /// Click samples for the given timbre and role
    pub fn samples(&self, timbre: ClickTimbre, role: TickRole) -> &[f32] {
        let role_index = match role {
            TickRole::Beat => 0,
            TickRole::Subdivision => 1,
        };
        &self.buffers[timbre.index()][role_index]
    }
}

fn ms_to_samples(sample_rate: f32, ms: f32) -> usize {
    (sample_rate * ms / 1000.0) as usize
}

/// Sine burst with an exponential decay envelope
fn generate_sine_click(sample_rate: f32, num_samples: usize, frequency: f32) -> Vec<f32> {
    let phase_increment = 2.0 * PI * frequency / sample_rate;
    let mut samples = Vec::with_capacity(num_samples);

    for i in 0..num_samples {
        let t = i as f32 / num_samples as f32;
        let envelope = (-t * 8.0).exp();
        samples.push((i as f32 * phase_increment).sin() * envelope);
    }

    samples
}

/// Square burst, brighter and shorter than the sine
fn generate_square_click(sample_rate: f32, num_samples: usize, frequency: f32) -> Vec<f32> {
    let phase_increment = 2.0 * PI * frequency / sample_rate;
    let mut samples = Vec::with_capacity(num_samples);

    for i in 0..num_samples {
        let t = i as f32 / num_samples as f32;
        let envelope = (-t * 10.0).exp();
        let square = if (i as f32 * phase_increment).sin() >= 0.0 {
            1.0
        } else {
            -1.0
        };
        samples.push(square * envelope);
    }

    samples
}

/// Short noise burst through a damped resonator, normalized to unit peak
/// The noise is seeded so every bank renders the identical click
fn generate_wood_click(sample_rate: f32, num_samples: usize, frequency: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);

    let omega = 2.0 * PI * frequency / sample_rate;
    let r = 0.996f32;
    let a1 = 2.0 * r * omega.cos();
    let a2 = -(r * r);

    let mut samples = Vec::with_capacity(num_samples);
    let mut y1 = 0.0f32;
    let mut y2 = 0.0f32;

    for i in 0..num_samples {
        let t = i as f32 / num_samples as f32;
        // Excite the resonator with a decaying burst over the first fifth
        let excitation = if t < 0.2 {
            rng.gen_range(-1.0f32..1.0) * (1.0 - t / 0.2)
        } else {
            0.0
        };
        let y = excitation * 0.1 + a1 * y1 + a2 * y2;
        y2 = y1;
        y1 = y;
        samples.push(y);
    }

    let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    if peak > 0.0 {
        for sample in &mut samples {
            *sample /= peak;
        }
    }

    samples
}

/// Voice limit; simultaneous clicks beyond this steal the most-finished voice
const MAX_VOICES: usize = 8;

/// Pending-click queue size; clicks arriving on a full queue are dropped
const PENDING_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
struct ClickVoice {
    timbre: ClickTimbre,
    role: TickRole,
    gain: f32,
    position: usize,
}

/// Renders scheduled clicks sample by sample inside the audio callback
///
/// Clicks arrive time-ordered from the scheduler. Each one starts exactly at
/// its sample position; clicks already in the past (burst catch-up after a
/// starved timer) start immediately instead of being dropped.
pub struct ClickMixer {
    bank: ClickBank,
    pending: Vec<ScheduledClick>,
    voices: [Option<ClickVoice>; MAX_VOICES],
}

impl ClickMixer {
    pub fn new(bank: ClickBank) -> Self {
        Self {
            bank,
            pending: Vec::with_capacity(PENDING_CAPACITY),
            voices: [None; MAX_VOICES],
        }
    }

    /// Queue a scheduled click (called after draining the click channel)
    pub fn push(&mut self, click: ScheduledClick) {
        if self.pending.len() < PENDING_CAPACITY {
            self.pending.push(click);
        }
    }

    /// Number of clicks waiting to start
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Render one sample at the given absolute position
    pub fn next_sample(&mut self, sample_position: u64, timbre: ClickTimbre) -> f32 {
        while self
            .pending
            .first()
            .is_some_and(|click| click.start_sample <= sample_position)
        {
            let click = self.pending.remove(0);
            self.start_voice(click, timbre);
        }

        let mut mix = 0.0;
        for slot in self.voices.iter_mut() {
            if let Some(voice) = slot {
                let buffer = self.bank.samples(voice.timbre, voice.role);
                if voice.position < buffer.len() {
                    mix += buffer[voice.position] * voice.gain;
                    voice.position += 1;
                } else {
                    *slot = None;
                }
            }
        }
        mix
    }

    fn start_voice(&mut self, click: ScheduledClick, timbre: ClickTimbre) {
        let voice = ClickVoice {
            timbre,
            role: click.role,
            gain: role_gain(click.role) * click.strength,
            position: 0,
        };

        if let Some(slot) = self.voices.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(voice);
            return;
        }

        // All voices busy: steal the one closest to finishing
        if let Some(slot) = self
            .voices
            .iter_mut()
            .max_by_key(|slot| slot.map(|v| v.position).unwrap_or(usize::MAX))
        {
            *slot = Some(voice);
        }
    }
}
