// Look-ahead scheduler - turns the click configuration into timed events
// Driven by a coarse periodic tick, it keeps a fixed horizon of events
// enqueued ahead of the audio clock so playback timing never depends on
// timer jitter

use super::accent::AccentLevel;
use super::engine::ClickConfig;

/// How far ahead of the audio clock events are enqueued, in seconds
pub const SCHEDULE_AHEAD_SECS: f64 = 0.12;

/// Lead-in between pressing start and the first beat, in seconds
pub const START_DELAY_SECS: f64 = 0.05;

/// Cadence of the driving timer, in milliseconds
/// Must stay well under the horizon so a late tick still catches up
pub const LOOKAHEAD_TICK_MS: u64 = 25;

const STRONG_BEAT_STRENGTH: f32 = 1.0;
const NORMAL_BEAT_STRENGTH: f32 = 0.72;
const SUBDIVISION_STRENGTH: f32 = 0.55;

/// What kind of tick an event is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickRole {
    Beat,
    Subdivision,
}

/// One scheduled click: absolute audio-clock time, role, and strength
/// This is the sole output of the core; the audio side decides the waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    pub time: f64,
    pub role: TickRole,
    pub strength: f32,
}

/// Bar/beat position for the UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatPosition {
    pub beat: usize,
    pub beats_per_bar: usize,
}

/// Scheduling state: the next unscheduled beat and its index in the bar
#[derive(Debug, Clone)]
pub struct BeatScheduler {
    next_beat_time: f64,
    beat_in_bar: usize,
}

impl BeatScheduler {
    pub fn new() -> Self {
        Self {
            next_beat_time: 0.0,
            beat_in_bar: 0,
        }
    }

    /// Re-derive the scheduling origin from the current clock time
    /// Called on transport start
    pub fn arm(&mut self, now: f64) {
        self.next_beat_time = now + START_DELAY_SECS;
        self.beat_in_bar = 0;
    }

    /// Absolute time of the next unscheduled beat
    pub fn next_beat_time(&self) -> f64 {
        self.next_beat_time
    }

    /// Index in the bar of the next unscheduled beat
    pub fn beat_in_bar(&self) -> usize {
        self.beat_in_bar
    }

    /// One scheduling pass: enqueue every event due within the horizon
    ///
    /// Emits all beats (and their subdivisions) with `time < now + horizon`,
    /// advancing the beat cursor as it goes. Returns the position of the last
    /// beat scheduled, if any. A pass that runs late schedules every overdue
    /// beat in one burst; events are never dropped.
    ///
    /// Tempo and signature are re-read on every loop iteration, so edits made
    /// between passes apply from the next unscheduled beat onward and never
    /// move events that were already emitted.
    pub fn schedule(
        &mut self,
        now: f64,
        config: &ClickConfig,
        events: &mut Vec<TickEvent>,
    ) -> Option<BeatPosition> {
        let mut position = None;

        while self.next_beat_time < now + SCHEDULE_AHEAD_SECS {
            let beats_per_bar = config.time_signature.beats_per_bar();
            self.schedule_beat(self.next_beat_time, self.beat_in_bar, config, events);

            position = Some(BeatPosition {
                beat: self.beat_in_bar,
                beats_per_bar,
            });

            self.next_beat_time += config.tempo.seconds_per_beat();
            self.beat_in_bar = (self.beat_in_bar + 1) % beats_per_bar;
        }

        position
    }

    /// Emit the events of one beat starting at absolute time `at`
    fn schedule_beat(
        &self,
        at: f64,
        beat_in_bar: usize,
        config: &ClickConfig,
        events: &mut Vec<TickEvent>,
    ) {
        // Beat click, unless this beat is muted
        match config.accents.level(beat_in_bar) {
            AccentLevel::Mute => {}
            AccentLevel::Strong => events.push(TickEvent {
                time: at,
                role: TickRole::Beat,
                strength: STRONG_BEAT_STRENGTH,
            }),
            AccentLevel::Normal => events.push(TickEvent {
                time: at,
                role: TickRole::Beat,
                strength: NORMAL_BEAT_STRENGTH,
            }),
        }

        // Subdivision clicks inside the beat. The first pattern entry is the
        // beat onset itself and is skipped; a muted beat keeps its
        // subdivisions.
        if !config.subdivision_enabled {
            return;
        }
        let pattern = config.subdivision.pattern();
        if pattern.len() <= 1 {
            return;
        }

        let seconds_per_beat = config.tempo.seconds_per_beat();
        let mut offset = 0.0;
        for fraction in &pattern[..pattern.len() - 1] {
            offset += fraction;
            events.push(TickEvent {
                time: at + offset * seconds_per_beat,
                role: TickRole::Subdivision,
                strength: SUBDIVISION_STRENGTH,
            });
        }
    }
}

impl Default for BeatScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metronome::engine::ClickConfig;
    use crate::metronome::subdivision::SubdivisionMode;
    use crate::metronome::tempo::{Tempo, TimeSignature};

    fn config_120_four_four() -> ClickConfig {
        ClickConfig {
            tempo: Tempo::new(120),
            time_signature: TimeSignature::four_four(),
            ..ClickConfig::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_arm_sets_origin_and_resets_beat() {
        let mut scheduler = BeatScheduler::new();
        scheduler.arm(10.0);
        assert!(close(scheduler.next_beat_time(), 10.0 + START_DELAY_SECS));
        assert_eq!(scheduler.beat_in_bar(), 0);
    }

    #[test]
    fn test_nothing_due_outside_horizon() {
        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        // First beat is at 0.05; a pass 0.2s earlier than that sees nothing
        let position = scheduler.schedule(-0.2, &config_120_four_four(), &mut events);
        assert!(events.is_empty());
        assert!(position.is_none());
    }

    #[test]
    fn test_beats_advance_round_the_bar() {
        let config = config_120_four_four();
        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        let mut now = 0.0;
        // Walk a little over two bars at 25ms cadence
        while now < 4.2 {
            scheduler.schedule(now, &config, &mut events);
            now += LOOKAHEAD_TICK_MS as f64 / 1000.0;
        }

        let beats: Vec<&TickEvent> = events
            .iter()
            .filter(|e| e.role == TickRole::Beat)
            .collect();
        // Beats every 0.5s from 0.05 up to the last horizon
        for (i, beat) in beats.iter().enumerate() {
            assert!(close(beat.time, 0.05 + i as f64 * 0.5));
        }
        // Bar wraps: beats 0 and 4 are Strong, the rest Normal
        assert_eq!(beats[0].strength, 1.0);
        assert_eq!(beats[1].strength, 0.72);
        assert_eq!(beats[4].strength, 1.0);
        assert_eq!(beats[5].strength, 0.72);
    }

    #[test]
    fn test_subdivision_events_between_beats() {
        let mut config = config_120_four_four();
        config.subdivision = SubdivisionMode::Eighth;
        config.subdivision_enabled = true;

        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        scheduler.schedule(0.0, &config, &mut events);

        // Horizon 0.12s covers only the first beat (0.05) and its offbeat
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].role, TickRole::Beat);
        assert!(close(events[0].time, 0.05));
        assert_eq!(events[1].role, TickRole::Subdivision);
        assert!(close(events[1].time, 0.05 + 0.25));
        assert_eq!(events[1].strength, 0.55);
    }

    #[test]
    fn test_triplet_offsets() {
        let mut config = config_120_four_four();
        config.subdivision = SubdivisionMode::Triplet;
        config.subdivision_enabled = true;

        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        scheduler.schedule(0.0, &config, &mut events);

        let subs: Vec<&TickEvent> = events
            .iter()
            .filter(|e| e.role == TickRole::Subdivision)
            .collect();
        assert_eq!(subs.len(), 2);
        assert!(close(subs[0].time, 0.05 + 0.5 / 3.0));
        assert!(close(subs[1].time, 0.05 + 1.0 / 3.0));
    }

    #[test]
    fn test_muted_beat_keeps_subdivisions() {
        let mut config = config_120_four_four();
        config.subdivision = SubdivisionMode::Eighth;
        config.subdivision_enabled = true;
        config.accents.cycle(1); // Normal -> Mute

        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        let mut now = 0.0;
        while now < 1.0 {
            scheduler.schedule(now, &config, &mut events);
            now += 0.025;
        }

        // Beat 1 (at 0.55) is muted: no Beat event there
        assert!(
            !events
                .iter()
                .any(|e| e.role == TickRole::Beat && close(e.time, 0.55))
        );
        // Its offbeat subdivision (at 0.80) still plays
        assert!(
            events
                .iter()
                .any(|e| e.role == TickRole::Subdivision && close(e.time, 0.80))
        );
    }

    #[test]
    fn test_disabled_subdivisions_emit_beats_only() {
        let mut config = config_120_four_four();
        config.subdivision = SubdivisionMode::Sixteenth;
        config.subdivision_enabled = false;

        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        let mut now = 0.0;
        while now < 1.0 {
            scheduler.schedule(now, &config, &mut events);
            now += 0.025;
        }
        assert!(events.iter().all(|e| e.role == TickRole::Beat));
    }

    #[test]
    fn test_quarter_pattern_adds_no_subdivisions() {
        let mut config = config_120_four_four();
        config.subdivision = SubdivisionMode::Quarter;
        config.subdivision_enabled = true;

        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        scheduler.schedule(0.0, &config, &mut events);
        assert!(events.iter().all(|e| e.role == TickRole::Beat));
    }

    #[test]
    fn test_burst_catch_up_after_starved_timer() {
        let config = config_120_four_four();
        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        scheduler.schedule(0.0, &config, &mut events);
        let before_starve = events.len();

        // The driving timer goes silent for 2s, then one late pass fires
        scheduler.schedule(2.0, &config, &mut events);

        // Every beat from 0.05 to just under 2.12 exists exactly once
        let beats: Vec<&TickEvent> = events
            .iter()
            .filter(|e| e.role == TickRole::Beat)
            .collect();
        assert!(beats.len() > before_starve);
        for (i, beat) in beats.iter().enumerate() {
            assert!(close(beat.time, 0.05 + i as f64 * 0.5));
        }
        assert!(close(beats.last().unwrap().time, 2.05));
    }

    #[test]
    fn test_tempo_change_is_not_retroactive() {
        let mut config = config_120_four_four();
        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        // Schedule through the first beat at 120 BPM
        scheduler.schedule(0.0, &config, &mut events);
        let first_beat = events[0].time;
        let second_beat_due = scheduler.next_beat_time();
        assert!(close(second_beat_due, first_beat + 0.5));

        // Double the tempo; the already-armed second beat keeps its slot,
        // only the gap after it shrinks
        config.tempo = Tempo::new(240);
        let mut now = second_beat_due;
        while now < second_beat_due + 0.5 {
            scheduler.schedule(now, &config, &mut events);
            now += 0.025;
        }

        let beats: Vec<&TickEvent> = events
            .iter()
            .filter(|e| e.role == TickRole::Beat)
            .collect();
        assert!(close(beats[1].time, first_beat + 0.5));
        assert!(close(beats[2].time, first_beat + 0.5 + 0.25));
    }

    #[test]
    fn test_events_are_time_ordered() {
        let mut config = config_120_four_four();
        config.subdivision = SubdivisionMode::SixteenSixteenEight;
        config.subdivision_enabled = true;

        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        let mut now = 0.0;
        while now < 3.0 {
            scheduler.schedule(now, &config, &mut events);
            now += 0.025;
        }

        for pair in events.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn test_position_reports_last_scheduled_beat() {
        let config = config_120_four_four();
        let mut scheduler = BeatScheduler::new();
        scheduler.arm(0.0);

        let mut events = Vec::new();
        let position = scheduler.schedule(0.0, &config, &mut events).unwrap();
        assert_eq!(position.beat, 0);
        assert_eq!(position.beats_per_bar, 4);

        // A late pass covering several beats reports the final one
        let position = scheduler.schedule(1.2, &config, &mut events).unwrap();
        assert_eq!(position.beat, 2);
    }
}
