// Metronome worker - the periodic look-ahead tick
// A plain thread woken every 25ms: drains UI commands, runs a scheduling
// pass against the audio clock, and fans the results out to the audio
// callback and the UI

use super::engine::Metronome;
use super::scheduler::{LOOKAHEAD_TICK_MS, TickEvent};
use crate::audio::click::ScheduledClick;
use crate::audio::clock::SampleClock;
use crate::messaging::channels::{ClickProducer, CommandConsumer, NotificationProducer};
use crate::messaging::command::Command;
use crate::messaging::notification::Notification;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Handle to the scheduler thread; dropping it stops and joins the thread
pub struct MetronomeWorker {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MetronomeWorker {
    pub fn spawn(
        clock: SampleClock,
        command_rx: CommandConsumer,
        click_tx: ClickProducer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let handle = thread::spawn(move || {
            run_loop(clock, command_rx, click_tx, notification_tx, shutdown_flag);
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }
}

impl Drop for MetronomeWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(
    clock: SampleClock,
    mut command_rx: CommandConsumer,
    mut click_tx: ClickProducer,
    notification_tx: Arc<Mutex<NotificationProducer>>,
    shutdown: Arc<AtomicBool>,
) {
    let mut metronome = Metronome::new();
    let mut events: Vec<TickEvent> = Vec::with_capacity(64);

    while !shutdown.load(Ordering::Relaxed) {
        // Configuration changes land before the scheduling pass, so an edit
        // always takes effect on the very next pass
        while let Some(command) = ringbuf::traits::Consumer::try_pop(&mut command_rx) {
            if matches!(command, Command::Quit) {
                return;
            }
            if let Some(notification) = apply_command(&mut metronome, command, clock.now_seconds())
            {
                push_notification(&notification_tx, notification);
            }
        }

        if metronome.is_running() {
            events.clear();
            if let Some(position) = metronome.run_scheduler(clock.now_seconds(), &mut events) {
                push_notification(
                    &notification_tx,
                    Notification::BeatPosition {
                        beat: position.beat,
                        beats_per_bar: position.beats_per_bar,
                    },
                );
            }
            for event in &events {
                let click = ScheduledClick {
                    start_sample: clock.seconds_to_samples(event.time),
                    role: event.role,
                    strength: event.strength,
                };
                let _ = ringbuf::traits::Producer::try_push(&mut click_tx, click);
            }
        }

        thread::sleep(Duration::from_millis(LOOKAHEAD_TICK_MS));
    }
}

/// Apply one inbound operation and report the resulting state change, if the
/// UI needs to hear about it
pub(crate) fn apply_command(
    metronome: &mut Metronome,
    command: Command,
    now: f64,
) -> Option<Notification> {
    match command {
        Command::SetBpm(bpm) => Some(Notification::TempoChanged(metronome.set_bpm(bpm))),
        Command::SetTimeSignature {
            numerator,
            denominator,
        } => {
            metronome.set_time_signature(numerator, denominator);
            Some(Notification::AccentsChanged(
                metronome.config().accents.clone(),
            ))
        }
        Command::CycleAccent(index) => {
            metronome.cycle_accent(index);
            Some(Notification::AccentsChanged(
                metronome.config().accents.clone(),
            ))
        }
        Command::ResetAccents => {
            metronome.reset_accents();
            Some(Notification::AccentsChanged(
                metronome.config().accents.clone(),
            ))
        }
        Command::SetSubdivisionMode(mode) => {
            metronome.set_subdivision_mode(mode);
            None
        }
        Command::SetSubdivisionEnabled(enabled) => {
            metronome.set_subdivision_enabled(enabled);
            None
        }
        Command::Tap { at_ms } => metronome.record_tap(at_ms).map(Notification::TempoChanged),
        Command::Start => {
            metronome.start(now);
            Some(Notification::TransportChanged(true))
        }
        Command::Stop => {
            metronome.stop();
            Some(Notification::TransportChanged(false))
        }
        Command::Toggle => {
            metronome.toggle(now);
            Some(Notification::TransportChanged(metronome.is_running()))
        }
        Command::Quit => None,
    }
}

fn push_notification(tx: &Arc<Mutex<NotificationProducer>>, notification: Notification) {
    if let Ok(mut tx) = tx.try_lock() {
        let _ = ringbuf::traits::Producer::try_push(&mut *tx, notification);
    }
}
