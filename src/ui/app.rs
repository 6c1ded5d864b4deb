// Main metronome UI

use crate::audio::click::ClickTimbre;
use crate::audio::parameters::{AtomicF32, AtomicStreamStatus, AtomicTimbre, StreamStatus};
use crate::messaging::channels::{CommandProducer, NotificationConsumer};
use crate::messaging::command::Command;
use crate::messaging::notification::Notification;
use crate::metronome::{AccentLevel, AccentPattern, SubdivisionMode, Tempo, TimeSignature};
use eframe::egui;
use std::time::Instant;

pub struct MetronomeApp {
    command_tx: CommandProducer,
    notification_rx: NotificationConsumer,
    volume_atomic: AtomicF32,
    timbre_atomic: AtomicTimbre,
    status: AtomicStreamStatus,
    /// Origin of the tap-tempo millisecond clock
    started: Instant,
    // UI mirrors of the core state, refreshed from notifications
    volume_ui: f32,
    bpm_ui: u32,
    numerator_ui: u8,
    denominator_ui: u8,
    accents_ui: AccentPattern,
    subdivision_ui: SubdivisionMode,
    subdivision_enabled_ui: bool,
    timbre_ui: ClickTimbre,
    running_ui: bool,
    beat_display: Option<(usize, usize)>,
    last_error: Option<String>,
}

impl MetronomeApp {
    pub fn new(
        command_tx: CommandProducer,
        volume_atomic: AtomicF32,
        timbre_atomic: AtomicTimbre,
        status: AtomicStreamStatus,
        notification_rx: NotificationConsumer,
    ) -> Self {
        let initial_volume = volume_atomic.get();
        let initial_timbre = timbre_atomic.get();

        Self {
            command_tx,
            notification_rx,
            volume_atomic,
            timbre_atomic,
            status,
            started: Instant::now(),
            volume_ui: initial_volume,
            bpm_ui: Tempo::default().bpm(),
            numerator_ui: 4,
            denominator_ui: 4,
            accents_ui: AccentPattern::new(4),
            subdivision_ui: SubdivisionMode::default(),
            subdivision_enabled_ui: false,
            timbre_ui: initial_timbre,
            running_ui: false,
            beat_display: None,
            last_error: None,
        }
    }

    fn send(&mut self, command: Command) {
        let _ = ringbuf::traits::Producer::try_push(&mut self.command_tx, command);
    }

    /// Pull new notifications from the ringbuffer into the UI mirrors
    fn drain_notifications(&mut self) {
        while let Some(notification) =
            ringbuf::traits::Consumer::try_pop(&mut self.notification_rx)
        {
            match notification {
                Notification::TempoChanged(bpm) => self.bpm_ui = bpm,
                Notification::AccentsChanged(accents) => self.accents_ui = accents,
                Notification::BeatPosition {
                    beat,
                    beats_per_bar,
                } => self.beat_display = Some((beat, beats_per_bar)),
                Notification::TransportChanged(running) => {
                    self.running_ui = running;
                    if !running {
                        self.beat_display = None;
                    }
                }
                Notification::StreamError(message) => self.last_error = Some(message),
            }
        }
    }

    fn tap(&mut self) {
        let at_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.send(Command::Tap { at_ms });
    }

    fn apply_time_signature(&mut self) {
        self.send(Command::SetTimeSignature {
            numerator: self.numerator_ui,
            denominator: self.denominator_ui,
        });
    }

    /// Space taps, Enter toggles playback
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.tap();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.send(Command::Toggle);
        }
    }

    fn draw_transport(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let label = if self.running_ui { "■ Stop" } else { "▶ Start" };
            if ui
                .add_sized([90.0, 32.0], egui::Button::new(label))
                .clicked()
            {
                self.send(Command::Toggle);
            }

            match self.beat_display {
                Some((beat, beats_per_bar)) => {
                    ui.label(
                        egui::RichText::new(format!("{} / {}", beat + 1, beats_per_bar))
                            .size(24.0)
                            .strong(),
                    );
                }
                None => {
                    ui.label(egui::RichText::new("– / –").size(24.0).weak());
                }
            }
        });
    }

    fn draw_tempo(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tempo");

        let mut bpm_changed = false;
        ui.horizontal(|ui| {
            bpm_changed |= ui
                .add(egui::Slider::new(&mut self.bpm_ui, Tempo::MIN_BPM..=Tempo::MAX_BPM))
                .changed();
            bpm_changed |= ui
                .add(egui::DragValue::new(&mut self.bpm_ui).range(Tempo::MIN_BPM..=Tempo::MAX_BPM))
                .changed();
            ui.label(Tempo::new(self.bpm_ui).marking());
        });
        if bpm_changed {
            self.send(Command::SetBpm(self.bpm_ui));
        }

        if ui
            .button("TAP")
            .on_hover_text("Tap the tempo (or press Space)")
            .clicked()
        {
            self.tap();
        }
    }

    fn draw_time_signature(&mut self, ui: &mut egui::Ui) {
        ui.heading("Time signature");

        let mut changed = false;
        ui.horizontal(|ui| {
            if ui.button("−").clicked() && self.numerator_ui > TimeSignature::MIN_NUMERATOR {
                self.numerator_ui -= 1;
                changed = true;
            }
            ui.label(egui::RichText::new(self.numerator_ui.to_string()).strong());
            if ui.button("+").clicked() && self.numerator_ui < TimeSignature::MAX_NUMERATOR {
                self.numerator_ui += 1;
                changed = true;
            }

            ui.label("/");

            let position = TimeSignature::DENOMINATORS
                .iter()
                .position(|&d| d == self.denominator_ui)
                .unwrap_or(2);
            if ui.button("−").clicked() && position > 0 {
                self.denominator_ui = TimeSignature::DENOMINATORS[position - 1];
                changed = true;
            }
            ui.label(egui::RichText::new(self.denominator_ui.to_string()).strong());
            if ui.button("+").clicked() && position < TimeSignature::DENOMINATORS.len() - 1 {
                self.denominator_ui = TimeSignature::DENOMINATORS[position + 1];
                changed = true;
            }
        });

        if changed {
            self.apply_time_signature();
        }
    }

    fn draw_accents(&mut self, ui: &mut egui::Ui) {
        ui.heading("Accents");
        ui.label("Click a beat to cycle strong / normal / mute");

        let mut cycle_index = None;
        ui.horizontal_wrapped(|ui| {
            for (index, &level) in self.accents_ui.levels().iter().enumerate() {
                let fill = match level {
                    AccentLevel::Strong => egui::Color32::GOLD,
                    AccentLevel::Normal => egui::Color32::DARK_GRAY,
                    AccentLevel::Mute => egui::Color32::from_gray(25),
                };
                let text = match level {
                    AccentLevel::Strong => egui::Color32::BLACK,
                    _ => egui::Color32::WHITE,
                };
                let button = egui::Button::new(
                    egui::RichText::new((index + 1).to_string()).color(text).strong(),
                )
                .fill(fill)
                .min_size(egui::vec2(30.0, 30.0));

                if ui.add(button).clicked() {
                    cycle_index = Some(index);
                }
            }
        });
        if let Some(index) = cycle_index {
            self.send(Command::CycleAccent(index));
        }

        if ui.button("Reset accents").clicked() {
            self.send(Command::ResetAccents);
        }
    }

    fn draw_subdivision(&mut self, ui: &mut egui::Ui) {
        ui.heading("Subdivision");

        ui.horizontal(|ui| {
            let previous = self.subdivision_ui;
            egui::ComboBox::from_id_salt("subdivision_selector")
                .selected_text(self.subdivision_ui.label())
                .show_ui(ui, |ui| {
                    for mode in SubdivisionMode::ALL {
                        ui.selectable_value(&mut self.subdivision_ui, mode, mode.label());
                    }
                });
            if previous != self.subdivision_ui {
                let mode = self.subdivision_ui;
                self.send(Command::SetSubdivisionMode(mode));
            }

            if ui
                .checkbox(&mut self.subdivision_enabled_ui, "Play subdivisions")
                .changed()
            {
                let enabled = self.subdivision_enabled_ui;
                self.send(Command::SetSubdivisionEnabled(enabled));
            }
        });
    }

    fn draw_sound(&mut self, ui: &mut egui::Ui) {
        ui.heading("Sound");

        ui.horizontal(|ui| {
            let previous = self.timbre_ui;
            egui::ComboBox::from_id_salt("timbre_selector")
                .selected_text(self.timbre_ui.label())
                .show_ui(ui, |ui| {
                    for timbre in ClickTimbre::ALL {
                        ui.selectable_value(&mut self.timbre_ui, timbre, timbre.label());
                    }
                });
            if previous != self.timbre_ui {
                self.timbre_atomic.set(self.timbre_ui);
            }

            ui.label("Volume:");
            if ui
                .add(egui::Slider::new(&mut self.volume_ui, 0.0..=1.0))
                .changed()
            {
                self.volume_atomic.set(self.volume_ui);
            }
        });
    }

    fn draw_status(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let (dot, color) = match self.status.get() {
                StreamStatus::Running => ("●", egui::Color32::GREEN),
                StreamStatus::Starting => ("●", egui::Color32::YELLOW),
                StreamStatus::Failed => ("●", egui::Color32::RED),
            };
            ui.colored_label(color, dot);
            ui.label("Audio");

            if let Some(message) = &self.last_error {
                ui.colored_label(egui::Color32::RED, message);
            }
        });
    }
}

impl eframe::App for MetronomeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep repainting so the beat readout and key handling stay live
        ctx.request_repaint();

        self.drain_notifications();
        self.handle_keys(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Pulsebox");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.draw_status(ui);
                });
            });
            ui.separator();

            self.draw_transport(ui);
            ui.add_space(10.0);

            self.draw_tempo(ui);
            ui.add_space(10.0);

            self.draw_time_signature(ui);
            ui.add_space(10.0);

            self.draw_accents(ui);
            ui.add_space(10.0);

            self.draw_subdivision(ui);
            ui.add_space(10.0);

            self.draw_sound(ui);
        });
    }
}
