use pulsebox::ui::MetronomeApp;
use pulsebox::{
    AudioEngine, MetronomeWorker, create_click_channel, create_command_channel,
    create_notification_channel,
};
use std::sync::{Arc, Mutex};

// Ringbuffer capacity constants
// - Commands arrive at UI interaction rate, a handful per frame at worst
// - Clicks peak during burst catch-up after a starved timer: a 2s stall at
//   260 BPM with sixteenth subdivisions is still well under 256 events
// - Notifications are drained every UI frame
const COMMAND_RINGBUFFER_CAPACITY: usize = 64;
const CLICK_RINGBUFFER_CAPACITY: usize = 256;
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 128;

fn main() {
    println!("=== Pulsebox ===\n");

    // Create the communication channels
    let (command_tx, command_rx) = create_command_channel(COMMAND_RINGBUFFER_CAPACITY);
    let (click_tx, click_rx) = create_click_channel(CLICK_RINGBUFFER_CAPACITY);
    let (notification_tx, notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    println!("Audio engine initialisation...");
    let audio_engine = match AudioEngine::new(click_rx, notification_tx.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    // Scheduler thread, timed against the engine's sample clock
    let _worker = MetronomeWorker::spawn(
        audio_engine.clock(),
        command_rx,
        click_tx,
        notification_tx,
    );

    println!("\n=== Metronome ready ===\n");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 560.0])
            .with_title("Pulsebox"),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "Pulsebox",
        native_options,
        Box::new(|_cc| {
            let app = MetronomeApp::new(
                command_tx,
                audio_engine.volume.clone(),
                audio_engine.timbre.clone(),
                audio_engine.status.clone(),
                notification_rx,
            );
            Ok(Box::new(app))
        }),
    );
}
