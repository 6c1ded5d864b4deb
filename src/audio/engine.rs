// Audio engine - real-time CPAL callback
//
// The engine owns the output stream and the sample clock. The callback does
// three things, allocation-free: drain newly scheduled clicks, mix the
// active click voices at their exact sample positions, and write the result
// to the device in whatever sample format it prefers (F32/I16/U16, converted
// through cpal's `FromSample`).
//
// The scheduler never talks to the device directly; it only reads the clock
// this callback advances and pushes `ScheduledClick`s into the click channel.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

use crate::audio::click::{ClickBank, ClickMixer, ClickTimbre};
use crate::audio::clock::SampleClock;
use crate::audio::dsp::{OnePoleSmoother, flush_denormals_to_zero, soft_clip};
use crate::audio::parameters::{AtomicF32, AtomicStreamStatus, AtomicTimbre, StreamStatus};
use crate::audio::{AudioError, AudioResult};
use crate::messaging::channels::{ClickConsumer, NotificationProducer};
use crate::messaging::notification::Notification;

const DEFAULT_VOLUME: f32 = 0.8;

/// Volume smoothing time, keeps slider drags free of zipper noise
const VOLUME_SMOOTHING_MS: f32 = 10.0;

pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    sample_rate: f32,
    clock: SampleClock,
    pub volume: AtomicF32,
    pub timbre: AtomicTimbre,
    pub status: AtomicStreamStatus,
}

impl AudioEngine {
    pub fn new(
        click_rx: ClickConsumer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> AudioResult<Self> {
        let host = cpal::default_host();

        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        println!(
            "Audio device: {}",
            device.name().unwrap_or("Unknown".to_string())
        );

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let clock = SampleClock::new(sample_rate);
        let volume = AtomicF32::new(DEFAULT_VOLUME);
        let timbre = AtomicTimbre::new(ClickTimbre::Beep);
        let status = AtomicStreamStatus::new(StreamStatus::Starting);

        // Click buffers are generated once, outside the callback
        let mixer = ClickMixer::new(ClickBank::new(sample_rate));

        // Shared with the callback; only ever try_lock'd there
        let click_rx = Arc::new(Mutex::new(click_rx));

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                click_rx,
                mixer,
                clock.clone(),
                volume.clone(),
                timbre.clone(),
                status.clone(),
                notification_tx,
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                click_rx,
                mixer,
                clock.clone(),
                volume.clone(),
                timbre.clone(),
                status.clone(),
                notification_tx,
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                click_rx,
                mixer,
                clock.clone(),
                volume.clone(),
                timbre.clone(),
                status.clone(),
                notification_tx,
            ),
            other => return Err(AudioError::UnsupportedFormat(other)),
        }?;

        stream.play()?;
        status.set(StreamStatus::Running);

        println!("Audio engine started: {} Hz, {} channels", sample_rate, channels);

        Ok(Self {
            _device: device,
            _stream: stream,
            sample_rate,
            clock,
            volume,
            timbre,
            status,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The clock the scheduler times against
    pub fn clock(&self) -> SampleClock {
        self.clock.clone()
    }

    /// Build an output stream for any device sample format
    /// The callback mixes in f32 and converts at the write
    #[allow(clippy::too_many_arguments)]
    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        click_rx: Arc<Mutex<ClickConsumer>>,
        mut mixer: ClickMixer,
        clock: SampleClock,
        volume: AtomicF32,
        timbre: AtomicTimbre,
        status: AtomicStreamStatus,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> AudioResult<Stream>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let mut volume_smoother =
            OnePoleSmoother::new(volume.get(), VOLUME_SMOOTHING_MS, clock.sample_rate());

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // No allocations, no I/O, no blocking locks past this point

                if let Ok(mut rx) = click_rx.try_lock() {
                    while let Some(click) = ringbuf::traits::Consumer::try_pop(&mut *rx) {
                        mixer.push(click);
                    }
                }

                let active_timbre = timbre.get();
                let mut sample_position = clock.current_sample();

                for frame in data.chunks_mut(channels) {
                    let gain = volume_smoother.process(volume.get());

                    let mut sample = mixer.next_sample(sample_position, active_timbre);
                    sample = flush_denormals_to_zero(sample * gain);
                    sample = soft_clip(sample);

                    // Mono click to all channels
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = Sample::from_sample::<f32>(sample);
                    }
                    sample_position += 1;
                }

                clock.advance(data.len() / channels);
            },
            move |err| {
                // Runs outside the audio callback, so I/O is fine here
                eprintln!("Audio stream error: {}", err);
                status.set(StreamStatus::Failed);

                if let Ok(mut tx) = notification_tx.try_lock() {
                    let _ = ringbuf::traits::Producer::try_push(
                        &mut *tx,
                        Notification::StreamError(err.to_string()),
                    );
                }
            },
            None,
        )?;

        Ok(stream)
    }
}
