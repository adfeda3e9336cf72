//! Buzzer implementation using rodio.
//!
//! Tones are synthesised as square waves, the closest match to a passive
//! piezo driven by PWM.

use std::sync::atomic::{AtomicBool, Ordering};

use rodio::cpal::SampleRate;
use rodio::source::{Function, SignalGenerator, Zero};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::debug;

use super::error::SoundError;
use super::tone::{pattern, ToneStep};
use super::Buzzer;
use crate::types::Cue;

const SAMPLE_RATE: u32 = 48_000;

/// A buzzer that plays tone patterns on the default audio output.
///
/// The output stream is not `Send`; create the buzzer on the thread that
/// plays it (see [`super::BuzzerWorker`]).
pub struct RodioBuzzer {
    /// Must stay alive for the handle to work.
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    volume: f32,
    disabled: AtomicBool,
}

impl RodioBuzzer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no output device can be
    /// opened.
    pub fn new(volume: f32) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!(volume, "audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            volume: volume.clamp(0.0, 1.0),
            disabled: AtomicBool::new(false),
        })
    }

    fn play_steps(&self, steps: &[ToneStep]) -> Result<(), SoundError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;
        sink.set_volume(self.volume);

        for step in steps {
            let tone = SignalGenerator::new(
                SampleRate(SAMPLE_RATE),
                step.frequency_hz as f32,
                Function::Square,
            )
            .take_duration(step.duration());
            sink.append(tone);

            if step.gap_ms > 0 {
                sink.append(Zero::<f32>::new(1, SAMPLE_RATE).take_duration(step.gap()));
            }
        }

        sink.sleep_until_end();
        Ok(())
    }
}

impl Buzzer for RodioBuzzer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!(%cue, "sound disabled, skipping");
            return Ok(());
        }
        debug!(%cue, "playing cue");
        self.play_steps(pattern(cue))
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for RodioBuzzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioBuzzer")
            .field("volume", &self.volume)
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
