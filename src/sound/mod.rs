//! Buzzer output for the gym timer.
//!
//! This module turns cues into audible tone patterns:
//!
//! - Per-cue tone patterns
//! - A blocking `Buzzer` trait with a rodio implementation (feature `audio`)
//! - A worker thread so long patterns never hold up the control loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  CueSender   ┌──────────────────┐
//! │  Control loop    │─────────────▶│  BuzzerWorker    │
//! │  (Presenter)     │  (bounded)   │  (own thread)    │
//! └──────────────────┘              └────────┬─────────┘
//!                                            │
//!                                            ▼
//!                                   ┌──────────────────┐
//!                                   │  impl Buzzer     │
//!                                   │  (rodio / mock)  │
//!                                   └──────────────────┘
//! ```

mod error;
#[cfg(feature = "audio")]
mod player;
pub mod tone;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::Cue;

pub use error::SoundError;
#[cfg(feature = "audio")]
pub use player::RodioBuzzer;
pub use tone::{pattern, pattern_duration, ToneStep};
pub use worker::{BuzzerWorker, CueSender, QUEUE_CAPACITY};

/// Plays cue patterns.
///
/// `play` blocks until the pattern has finished.
pub trait Buzzer {
    /// Plays the pattern for `cue`.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: Cue) -> Result<(), SoundError>;

    /// Returns true if playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables playback.
    fn enable(&self);

    /// Disables playback.
    fn disable(&self);
}

impl<B: Buzzer + ?Sized> Buzzer for Box<B> {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        (**self).play(cue)
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }

    fn enable(&self) {
        (**self).enable()
    }

    fn disable(&self) {
        (**self).disable()
    }
}

// ============================================================================
// SilentBuzzer
// ============================================================================

/// Logs cues instead of playing them.
#[derive(Debug, Default)]
pub struct SilentBuzzer {
    disabled: AtomicBool,
}

impl Buzzer for SilentBuzzer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if !self.is_disabled() {
            debug!(%cue, "cue (silent)");
        }
        Ok(())
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

/// Creates the buzzer for this build.
///
/// Without the `audio` feature a [`SilentBuzzer`] is returned and a
/// warning is logged.
///
/// # Errors
///
/// Returns an error if the audio output cannot be opened.
pub fn create_buzzer(volume: f32) -> Result<Box<dyn Buzzer>, SoundError> {
    #[cfg(feature = "audio")]
    {
        Ok(Box::new(RodioBuzzer::new(volume)?))
    }
    #[cfg(not(feature = "audio"))]
    {
        tracing::warn!(volume, "built without the audio feature, cues will be silent");
        Ok(Box::new(SilentBuzzer::default()))
    }
}

// ============================================================================
// MockBuzzer
// ============================================================================

#[derive(Debug, Default)]
struct MockState {
    play_calls: Mutex<Vec<Cue>>,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

/// Mock buzzer for testing. Clones share the recorded calls.
#[derive(Debug, Clone, Default)]
pub struct MockBuzzer {
    state: Arc<MockState>,
}

impl MockBuzzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.state.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<Cue> {
        self.calls().clone()
    }

    pub fn clear_calls(&self) {
        self.calls().clear();
    }

    /// Waits until at least `count` cues were played or `timeout` elapsed.
    pub fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.play_count() >= count {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.play_count() >= count
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<Cue>> {
        self.state
            .play_calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Buzzer for MockBuzzer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if self.state.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.is_disabled() {
            return Ok(());
        }
        self.calls().push(cue);
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.state.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.state.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.state.disabled.store(true, Ordering::SeqCst);
    }
}
