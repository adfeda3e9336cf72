//! Rotary encoder decoding.
//!
//! Pin reading belongs to the platform; these types only turn sampled
//! levels and button edges into [`InputEvent`]s.

use std::time::{Duration, Instant};

use super::{InputEvent, InputLatch};

/// Hold time after which a press counts as long.
pub const LONG_PRESS_MS: u64 = 2000;

/// Edges closer than this to the previous accepted edge are ignored.
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

// ============================================================================
// QuadratureDecoder
// ============================================================================

/// Decodes CLK/DT levels into single detent steps.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    last_clk: bool,
    inverted: bool,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        // Pull-ups hold both lines high at rest.
        Self::new(true)
    }
}

impl QuadratureDecoder {
    /// Creates a decoder seeded with the current CLK level.
    pub fn new(initial_clk: bool) -> Self {
        Self {
            last_clk: initial_clk,
            inverted: false,
        }
    }

    /// Swaps the rotation direction for encoders wired the other way round.
    pub fn with_direction_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Feeds one sample. Returns +1 (clockwise) or -1 when CLK changed.
    pub fn update(&mut self, clk: bool, dt: bool) -> Option<i32> {
        if clk == self.last_clk {
            return None;
        }
        self.last_clk = clk;

        let delta = if clk == dt { 1 } else { -1 };
        Some(if self.inverted { -delta } else { delta })
    }
}

// ============================================================================
// ButtonTracker
// ============================================================================

/// Classifies button presses by hold time.
///
/// A long press is reported as soon as [`ButtonTracker::poll`] sees the
/// threshold elapse, or on release if nobody polled in time. Either way it
/// is reported once per press.
#[derive(Debug, Clone)]
pub struct ButtonTracker {
    threshold: Duration,
    debounce: Duration,
    pressed_at: Option<Instant>,
    last_edge: Option<Instant>,
    long_reported: bool,
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(LONG_PRESS_MS))
    }
}

impl ButtonTracker {
    /// Creates a tracker with the given long-press threshold.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            debounce: Duration::from_millis(BUTTON_DEBOUNCE_MS),
            pressed_at: None,
            last_edge: None,
            long_reported: false,
        }
    }

    /// Overrides the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Returns true while the button is held.
    pub fn is_held(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Feeds a press (`pressed == true`) or release edge.
    pub fn on_edge(&mut self, pressed: bool, at: Instant) -> Option<InputEvent> {
        if let Some(last) = self.last_edge {
            if at.saturating_duration_since(last) < self.debounce {
                return None;
            }
        }

        match (pressed, self.pressed_at) {
            (true, None) => {
                self.last_edge = Some(at);
                self.pressed_at = Some(at);
                self.long_reported = false;
                None
            }
            (false, Some(start)) => {
                self.last_edge = Some(at);
                self.pressed_at = None;
                if self.long_reported {
                    None
                } else if at.saturating_duration_since(start) >= self.threshold {
                    Some(InputEvent::LongPress)
                } else {
                    Some(InputEvent::ShortPress)
                }
            }
            // Repeated level without a transition.
            _ => None,
        }
    }

    /// Reports a long press once the held button crosses the threshold.
    pub fn poll(&mut self, now: Instant) -> Option<InputEvent> {
        let start = self.pressed_at?;
        if self.long_reported || now.saturating_duration_since(start) < self.threshold {
            return None;
        }
        self.long_reported = true;
        Some(InputEvent::LongPress)
    }
}

// ============================================================================
// EncoderInput
// ============================================================================

/// Encoder plus push button feeding an [`InputLatch`].
#[derive(Debug, Clone)]
pub struct EncoderInput {
    decoder: QuadratureDecoder,
    button: ButtonTracker,
    latch: InputLatch,
}

impl EncoderInput {
    pub fn new(decoder: QuadratureDecoder, button: ButtonTracker, latch: InputLatch) -> Self {
        Self {
            decoder,
            button,
            latch,
        }
    }

    /// Feeds a CLK/DT sample.
    pub fn on_rotation_sample(&mut self, clk: bool, dt: bool) {
        if let Some(delta) = self.decoder.update(clk, dt) {
            self.latch.record_rotation(delta);
        }
    }

    /// Feeds a switch edge. The switch is active low.
    pub fn on_switch_level(&mut self, level_high: bool, at: Instant) {
        if let Some(event) = self.button.on_edge(!level_high, at) {
            self.latch.record(event);
        }
    }

    /// Checks the held button against the long-press threshold.
    pub fn poll(&mut self, now: Instant) {
        if let Some(event) = self.button.poll(now) {
            self.latch.record(event);
        }
    }
}
