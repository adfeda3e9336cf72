//! Input events and the latch shared between input sources and the control
//! loop.
//!
//! - `encoder`: quadrature decoding and press-duration classification
//! - `keyboard`: line-based terminal controls

pub mod encoder;
pub mod keyboard;

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// InputEvent
// ============================================================================

/// Abstract control input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Encoder detents; positive is clockwise
    Rotate(i32),
    /// Button released before the long-press threshold
    ShortPress,
    /// Button held past the long-press threshold
    LongPress,
}

// ============================================================================
// InputLatch
// ============================================================================

#[derive(Debug, Default)]
struct LatchInner {
    rotation: AtomicI32,
    short_press: AtomicBool,
    long_press: AtomicBool,
}

/// Inputs collected since the last drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingInput {
    pub rotation: i32,
    pub short_press: bool,
    pub long_press: bool,
}

impl PendingInput {
    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.rotation == 0 && !self.short_press && !self.long_press
    }

    /// Returns the recorded inputs in dispatch order: rotation, short press,
    /// long press.
    pub fn events(&self) -> Vec<InputEvent> {
        let mut events = Vec::with_capacity(3);
        if self.rotation != 0 {
            events.push(InputEvent::Rotate(self.rotation));
        }
        if self.short_press {
            events.push(InputEvent::ShortPress);
        }
        if self.long_press {
            events.push(InputEvent::LongPress);
        }
        events
    }
}

/// Cloneable handle through which input sources hand events to the control
/// loop.
///
/// Rotations accumulate; presses collapse into one flag each until drained.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    inner: Arc<LatchInner>,
}

impl InputLatch {
    /// Creates an empty latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds encoder detents.
    pub fn record_rotation(&self, delta: i32) {
        if delta != 0 {
            let _ = self
                .inner
                .rotation
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                    Some(current.saturating_add(delta))
                });
        }
    }

    /// Records a short press.
    pub fn record_short_press(&self) {
        self.inner.short_press.store(true, Ordering::SeqCst);
    }

    /// Records a long press.
    pub fn record_long_press(&self) {
        self.inner.long_press.store(true, Ordering::SeqCst);
    }

    /// Records any input event.
    pub fn record(&self, event: InputEvent) {
        match event {
            InputEvent::Rotate(delta) => self.record_rotation(delta),
            InputEvent::ShortPress => self.record_short_press(),
            InputEvent::LongPress => self.record_long_press(),
        }
    }

    /// Takes everything recorded since the previous drain.
    pub fn drain(&self) -> PendingInput {
        PendingInput {
            rotation: self.inner.rotation.swap(0, Ordering::SeqCst),
            short_press: self.inner.short_press.swap(false, Ordering::SeqCst),
            long_press: self.inner.long_press.swap(false, Ordering::SeqCst),
        }
    }
}
