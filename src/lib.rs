//! BJJ Gym Timer Library
//!
//! This library provides the core functionality for the gym timer CLI.
//! It includes:
//! - Timer engine: the menu/setup/running state machine and its control loop
//! - Input handling for a rotary encoder with push button, or the keyboard
//! - Buzzer cues played on a worker thread
//! - CLI command parsing, screen rendering and JSON output
//! - Type definitions for configuration, state and snapshots

pub mod cli;
pub mod engine;
pub mod input;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_clock, ConfigError, Cue, Mode, Phase, Snapshot, TimerConfig, TimerState,
};

// Re-export engine types
pub use engine::{ControlLoop, CueQueue, LoopConfig, SnapshotObserver, TimerEngine};

// Re-export input types
pub use input::{InputEvent, InputLatch, PendingInput};

// Re-export sound types
pub use sound::{
    create_buzzer, Buzzer, BuzzerWorker, CueSender, MockBuzzer, SilentBuzzer, SoundError,
};
