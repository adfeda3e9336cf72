//! Timer engine and control loop.
//!
//! - `timer`: the state machine behind the menu, setup and countdown screens
//! - `session`: per-mode countdown state
//! - `cues`: one-shot cue queue drained on publication
//! - `runner`: the control loop that feeds inputs and ticks to the engine

pub mod cues;
mod session;
pub mod runner;
pub mod timer;

pub use cues::CueQueue;
pub use runner::{ControlLoop, LoopConfig};
pub use timer::{SnapshotObserver, TimerEngine};
