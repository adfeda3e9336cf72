//! CLI module for the gym timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Screen rendering and messages
//! - `presenter`: Snapshot observer tying the screen and buzzer together

pub mod commands;
pub mod display;
pub mod presenter;

pub use commands::{Cli, Commands, ModeArg, RunArgs};
pub use display::Display;
pub use presenter::{OutputFormat, Presenter};
