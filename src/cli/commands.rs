//! Command definitions for the gym timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{ConfigError, Mode, TimerConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// BJJ gym timer - rounds, drilling intervals and competition matches
#[derive(Parser, Debug)]
#[command(
    name = "bjj-timer",
    version,
    about = "Interval timer for BJJ and combat-sports training",
    long_about = "A terminal interval timer for sparring rounds, drilling intervals and \
                  competition matches.\n\
                  Controls: '+'/'-' rotate, Enter short press, 'l' long press, 'q' quit.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer in this terminal
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Training mode preselected in the menu
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeArg {
    #[default]
    Sparring,
    Drilling,
    Competition,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sparring => Mode::Sparring,
            ModeArg::Drilling => Mode::Drilling,
            ModeArg::Competition => Mode::Competition,
        }
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Mode selected when the menu opens
    #[arg(short, long, value_enum, default_value_t = ModeArg::Sparring)]
    pub mode: ModeArg,

    /// Round length, or drilling interval, in seconds (multiple of 15)
    #[arg(
        short,
        long,
        default_value = "300",
        value_parser = clap::value_parser!(u32).range(30..=3600)
    )]
    pub work: u32,

    /// Rest between rounds in seconds (multiple of 15)
    #[arg(
        short,
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u32).range(0..=600)
    )]
    pub rest: u32,

    /// Number of sparring rounds (1-20)
    #[arg(
        short = 'n',
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=20)
    )]
    pub rounds: u32,

    /// Competition length: 0 = 5 min, 1 = 6 min, 2 = 8 min, 3 = 10 min
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..=3)
    )]
    pub comp_index: u32,

    /// Disable the buzzer
    #[arg(long)]
    pub no_sound: bool,

    /// Buzzer volume (0.0-1.0)
    #[arg(long, default_value = "0.8", value_parser = parse_volume)]
    pub volume: f32,

    /// Print snapshots as JSON lines instead of drawing the screen
    #[arg(long)]
    pub json: bool,

    /// Input poll period in milliseconds (10-1000)
    #[arg(
        long,
        default_value = "50",
        value_parser = clap::value_parser!(u64).range(10..=1000)
    )]
    pub poll_ms: u64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            mode: ModeArg::Sparring,
            work: 300,
            rest: 60,
            rounds: 5,
            comp_index: 0,
            no_sound: false,
            volume: 0.8,
            json: false,
            poll_ms: 50,
        }
    }
}

impl RunArgs {
    /// Builds and validates the startup configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a value is out of range for the selected
    /// mode or not a multiple of the setup step.
    pub fn to_config(&self) -> Result<TimerConfig, ConfigError> {
        let config = TimerConfig::default()
            .with_work_seconds(self.work)
            .with_rest_seconds(self.rest)
            .with_round_count(self.rounds)
            .with_comp_time_index(self.comp_index as usize);
        config.validate_for(self.mode.into())?;
        Ok(config)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a volume between 0.0 and 1.0.
fn parse_volume(s: &str) -> Result<f32, String> {
    let volume: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=1.0).contains(&volume) {
        return Err("volume must be between 0.0 and 1.0".to_string());
    }
    Ok(volume)
}

// ============================================================================
// Tests
// ============================================================================
