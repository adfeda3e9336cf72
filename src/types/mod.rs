//! Core data types for the gym timer.
//!
//! This module defines the data structures shared by the engine and its
//! observers:
//! - Training modes, timer states and session phases
//! - Session configuration with validation
//! - One-shot cues and the published snapshot

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Selectable competition match lengths in seconds (5, 6, 8 and 10 minutes).
pub const COMPETITION_TIMES: [u32; 4] = [300, 360, 480, 600];

/// Rotation step while editing durations in the setup screens.
pub const SETUP_STEP_SECONDS: u32 = 15;

/// Rotation step while a session is running or paused.
pub const RUNTIME_ADJUST_SECONDS: u32 = 30;

/// Countdown value at which the warning cue fires.
pub const TEN_SECOND_MARK: u32 = 10;

/// Upper bound of any countdown.
pub const MAX_SECONDS: u32 = 3600;

/// Sparring round length bounds.
pub const SPARRING_WORK_RANGE: (u32, u32) = (60, 3600);

/// Drilling interval bounds.
pub const DRILLING_INTERVAL_RANGE: (u32, u32) = (30, 600);

/// Rest length bounds.
pub const REST_RANGE: (u32, u32) = (0, 600);

/// Round count bounds.
pub const ROUND_RANGE: (u32, u32) = (1, 20);

// ============================================================================
// Mode
// ============================================================================

/// Training style selected in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Rounds separated by rest periods
    #[default]
    Sparring,
    /// Continuous equal intervals with a partner-switch cue
    Drilling,
    /// One fixed-length match
    Competition,
}

impl Mode {
    /// All modes in menu order.
    pub const ALL: [Mode; 3] = [Mode::Sparring, Mode::Drilling, Mode::Competition];

    /// Returns the menu label of the mode.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Sparring => "SPARRING",
            Mode::Drilling => "DRILLING",
            Mode::Competition => "COMPETITION",
        }
    }

    /// Returns the snake_case name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Sparring => "sparring",
            Mode::Drilling => "drilling",
            Mode::Competition => "competition",
        }
    }

    fn index(&self) -> i64 {
        match self {
            Mode::Sparring => 0,
            Mode::Drilling => 1,
            Mode::Competition => 2,
        }
    }

    /// Moves the selection by `delta` entries, wrapping around the menu.
    pub fn cycle(&self, delta: i32) -> Mode {
        let len = Self::ALL.len() as i64;
        let index = (self.index() + i64::from(delta)).rem_euclid(len);
        Self::ALL[index as usize]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Screen/state of the timer, which decides how inputs are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Selecting the mode
    #[default]
    Menu,
    /// Configuring round time, drilling interval or match length
    SetupWork,
    /// Configuring rest time (sparring only)
    SetupRest,
    /// Configuring the round count (sparring only)
    SetupRounds,
    /// Countdown active
    Running,
    /// Countdown frozen
    Paused,
    /// Session complete
    Finished,
}

impl TimerState {
    /// Returns the snake_case name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Menu => "menu",
            TimerState::SetupWork => "setup_work",
            TimerState::SetupRest => "setup_rest",
            TimerState::SetupRounds => "setup_rounds",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        }
    }

    /// Returns true for the three setup screens.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            TimerState::SetupWork | TimerState::SetupRest | TimerState::SetupRounds
        )
    }

    /// Returns true while a session exists (running, paused or finished).
    pub fn has_session(&self) -> bool {
        matches!(
            self,
            TimerState::Running | TimerState::Paused | TimerState::Finished
        )
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Phase
// ============================================================================

/// Sub-state of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Round or interval time
    #[default]
    Work,
    /// Rest between sparring rounds
    Rest,
    /// Drilling partner switch (display label only)
    Switch,
}

impl Phase {
    /// Returns the badge text shown on the running screen.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "WORK",
            Phase::Rest => "REST",
            Phase::Switch => "SWITCH!",
        }
    }
}

// ============================================================================
// Cue
// ============================================================================

/// One-shot audio/visual event derived from a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// A round (or match, or drilling session) starts
    RoundStart,
    /// Ten seconds left in the current phase
    TenSecondWarning,
    /// A round or rest period ended, or the session finished
    RoundEnd,
    /// Drilling partners swap
    Switch,
}

impl Cue {
    /// Returns the snake_case name of the cue.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::RoundStart => "round_start",
            Cue::TenSecondWarning => "ten_second_warning",
            Cue::RoundEnd => "round_end",
            Cue::Switch => "switch",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration errors reported when validating a startup configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Value outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Duration not aligned to the setup step.
    #[error("{field} must be a multiple of {step} seconds, got {value}")]
    OffStep {
        field: &'static str,
        value: u32,
        step: u32,
    },
}

/// Session configuration edited in the setup screens.
///
/// Fields only matter for the mode they were set for; switching mode leaves
/// the other fields untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Sparring round length or drilling interval in seconds
    pub work_seconds: u32,
    /// Rest between sparring rounds in seconds
    pub rest_seconds: u32,
    /// Number of sparring rounds
    pub round_count: u32,
    /// Index into [`COMPETITION_TIMES`]
    pub comp_time_index: usize,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_seconds: 300,
            rest_seconds: 60,
            round_count: 5,
            comp_time_index: 0,
        }
    }
}

impl TimerConfig {
    /// Sets the round length / drilling interval.
    pub fn with_work_seconds(mut self, seconds: u32) -> Self {
        self.work_seconds = seconds;
        self
    }

    /// Sets the rest length.
    pub fn with_rest_seconds(mut self, seconds: u32) -> Self {
        self.rest_seconds = seconds;
        self
    }

    /// Sets the number of sparring rounds.
    pub fn with_round_count(mut self, rounds: u32) -> Self {
        self.round_count = rounds;
        self
    }

    /// Sets the competition length index.
    pub fn with_comp_time_index(mut self, index: usize) -> Self {
        self.comp_time_index = index;
        self
    }

    /// Returns the selected competition match length in seconds.
    pub fn competition_seconds(&self) -> u32 {
        let last = COMPETITION_TIMES.len() - 1;
        COMPETITION_TIMES[self.comp_time_index.min(last)]
    }

    /// Validates the configuration for the given mode.
    ///
    /// The round length is checked against the sparring range, or against
    /// the drilling range when `mode` is [`Mode::Drilling`].
    pub fn validate_for(&self, mode: Mode) -> Result<(), ConfigError> {
        let (work_min, work_max) = match mode {
            Mode::Drilling => DRILLING_INTERVAL_RANGE,
            Mode::Sparring | Mode::Competition => SPARRING_WORK_RANGE,
        };
        check_range("work_seconds", self.work_seconds, work_min, work_max)?;
        check_step("work_seconds", self.work_seconds)?;
        check_range("rest_seconds", self.rest_seconds, REST_RANGE.0, REST_RANGE.1)?;
        check_step("rest_seconds", self.rest_seconds)?;
        check_range("round_count", self.round_count, ROUND_RANGE.0, ROUND_RANGE.1)?;

        let max_index = (COMPETITION_TIMES.len() - 1) as u32;
        let index = u32::try_from(self.comp_time_index).unwrap_or(u32::MAX);
        check_range("comp_time_index", index, 0, max_index)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_step(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value % SETUP_STEP_SECONDS != 0 {
        return Err(ConfigError::OffStep {
            field,
            value,
            step: SETUP_STEP_SECONDS,
        });
    }
    Ok(())
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only projection of the timer handed to observers.
///
/// The cue fields are true only in the snapshot published right after the
/// transition that armed them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub mode: Mode,
    pub phase: Phase,
    pub current_round: u32,
    pub total_rounds: u32,
    pub seconds_remaining: u32,
    /// Length of the current phase, for progress rendering
    pub phase_total_seconds: u32,
    /// Raw value being edited in a setup screen
    pub setup_value: u32,
    pub menu_label: String,
    pub value_label: String,
    pub round_start_due: bool,
    pub ten_second_warning_due: bool,
    pub round_end_due: bool,
    pub switch_due: bool,
    /// Due cues in the order they were armed
    pub cues: Vec<Cue>,
}

impl Snapshot {
    /// Returns true if any cue is due in this snapshot.
    pub fn has_cues(&self) -> bool {
        !self.cues.is_empty()
    }

    /// Phase to show on screen: `Switch` for the one snapshot carrying the
    /// drilling switch cue, the session phase otherwise.
    pub fn display_phase(&self) -> Phase {
        if self.switch_due {
            Phase::Switch
        } else {
            self.phase
        }
    }

    /// Fraction of the current phase already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.phase_total_seconds == 0 {
            return 0.0;
        }
        let remaining = self.seconds_remaining.min(self.phase_total_seconds);
        1.0 - remaining as f32 / self.phase_total_seconds as f32
    }
}

/// Formats seconds as `m:ss`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Tests
// ============================================================================
