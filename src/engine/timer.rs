//! Timer state machine for the gym timer.
//!
//! This module provides the core timer functionality:
//! - Menu → setup → running/paused → finished transitions
//! - Setup adjustments with saturating bounds
//! - Once-per-second countdown with phase expiry
//! - One-shot cue derivation and snapshot publication

use tracing::{debug, info, trace};

use crate::input::InputEvent;
use crate::types::{
    format_clock, Cue, Mode, Snapshot, TimerConfig, TimerState, COMPETITION_TIMES,
    DRILLING_INTERVAL_RANGE, REST_RANGE, ROUND_RANGE, SETUP_STEP_SECONDS, SPARRING_WORK_RANGE,
};

use super::cues::CueQueue;
use super::session::{ActiveSession, Expiry};

// ============================================================================
// SnapshotObserver
// ============================================================================

/// Receives every snapshot the engine publishes.
pub trait SnapshotObserver {
    /// Called synchronously after each mutating call.
    fn observe(&mut self, snapshot: &Snapshot);
}

impl<F> SnapshotObserver for F
where
    F: FnMut(&Snapshot),
{
    fn observe(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

// ============================================================================
// Stage
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupStep {
    Work,
    Rest,
    Rounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    Menu,
    Setup(SetupStep),
    Running(ActiveSession),
    Paused(ActiveSession),
    Finished(ActiveSession),
}

impl Stage {
    fn state(&self) -> TimerState {
        match self {
            Stage::Menu => TimerState::Menu,
            Stage::Setup(SetupStep::Work) => TimerState::SetupWork,
            Stage::Setup(SetupStep::Rest) => TimerState::SetupRest,
            Stage::Setup(SetupStep::Rounds) => TimerState::SetupRounds,
            Stage::Running(_) => TimerState::Running,
            Stage::Paused(_) => TimerState::Paused,
            Stage::Finished(_) => TimerState::Finished,
        }
    }

    fn session(&self) -> Option<&ActiveSession> {
        match self {
            Stage::Running(active) | Stage::Paused(active) | Stage::Finished(active) => {
                Some(active)
            }
            Stage::Menu | Stage::Setup(_) => None,
        }
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// The gym timer state machine.
///
/// Every entry point returns `Some(snapshot)` when the input changed the
/// timer (the same snapshot is handed to the observer) and `None` when the
/// input was irrelevant in the current state.
pub struct TimerEngine {
    mode: Mode,
    config: TimerConfig,
    stage: Stage,
    cues: CueQueue,
    observer: Option<Box<dyn SnapshotObserver + Send>>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("mode", &self.mode)
            .field("config", &self.config)
            .field("stage", &self.stage)
            .field("cues", &self.cues)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl TimerEngine {
    /// Creates an engine in the menu with the given configuration.
    ///
    /// Out-of-range fields are clamped to the widest range any mode
    /// accepts; the per-mode work range is applied when setup starts.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            mode: Mode::default(),
            config: clamp_config(config),
            stage: Stage::Menu,
            cues: CueQueue::new(),
            observer: None,
        }
    }

    /// Preselects the menu mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Registers the observer that receives every published snapshot.
    pub fn set_observer<O>(&mut self, observer: O)
    where
        O: SnapshotObserver + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Removes the observer.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.stage.state()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the current projection without draining pending cues.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.build_snapshot(self.cues.pending().to_vec())
    }

    /// Publishes the current state, e.g. for the first screen.
    pub fn refresh(&mut self) -> Snapshot {
        self.publish()
    }

    /// Dispatches an input event to the matching entry point.
    pub fn handle(&mut self, event: InputEvent) -> Option<Snapshot> {
        match event {
            InputEvent::Rotate(delta) => self.rotate(delta),
            InputEvent::ShortPress => self.short_press(),
            InputEvent::LongPress => self.long_press(),
        }
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Handles encoder rotation; positive is clockwise.
    pub fn rotate(&mut self, delta: i32) -> Option<Snapshot> {
        if delta == 0 {
            return None;
        }
        debug!(delta, state = %self.state(), "rotate");

        if let Stage::Setup(step) = self.stage {
            self.adjust_setup(step, delta);
            return Some(self.publish());
        }

        match &mut self.stage {
            Stage::Menu => {
                self.mode = self.mode.cycle(delta);
                debug!(mode = %self.mode, "mode selected");
            }
            Stage::Setup(_) | Stage::Finished(_) => return None,
            Stage::Running(active) | Stage::Paused(active) => {
                active.adjust(delta);
                debug!(
                    remaining = active.session.remaining(),
                    warning_latched = active.warning_latched(),
                    "countdown adjusted"
                );
            }
        }
        Some(self.publish())
    }

    /// Handles a short button press.
    pub fn short_press(&mut self) -> Option<Snapshot> {
        debug!(state = %self.state(), "short press");

        let stage = std::mem::replace(&mut self.stage, Stage::Menu);
        self.stage = match stage {
            Stage::Menu => self.enter_setup(),
            Stage::Setup(step) => self.confirm_setup(step),
            Stage::Running(active) => {
                info!("paused");
                Stage::Paused(active)
            }
            Stage::Paused(active) => {
                info!("resumed");
                Stage::Running(active)
            }
            Stage::Finished(_) => Stage::Menu,
        };
        Some(self.publish())
    }

    /// Handles a long button press: back to the menu from anywhere but the
    /// menu itself.
    pub fn long_press(&mut self) -> Option<Snapshot> {
        debug!(state = %self.state(), "long press");

        if self.stage == Stage::Menu {
            return None;
        }
        if self.stage.session().is_some() {
            info!("session discarded");
        }
        self.stage = Stage::Menu;
        Some(self.publish())
    }

    /// Advances the countdown by one second. No-op unless running.
    pub fn tick(&mut self) -> Option<Snapshot> {
        let Stage::Running(active) = &mut self.stage else {
            return None;
        };

        let expiry = active.tick(&mut self.cues);
        trace!(remaining = active.session.remaining(), "tick");

        if expiry == Expiry::Finished {
            self.finish();
        }
        Some(self.publish())
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn enter_setup(&mut self) -> Stage {
        let work_range = match self.mode {
            Mode::Sparring => Some(SPARRING_WORK_RANGE),
            Mode::Drilling => Some(DRILLING_INTERVAL_RANGE),
            Mode::Competition => None,
        };
        if let Some(range) = work_range {
            self.config.work_seconds = clamp_to(self.config.work_seconds, range);
        }
        debug!(mode = %self.mode, "setup started");
        Stage::Setup(SetupStep::Work)
    }

    fn confirm_setup(&mut self, step: SetupStep) -> Stage {
        match (step, self.mode) {
            (SetupStep::Work, Mode::Sparring) => Stage::Setup(SetupStep::Rest),
            (SetupStep::Rest, _) => Stage::Setup(SetupStep::Rounds),
            (SetupStep::Work, Mode::Drilling | Mode::Competition) | (SetupStep::Rounds, _) => {
                self.start_session()
            }
        }
    }

    fn start_session(&mut self) -> Stage {
        let active = ActiveSession::start(self.mode, &self.config, &mut self.cues);
        info!(
            mode = %self.mode,
            seconds = active.session.remaining(),
            rounds = active.session.total_rounds(),
            "session started"
        );
        Stage::Running(active)
    }

    fn finish(&mut self) {
        let stage = std::mem::replace(&mut self.stage, Stage::Menu);
        if let Stage::Running(active) = stage {
            self.cues.arm(Cue::RoundEnd);
            info!(mode = %self.mode, "session finished");
            self.stage = Stage::Finished(active);
        } else {
            self.stage = stage;
        }
    }

    fn adjust_setup(&mut self, step: SetupStep, delta: i32) {
        let config = &mut self.config;
        match (step, self.mode) {
            (SetupStep::Work, Mode::Sparring) => {
                config.work_seconds = step_clamped(
                    config.work_seconds,
                    delta,
                    SETUP_STEP_SECONDS,
                    SPARRING_WORK_RANGE,
                );
            }
            (SetupStep::Work | SetupStep::Rounds, Mode::Drilling) => {
                config.work_seconds = step_clamped(
                    config.work_seconds,
                    delta,
                    SETUP_STEP_SECONDS,
                    DRILLING_INTERVAL_RANGE,
                );
            }
            (SetupStep::Work | SetupStep::Rounds, Mode::Competition) => {
                let last = (COMPETITION_TIMES.len() - 1) as u32;
                let index = u32::try_from(config.comp_time_index).unwrap_or(last);
                config.comp_time_index = step_clamped(index, delta, 1, (0, last)) as usize;
            }
            (SetupStep::Rest, _) => {
                config.rest_seconds =
                    step_clamped(config.rest_seconds, delta, SETUP_STEP_SECONDS, REST_RANGE);
            }
            (SetupStep::Rounds, Mode::Sparring) => {
                config.round_count = step_clamped(config.round_count, delta, 1, ROUND_RANGE);
            }
        }
        debug!(value = self.setup_value(), "setup adjusted");
    }

    // ------------------------------------------------------------------------
    // Publication
    // ------------------------------------------------------------------------

    fn publish(&mut self) -> Snapshot {
        let cues = self.cues.drain();
        let snapshot = self.build_snapshot(cues);
        if snapshot.has_cues() {
            debug!(cues = ?snapshot.cues, "cues due");
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&snapshot);
        }
        snapshot
    }

    fn build_snapshot(&self, cues: Vec<Cue>) -> Snapshot {
        let mut snapshot = Snapshot {
            state: self.state(),
            mode: self.mode,
            menu_label: self.mode.label().to_string(),
            round_start_due: cues.contains(&Cue::RoundStart),
            ten_second_warning_due: cues.contains(&Cue::TenSecondWarning),
            round_end_due: cues.contains(&Cue::RoundEnd),
            switch_due: cues.contains(&Cue::Switch),
            cues,
            ..Snapshot::default()
        };

        if let Some(active) = self.stage.session() {
            let session = &active.session;
            snapshot.phase = session.phase();
            snapshot.current_round = session.current_round();
            snapshot.total_rounds = session.total_rounds();
            snapshot.seconds_remaining = session.remaining();
            snapshot.phase_total_seconds = session.phase_total();
            snapshot.value_label = format_clock(session.remaining());
        } else if let Stage::Setup(step) = self.stage {
            snapshot.setup_value = self.setup_value();
            snapshot.value_label = self.setup_label(step);
        }
        snapshot
    }

    fn setup_value(&self) -> u32 {
        match (self.stage.state(), self.mode) {
            (TimerState::SetupRest, _) => self.config.rest_seconds,
            (TimerState::SetupRounds, Mode::Sparring) => self.config.round_count,
            (TimerState::SetupWork | TimerState::SetupRounds, Mode::Competition) => {
                u32::try_from(self.config.comp_time_index).unwrap_or(u32::MAX)
            }
            (TimerState::SetupWork | TimerState::SetupRounds, _) => self.config.work_seconds,
            _ => 0,
        }
    }

    fn setup_label(&self, step: SetupStep) -> String {
        match (step, self.mode) {
            (SetupStep::Rest, _) => format_clock(self.config.rest_seconds),
            (SetupStep::Rounds, Mode::Sparring) => format!("{} rounds", self.config.round_count),
            (SetupStep::Work, Mode::Sparring) => format_clock(self.config.work_seconds),
            (_, Mode::Drilling) => format!("{} each", format_clock(self.config.work_seconds)),
            (_, Mode::Competition) => format!("{} min", self.config.competition_seconds() / 60),
        }
    }
}

/// Adds `delta` steps to `value` and saturates at the inclusive bounds.
fn step_clamped(value: u32, delta: i32, step: u32, (min, max): (u32, u32)) -> u32 {
    let next = i64::from(value) + i64::from(delta) * i64::from(step);
    next.clamp(i64::from(min), i64::from(max)) as u32
}

fn clamp_to(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}

fn clamp_config(config: TimerConfig) -> TimerConfig {
    let work_range = (DRILLING_INTERVAL_RANGE.0, SPARRING_WORK_RANGE.1);
    TimerConfig {
        work_seconds: clamp_to(config.work_seconds, work_range),
        rest_seconds: clamp_to(config.rest_seconds, REST_RANGE),
        round_count: clamp_to(config.round_count, ROUND_RANGE),
        comp_time_index: config.comp_time_index.min(COMPETITION_TIMES.len() - 1),
    }
}

// ============================================================================
// Tests
// ============================================================================
