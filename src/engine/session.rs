//! Per-mode session state.
//!
//! A session exists from the moment the countdown starts until the timer
//! returns to the menu. Each mode carries only the fields it needs.

use tracing::info;

use crate::types::{
    Cue, Mode, Phase, TimerConfig, MAX_SECONDS, RUNTIME_ADJUST_SECONDS, TEN_SECOND_MARK,
};

use super::cues::CueQueue;

/// Outcome of a tick or a phase expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expiry {
    /// The session keeps running
    Continue,
    /// The session is over
    Finished,
}

// ============================================================================
// Sparring
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SparringPhase {
    Work,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SparringSession {
    round: u32,
    total_rounds: u32,
    phase: SparringPhase,
    remaining: u32,
    work_seconds: u32,
    rest_seconds: u32,
}

impl SparringSession {
    fn start(config: &TimerConfig) -> Self {
        Self {
            round: 1,
            total_rounds: config.round_count,
            phase: SparringPhase::Work,
            remaining: config.work_seconds,
            work_seconds: config.work_seconds,
            rest_seconds: config.rest_seconds,
        }
    }

    fn expire(&mut self, cues: &mut CueQueue) -> Expiry {
        cues.arm(Cue::RoundEnd);
        match self.phase {
            SparringPhase::Work if self.round >= self.total_rounds => Expiry::Finished,
            SparringPhase::Work => {
                info!(round = self.round, total = self.total_rounds, "round over, resting");
                self.phase = SparringPhase::Rest;
                self.remaining = self.rest_seconds;
                Expiry::Continue
            }
            SparringPhase::Rest => {
                self.round += 1;
                self.phase = SparringPhase::Work;
                self.remaining = self.work_seconds;
                cues.arm(Cue::RoundStart);
                info!(round = self.round, total = self.total_rounds, "round started");
                Expiry::Continue
            }
        }
    }

    fn phase_total(&self) -> u32 {
        match self.phase {
            SparringPhase::Work => self.work_seconds,
            SparringPhase::Rest => self.rest_seconds,
        }
    }
}

// ============================================================================
// Drilling
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DrillingSession {
    interval: u32,
    remaining: u32,
    switches: u32,
}

impl DrillingSession {
    fn start(config: &TimerConfig) -> Self {
        Self {
            interval: config.work_seconds,
            remaining: config.work_seconds,
            switches: 0,
        }
    }

    fn expire(&mut self, cues: &mut CueQueue) -> Expiry {
        cues.arm(Cue::Switch);
        self.remaining = self.interval;
        self.switches += 1;
        info!(switches = self.switches, "partner switch");
        Expiry::Continue
    }
}

// ============================================================================
// Competition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompetitionSession {
    duration: u32,
    remaining: u32,
}

impl CompetitionSession {
    fn start(config: &TimerConfig) -> Self {
        let duration = config.competition_seconds();
        Self {
            duration,
            remaining: duration,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Countdown state of the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Session {
    Sparring(SparringSession),
    Drilling(DrillingSession),
    Competition(CompetitionSession),
}

impl Session {
    fn start(mode: Mode, config: &TimerConfig) -> Self {
        match mode {
            Mode::Sparring => Session::Sparring(SparringSession::start(config)),
            Mode::Drilling => Session::Drilling(DrillingSession::start(config)),
            Mode::Competition => Session::Competition(CompetitionSession::start(config)),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        match self {
            Session::Sparring(s) if s.phase == SparringPhase::Rest => Phase::Rest,
            _ => Phase::Work,
        }
    }

    pub(crate) fn current_round(&self) -> u32 {
        match self {
            Session::Sparring(s) => s.round,
            Session::Drilling(_) | Session::Competition(_) => 1,
        }
    }

    /// Total rounds: 0 means continuous.
    pub(crate) fn total_rounds(&self) -> u32 {
        match self {
            Session::Sparring(s) => s.total_rounds,
            Session::Drilling(_) => 0,
            Session::Competition(_) => 1,
        }
    }

    pub(crate) fn remaining(&self) -> u32 {
        match self {
            Session::Sparring(s) => s.remaining,
            Session::Drilling(s) => s.remaining,
            Session::Competition(s) => s.remaining,
        }
    }

    fn set_remaining(&mut self, seconds: u32) {
        match self {
            Session::Sparring(s) => s.remaining = seconds,
            Session::Drilling(s) => s.remaining = seconds,
            Session::Competition(s) => s.remaining = seconds,
        }
    }

    pub(crate) fn phase_total(&self) -> u32 {
        match self {
            Session::Sparring(s) => s.phase_total(),
            Session::Drilling(s) => s.interval,
            Session::Competition(s) => s.duration,
        }
    }

    fn expire(&mut self, cues: &mut CueQueue) -> Expiry {
        match self {
            Session::Sparring(s) => s.expire(cues),
            Session::Drilling(s) => s.expire(cues),
            Session::Competition(_) => Expiry::Finished,
        }
    }
}

// ============================================================================
// ActiveSession
// ============================================================================

/// A session together with its ten-second warning latch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActiveSession {
    pub(crate) session: Session,
    warning_latched: bool,
}

impl ActiveSession {
    /// Starts a fresh session for `mode` and arms the start cue.
    pub(crate) fn start(mode: Mode, config: &TimerConfig, cues: &mut CueQueue) -> Self {
        cues.arm(Cue::RoundStart);
        Self {
            session: Session::start(mode, config),
            warning_latched: false,
        }
    }

    /// Advances the countdown by one second.
    ///
    /// The phase expires in the same tick the countdown reaches zero.
    pub(crate) fn tick(&mut self, cues: &mut CueQueue) -> Expiry {
        let remaining = self.session.remaining();
        if remaining > 0 {
            let next = remaining - 1;
            self.session.set_remaining(next);
            if next == TEN_SECOND_MARK && !self.warning_latched {
                cues.arm(Cue::TenSecondWarning);
                self.warning_latched = true;
            }
        }

        if self.session.remaining() > 0 {
            return Expiry::Continue;
        }

        let expiry = self.session.expire(cues);
        if expiry == Expiry::Continue {
            self.warning_latched = false;
        }
        expiry
    }

    /// Moves the countdown by `delta` runtime steps, saturating at the bounds.
    ///
    /// Landing at or below the warning mark latches the warning for the
    /// rest of the phase.
    pub(crate) fn adjust(&mut self, delta: i32) {
        let seconds = i64::from(self.session.remaining())
            + i64::from(delta) * i64::from(RUNTIME_ADJUST_SECONDS);
        let seconds = seconds.clamp(0, i64::from(MAX_SECONDS)) as u32;
        self.session.set_remaining(seconds);
        if seconds <= TEN_SECOND_MARK {
            self.warning_latched = true;
        }
    }

    pub(crate) fn warning_latched(&self) -> bool {
        self.warning_latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparring_config() -> TimerConfig {
        TimerConfig::default()
            .with_work_seconds(60)
            .with_rest_seconds(30)
            .with_round_count(2)
    }

    fn run_ticks(active: &mut ActiveSession, cues: &mut CueQueue, ticks: u32) -> Expiry {
        let mut expiry = Expiry::Continue;
        for _ in 0..ticks {
            expiry = active.tick(cues);
        }
        expiry
    }

    mod start_tests {
        use super::*;

        #[test]
        fn test_sparring_start() {
            let mut cues = CueQueue::new();
            let active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);

            assert_eq!(active.session.phase(), Phase::Work);
            assert_eq!(active.session.current_round(), 1);
            assert_eq!(active.session.total_rounds(), 2);
            assert_eq!(active.session.remaining(), 60);
            assert_eq!(cues.pending(), &[Cue::RoundStart]);
            assert!(!active.warning_latched());
        }

        #[test]
        fn test_drilling_start() {
            let mut cues = CueQueue::new();
            let config = TimerConfig::default().with_work_seconds(90);
            let active = ActiveSession::start(Mode::Drilling, &config, &mut cues);

            assert_eq!(active.session.total_rounds(), 0);
            assert_eq!(active.session.current_round(), 1);
            assert_eq!(active.session.remaining(), 90);
            assert_eq!(active.session.phase_total(), 90);
        }

        #[test]
        fn test_competition_start() {
            let mut cues = CueQueue::new();
            let config = TimerConfig::default().with_comp_time_index(1);
            let active = ActiveSession::start(Mode::Competition, &config, &mut cues);

            assert_eq!(active.session.total_rounds(), 1);
            assert_eq!(active.session.remaining(), 360);
        }
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_decrements_once() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);
            let _ = cues.drain();

            assert_eq!(active.tick(&mut cues), Expiry::Continue);
            assert_eq!(active.session.remaining(), 59);
            assert!(cues.is_empty());
        }

        #[test]
        fn test_warning_fires_when_landing_on_ten() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);
            let _ = cues.drain();

            run_ticks(&mut active, &mut cues, 49);
            assert!(cues.is_empty());

            active.tick(&mut cues);
            assert_eq!(active.session.remaining(), 10);
            assert_eq!(cues.drain(), vec![Cue::TenSecondWarning]);
            assert!(active.warning_latched());
        }

        #[test]
        fn test_work_expiry_moves_to_rest() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);
            let _ = cues.drain();

            run_ticks(&mut active, &mut cues, 60);
            assert_eq!(active.session.phase(), Phase::Rest);
            assert_eq!(active.session.remaining(), 30);
            assert!(cues.is_armed(Cue::RoundEnd));
            assert!(!active.warning_latched());
        }

        #[test]
        fn test_rest_expiry_starts_next_round() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);
            run_ticks(&mut active, &mut cues, 60);
            let _ = cues.drain();

            run_ticks(&mut active, &mut cues, 30);
            assert_eq!(active.session.phase(), Phase::Work);
            assert_eq!(active.session.current_round(), 2);
            assert_eq!(cues.pending(), &[Cue::RoundEnd, Cue::RoundStart]);
        }

        #[test]
        fn test_last_round_finishes() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);

            assert_eq!(run_ticks(&mut active, &mut cues, 60 + 30 + 59), Expiry::Continue);
            assert_eq!(active.tick(&mut cues), Expiry::Finished);
            assert_eq!(active.session.remaining(), 0);
        }

        #[test]
        fn test_zero_rest_expires_on_next_tick() {
            let mut cues = CueQueue::new();
            let config = sparring_config().with_rest_seconds(0);
            let mut active = ActiveSession::start(Mode::Sparring, &config, &mut cues);

            run_ticks(&mut active, &mut cues, 60);
            assert_eq!(active.session.phase(), Phase::Rest);
            assert_eq!(active.session.remaining(), 0);

            active.tick(&mut cues);
            assert_eq!(active.session.phase(), Phase::Work);
            assert_eq!(active.session.current_round(), 2);
        }

        #[test]
        fn test_drilling_wraps() {
            let mut cues = CueQueue::new();
            let config = TimerConfig::default().with_work_seconds(30);
            let mut active = ActiveSession::start(Mode::Drilling, &config, &mut cues);
            let _ = cues.drain();

            assert_eq!(run_ticks(&mut active, &mut cues, 30), Expiry::Continue);
            assert_eq!(active.session.remaining(), 30);
            assert!(cues.is_armed(Cue::Switch));
            assert!(!active.warning_latched());
        }

        #[test]
        fn test_competition_finishes() {
            let mut cues = CueQueue::new();
            let config = TimerConfig::default().with_comp_time_index(0);
            let mut active = ActiveSession::start(Mode::Competition, &config, &mut cues);

            assert_eq!(run_ticks(&mut active, &mut cues, 299), Expiry::Continue);
            assert_eq!(active.tick(&mut cues), Expiry::Finished);
        }
    }

    mod adjust_tests {
        use super::*;

        #[test]
        fn test_adjust_by_runtime_step() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);

            active.adjust(2);
            assert_eq!(active.session.remaining(), 120);
            active.adjust(-1);
            assert_eq!(active.session.remaining(), 90);
        }

        #[test]
        fn test_adjust_saturates() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);

            active.adjust(i32::MAX);
            assert_eq!(active.session.remaining(), MAX_SECONDS);
            active.adjust(i32::MIN);
            assert_eq!(active.session.remaining(), 0);
        }

        #[test]
        fn test_adjust_below_mark_latches_warning() {
            let mut cues = CueQueue::new();
            let mut active = ActiveSession::start(Mode::Sparring, &sparring_config(), &mut cues);

            active.adjust(-2);
            assert_eq!(active.session.remaining(), 0);
            assert!(active.warning_latched());

            active.adjust(1);
            assert_eq!(active.session.remaining(), 30);
            assert!(active.warning_latched());
        }
    }
}
