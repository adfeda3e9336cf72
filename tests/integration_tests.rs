//! Integration tests for the gym timer.
//!
//! These tests drive the public API the way the terminal does:
//! key lines are parsed into the input latch, the control loop feeds the
//! engine, and the published snapshots are checked.

use bjj_timer::engine::{ControlLoop, LoopConfig, TimerEngine};
use bjj_timer::input::keyboard::{parse_key_line, read_keys, ReaderExit};
use bjj_timer::input::InputLatch;
use bjj_timer::types::{Cue, Mode, Phase, Snapshot, TimerConfig, TimerState};

// ============================================================================
// Test Helpers
// ============================================================================

fn control_with(engine: TimerEngine) -> (ControlLoop, InputLatch) {
    let latch = InputLatch::new();
    let control = ControlLoop::new(engine, latch.clone(), LoopConfig::default());
    (control, latch)
}

/// Types each line and lets the loop apply it before the next one.
fn type_lines(control: &mut ControlLoop, latch: &InputLatch, lines: &[&str]) {
    for line in lines {
        let input = format!("{}\n", line);
        let exit = read_keys(input.as_bytes(), latch).unwrap();
        assert_eq!(exit, ReaderExit::EndOfInput);
        control.apply_pending();
    }
}

fn run_ticks(engine: &mut TimerEngine, count: u32) -> Vec<Snapshot> {
    (0..count).filter_map(|_| engine.tick()).collect()
}

// ============================================================================
// Keyboard Setup Flow
// ============================================================================

mod keyboard_setup {
    use super::*;

    #[test]
    fn test_sparring_configured_from_keys() {
        let config = TimerConfig::default()
            .with_work_seconds(120)
            .with_rest_seconds(30)
            .with_round_count(2);
        let (mut control, latch) = control_with(TimerEngine::new(config));

        type_lines(&mut control, &latch, &["", "--", "", "-", "", "+", ""]);

        let engine = control.into_engine();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.state, TimerState::Running);
        assert_eq!(snapshot.mode, Mode::Sparring);
        assert_eq!(snapshot.seconds_remaining, 90);
        assert_eq!((snapshot.current_round, snapshot.total_rounds), (1, 3));

        let config = engine.config();
        assert_eq!(config.work_seconds, 90);
        assert_eq!(config.rest_seconds, 15);
        assert_eq!(config.round_count, 3);
    }

    #[test]
    fn test_mode_selected_from_keys() {
        let (mut control, latch) = control_with(TimerEngine::default());

        type_lines(&mut control, &latch, &["++", ""]);

        let snapshot = control.engine().snapshot();
        assert_eq!(snapshot.mode, Mode::Competition);
        assert_eq!(snapshot.state, TimerState::SetupWork);
        assert_eq!(snapshot.value_label, "5 min");
    }

    #[test]
    fn test_long_press_key_returns_to_menu() {
        let (mut control, latch) = control_with(TimerEngine::default());

        type_lines(&mut control, &latch, &["", "", "", "", "l"]);
        assert_eq!(control.engine().state(), TimerState::Menu);
    }

    #[test]
    fn test_unknown_keys_change_nothing() {
        let (mut control, latch) = control_with(TimerEngine::default());

        assert!(parse_key_line("xyz").is_empty());
        type_lines(&mut control, &latch, &["xyz"]);
        assert_eq!(control.engine().snapshot(), TimerEngine::default().snapshot());
    }
}

// ============================================================================
// Full Sessions
// ============================================================================

mod sessions {
    use super::*;

    #[test]
    fn test_sparring_session_warnings_and_finish() {
        let config = TimerConfig::default()
            .with_work_seconds(90)
            .with_rest_seconds(15)
            .with_round_count(3);
        let mut engine = TimerEngine::new(config);
        engine.short_press();
        engine.short_press();
        engine.short_press();
        let started = engine.short_press().unwrap();
        assert_eq!(started.cues, vec![Cue::RoundStart]);

        let snapshots = run_ticks(&mut engine, 300);
        assert_eq!(snapshots.len(), 300);

        let warnings: Vec<_> = snapshots
            .iter()
            .filter(|s| s.ten_second_warning_due)
            .collect();
        assert_eq!(warnings.len(), 5);
        assert!(warnings.iter().all(|s| s.seconds_remaining == 10));

        let round_starts = snapshots.iter().filter(|s| s.round_start_due).count();
        let round_ends = snapshots.iter().filter(|s| s.round_end_due).count();
        assert_eq!(round_starts, 2);
        assert_eq!(round_ends, 5);

        let last = snapshots.last().unwrap();
        assert_eq!(last.state, TimerState::Finished);
        assert_eq!(last.current_round, 3);
        assert!(engine.tick().is_none());
    }

    #[test]
    fn test_rest_phase_is_reported() {
        let config = TimerConfig::default()
            .with_work_seconds(60)
            .with_rest_seconds(30)
            .with_round_count(2);
        let mut engine = TimerEngine::new(config);
        for _ in 0..4 {
            engine.short_press();
        }

        let snapshot = run_ticks(&mut engine, 60).pop().unwrap();
        assert_eq!(snapshot.phase, Phase::Rest);
        assert_eq!(snapshot.phase_total_seconds, 30);
        assert_eq!(snapshot.current_round, 1);
    }

    #[test]
    fn test_zero_rest_goes_straight_to_next_round() {
        let config = TimerConfig::default()
            .with_work_seconds(60)
            .with_rest_seconds(0)
            .with_round_count(2);
        let mut engine = TimerEngine::new(config);
        for _ in 0..4 {
            engine.short_press();
        }

        let snapshots = run_ticks(&mut engine, 61);
        let rest = &snapshots[59];
        assert_eq!(rest.phase, Phase::Rest);
        assert_eq!(rest.seconds_remaining, 0);

        let next = &snapshots[60];
        assert_eq!(next.phase, Phase::Work);
        assert_eq!(next.current_round, 2);
        assert!(next.round_start_due);
    }

    #[test]
    fn test_drilling_switches_forever() {
        let config = TimerConfig::default().with_work_seconds(30);
        let mut engine = TimerEngine::new(config).with_mode(Mode::Drilling);
        engine.short_press();
        engine.short_press();

        let snapshots = run_ticks(&mut engine, 3000);
        assert!(snapshots.iter().all(|s| s.state == TimerState::Running));
        assert_eq!(snapshots.iter().filter(|s| s.switch_due).count(), 100);
    }

    #[test]
    fn test_competition_adjusted_mid_match() {
        let config = TimerConfig::default().with_comp_time_index(1);
        let mut engine = TimerEngine::new(config).with_mode(Mode::Competition);
        engine.short_press();
        let started = engine.short_press().unwrap();
        assert_eq!(started.seconds_remaining, 360);

        run_ticks(&mut engine, 100);
        let adjusted = engine.rotate(-2).unwrap();
        assert_eq!(adjusted.seconds_remaining, 200);

        let last = run_ticks(&mut engine, 200).pop().unwrap();
        assert_eq!(last.state, TimerState::Finished);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;
    use bjj_timer::input::InputEvent;

    /// Small deterministic generator so the walk is reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next_u64(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            self.0 >> 33
        }
    }

    #[test]
    fn test_random_walk_keeps_invariants() {
        let mut rng = Lcg(7);
        let mut engine = TimerEngine::default();

        for _ in 0..20_000 {
            let published = match rng.next_u64() % 10 {
                0 => engine.handle(InputEvent::Rotate(1)),
                1 => engine.handle(InputEvent::Rotate(-1)),
                2 => engine.handle(InputEvent::Rotate(5)),
                3 => engine.handle(InputEvent::ShortPress),
                4 => engine.handle(InputEvent::LongPress),
                _ => engine.tick(),
            };

            let snapshot = engine.snapshot();
            assert!(snapshot.seconds_remaining <= 3600);
            assert!(snapshot.cues.is_empty());

            let config = engine.config();
            assert!((30..=3600).contains(&config.work_seconds));
            assert!(config.rest_seconds <= 600);
            assert!((1..=20).contains(&config.round_count));
            assert!(config.comp_time_index <= 3);

            if snapshot.mode == Mode::Sparring && snapshot.state.has_session() {
                assert!(snapshot.current_round >= 1);
                assert!(snapshot.current_round <= snapshot.total_rounds);
            }

            if let Some(published) = published {
                let mut deduped = published.cues.clone();
                deduped.dedup();
                assert_eq!(deduped.len(), published.cues.len());
            }
        }
    }

    #[test]
    fn test_ticks_outside_running_publish_nothing() {
        let mut engine = TimerEngine::default();
        assert!(engine.tick().is_none());

        engine.short_press();
        assert!(engine.tick().is_none());

        engine.short_press();
        engine.short_press();
        engine.short_press();
        engine.short_press();
        assert_eq!(engine.state(), TimerState::Paused);
        let before = engine.snapshot();
        assert!(engine.tick().is_none());
        assert_eq!(engine.snapshot(), before);
    }
}
