//! Tone patterns for each cue.

use std::time::Duration;

use crate::types::Cue;

/// Start horn pitch.
pub const START_HZ: u32 = 1200;
/// Ten-second warning pitch.
pub const WARNING_HZ: u32 = 400;
/// End buzzer pitch.
pub const END_HZ: u32 = 800;
/// Drilling switch chirp pitch.
pub const SWITCH_HZ: u32 = 1000;

/// One beep followed by silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStep {
    pub frequency_hz: u32,
    pub duration_ms: u64,
    pub gap_ms: u64,
}

impl ToneStep {
    const fn new(frequency_hz: u32, duration_ms: u64, gap_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            gap_ms,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn gap(&self) -> Duration {
        Duration::from_millis(self.gap_ms)
    }
}

const ROUND_START: [ToneStep; 2] = [
    ToneStep::new(START_HZ, 400, 150),
    ToneStep::new(START_HZ, 400, 0),
];

const TEN_SECOND_WARNING: [ToneStep; 3] = [
    ToneStep::new(WARNING_HZ, 120, 120),
    ToneStep::new(WARNING_HZ, 120, 120),
    ToneStep::new(WARNING_HZ, 120, 120),
];

const ROUND_END: [ToneStep; 1] = [ToneStep::new(END_HZ, 2000, 0)];

const SWITCH: [ToneStep; 2] = [
    ToneStep::new(SWITCH_HZ, 80, 60),
    ToneStep::new(SWITCH_HZ, 80, 0),
];

/// Returns the beeps played for `cue`.
pub fn pattern(cue: Cue) -> &'static [ToneStep] {
    match cue {
        Cue::RoundStart => &ROUND_START,
        Cue::TenSecondWarning => &TEN_SECOND_WARNING,
        Cue::RoundEnd => &ROUND_END,
        Cue::Switch => &SWITCH,
    }
}

/// Total time the buzzer is busy with `cue`, gaps included.
pub fn pattern_duration(cue: Cue) -> Duration {
    pattern(cue)
        .iter()
        .map(|step| step.duration() + step.gap())
        .sum()
}
