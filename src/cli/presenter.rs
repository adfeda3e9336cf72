//! Snapshot observer that draws the screen and queues buzzer cues.

use std::io::Write;

use tracing::warn;

use super::display::Display;
use crate::engine::SnapshotObserver;
use crate::sound::CueSender;
use crate::types::Snapshot;

/// How snapshots are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Full-screen ANSI view
    #[default]
    Screen,
    /// One JSON object per line
    Json,
}

/// Renders every published snapshot and forwards its cues to the buzzer.
#[derive(Debug)]
pub struct Presenter<W> {
    out: W,
    format: OutputFormat,
    cues: Option<CueSender>,
}

impl<W: Write> Presenter<W> {
    /// Creates a presenter without sound.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            cues: None,
        }
    }

    /// Forwards cues to the given buzzer worker.
    pub fn with_cues(mut self, cues: CueSender) -> Self {
        self.cues = Some(cues);
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Screen => self.out.write_all(Display::render(snapshot).as_bytes())?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, snapshot)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> SnapshotObserver for Presenter<W> {
    fn observe(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.write_snapshot(snapshot) {
            warn!("failed to draw snapshot: {}", e);
        }

        let Some(sender) = &self.cues else {
            return;
        };
        for cue in &snapshot.cues {
            if let Err(e) = sender.send(*cue) {
                warn!(%cue, "{} ({})", e, e.suggestion());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{BuzzerWorker, MockBuzzer};
    use crate::types::{Cue, TimerState};
    use std::time::Duration;

    fn cue_snapshot(cues: Vec<Cue>) -> Snapshot {
        Snapshot {
            state: TimerState::Running,
            round_start_due: cues.contains(&Cue::RoundStart),
            round_end_due: cues.contains(&Cue::RoundEnd),
            cues,
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_screen_output() {
        let mut presenter = Presenter::new(Vec::new(), OutputFormat::Screen);
        presenter.observe(&Snapshot::default());

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.contains("BJJ GYM TIMER"));
    }

    #[test]
    fn test_json_lines() {
        let mut presenter = Presenter::new(Vec::new(), OutputFormat::Json);
        presenter.observe(&Snapshot::default());
        presenter.observe(&cue_snapshot(vec![Cue::RoundStart]));

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: Snapshot = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.state, TimerState::Running);
        assert_eq!(parsed.cues, vec![Cue::RoundStart]);
    }

    #[test]
    fn test_cues_forwarded_to_worker() {
        let mock = MockBuzzer::new();
        let buzzer = mock.clone();
        let worker = BuzzerWorker::spawn(move || Ok(buzzer)).unwrap();

        let mut presenter =
            Presenter::new(std::io::sink(), OutputFormat::Json).with_cues(worker.sender());
        presenter.observe(&cue_snapshot(vec![Cue::RoundEnd, Cue::RoundStart]));
        presenter.observe(&Snapshot::default());

        assert!(mock.wait_for_calls(2, Duration::from_secs(2)));
        worker.shutdown().unwrap();
        assert_eq!(mock.get_play_calls(), vec![Cue::RoundEnd, Cue::RoundStart]);
    }

    #[test]
    fn test_closed_worker_does_not_panic() {
        let worker = BuzzerWorker::spawn(|| Ok(MockBuzzer::new())).unwrap();
        let sender = worker.sender();
        worker.shutdown().unwrap();

        let mut presenter = Presenter::new(std::io::sink(), OutputFormat::Screen).with_cues(sender);
        presenter.observe(&cue_snapshot(vec![Cue::Switch]));
    }
}
