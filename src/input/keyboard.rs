//! Terminal keyboard controls.
//!
//! Keys are read a line at a time:
//! - `+` or `]`: rotate clockwise
//! - `-` or `[`: rotate counter-clockwise
//! - empty line, `p` or space: short press
//! - `l`: long press
//! - `q` alone on a line: quit
//!
//! Keys go through the [`InputLatch`], so rotations on a line add up while
//! repeated presses of one kind collapse into a single press until the
//! control loop drains the latch. `pp` is one short press.

use std::io::BufRead;
use std::thread;

use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use super::{InputEvent, InputLatch};

/// Why the key reader stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderExit {
    /// The operator asked to quit
    Quit,
    /// Input closed
    EndOfInput,
}

/// Translates one input line into events, in key order. Unknown keys are
/// skipped.
pub fn parse_key_line(line: &str) -> Vec<InputEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return vec![InputEvent::ShortPress];
    }

    line.chars()
        .filter_map(|key| match key.to_ascii_lowercase() {
            '+' | ']' => Some(InputEvent::Rotate(1)),
            '-' | '[' => Some(InputEvent::Rotate(-1)),
            'p' | ' ' => Some(InputEvent::ShortPress),
            'l' => Some(InputEvent::LongPress),
            _ => None,
        })
        .collect()
}

fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("q")
}

/// Reads key lines until quit or end of input, recording events in `latch`.
///
/// # Errors
///
/// Returns any I/O error from the reader.
pub fn read_keys<R: BufRead>(reader: R, latch: &InputLatch) -> std::io::Result<ReaderExit> {
    for line in reader.lines() {
        let line = line?;
        if is_quit(&line) {
            debug!("quit requested");
            return Ok(ReaderExit::Quit);
        }
        for event in parse_key_line(&line) {
            trace!(?event, "key");
            latch.record(event);
        }
    }
    Ok(ReaderExit::EndOfInput)
}

/// Reads stdin on a detached thread.
///
/// The receiver resolves when the reader stops. A blocked stdin read never
/// holds up process exit.
pub fn spawn_stdin_reader(latch: InputLatch) -> std::io::Result<oneshot::Receiver<ReaderExit>> {
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name("keyboard".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            let exit = match read_keys(stdin.lock(), &latch) {
                Ok(exit) => exit,
                Err(e) => {
                    warn!("keyboard input failed: {}", e);
                    ReaderExit::EndOfInput
                }
            };
            let _ = tx.send(exit);
        })?;
    Ok(rx)
}
