//! Display utilities for the gym timer CLI.
//!
//! This module provides formatted output for:
//! - The full-screen timer view built from a snapshot
//! - Large block-digit clock rendering
//! - Startup, shutdown and error messages

use std::fmt::Write as _;

use crate::types::{Mode, Phase, Snapshot, TimerState, TEN_SECOND_MARK};

// ============================================================================
// ANSI
// ============================================================================

pub(crate) mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const FG_BLACK: &str = "\x1b[30m";
    pub const FG_RED: &str = "\x1b[31m";
    pub const FG_GREEN: &str = "\x1b[32m";
    pub const FG_MAGENTA: &str = "\x1b[35m";
    pub const FG_CYAN: &str = "\x1b[36m";
    pub const FG_WHITE: &str = "\x1b[37m";

    pub const BG_GREEN: &str = "\x1b[42m";
    pub const BG_YELLOW: &str = "\x1b[43m";
    pub const BG_BLUE: &str = "\x1b[44m";

    pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
    pub const HIDE_CURSOR: &str = "\x1b[?25l";
    pub const SHOW_CURSOR: &str = "\x1b[?25h";
}

// ============================================================================
// Block digits
// ============================================================================

/// Five rows, five columns per digit.
const DIGITS: [[&str; 5]; 10] = [
    [" ### ", "#   #", "#   #", "#   #", " ### "],
    ["    #", "    #", "    #", "    #", "    #"],
    [" ####", "    #", " ####", "#    ", " ####"],
    [" ####", "    #", " ####", "    #", " ####"],
    ["#   #", "#   #", " ####", "    #", "    #"],
    [" ####", "#    ", " ####", "    #", " ####"],
    [" ####", "#    ", " ####", "#   #", " ####"],
    [" ####", "    #", "    #", "    #", "    #"],
    [" ### ", "#   #", " ### ", "#   #", " ### "],
    [" ####", "#   #", " ####", "    #", " ####"],
];

const COLON: [&str; 5] = ["   ", " # ", "   ", " # ", "   "];

const PAUSED_BANNER: [&str; 5] = [
    "██████   █████  ██    ██ ███████ ███████ ██████ ",
    "██   ██ ██   ██ ██    ██ ██      ██      ██   ██",
    "██████  ███████ ██    ██ ███████ █████   ██   ██",
    "██      ██   ██ ██    ██      ██ ██      ██   ██",
    "██      ██   ██  ██████  ███████ ███████ ██████ ",
];

const PROGRESS_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Builds the full screen for a snapshot, starting with a clear-screen
    /// sequence.
    pub fn render(snapshot: &Snapshot) -> String {
        let mut out = String::from(ansi::CLEAR_SCREEN);
        Self::push_header(&mut out);

        match snapshot.state {
            TimerState::Menu => Self::push_menu(&mut out, snapshot),
            TimerState::SetupWork | TimerState::SetupRest | TimerState::SetupRounds => {
                Self::push_setup(&mut out, snapshot)
            }
            TimerState::Paused => Self::push_paused(&mut out, snapshot),
            TimerState::Running | TimerState::Finished => Self::push_running(&mut out, snapshot),
        }
        out
    }

    /// Renders `m:ss` in large block digits, one line per row.
    pub fn render_clock(seconds: u32) -> String {
        let minutes = (seconds / 60).min(99) as usize;
        let secs = (seconds % 60) as usize;
        let digits = [minutes / 10, minutes % 10, secs / 10, secs % 10];

        let mut out = String::new();
        for row in 0..5 {
            let _ = writeln!(
                out,
                "    {} {} {} {} {}",
                DIGITS[digits[0]][row],
                DIGITS[digits[1]][row],
                COLON[row],
                DIGITS[digits[2]][row],
                DIGITS[digits[3]][row],
            );
        }
        out
    }

    /// Renders a progress bar for the elapsed share of the phase.
    pub fn render_progress(progress: f32) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f32).round()) as usize;
        format!(
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(PROGRESS_WIDTH - filled)
        )
    }

    /// Shows the startup line.
    pub fn show_startup() {
        println!("BJJ Gym Timer - Initializing...");
    }

    /// Hides the terminal cursor while the screen is being redrawn.
    pub fn hide_cursor() {
        print!("{}", ansi::HIDE_CURSOR);
    }

    /// Shows the shutdown line and restores the cursor.
    pub fn show_shutdown() {
        println!("{}\nBJJ Gym Timer - Shutdown complete. OSS!", ansi::SHOW_CURSOR);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    fn push_header(out: &mut String) {
        let _ = write!(
            out,
            "{}{}  ╔══════════════════════════════════════╗\n  \
             ║       BJJ GYM TIMER - OSS!           ║\n  \
             ╚══════════════════════════════════════╝\n{}",
            ansi::BOLD,
            ansi::FG_CYAN,
            ansi::RESET
        );
    }

    fn push_menu(out: &mut String, snapshot: &Snapshot) {
        let _ = write!(
            out,
            "\n  {}Rotate: Select Mode   Press: Confirm{}\n\n        {}{}{}  {}  {}\n\n",
            ansi::DIM,
            ansi::RESET,
            ansi::BG_BLUE,
            ansi::FG_WHITE,
            ansi::BOLD,
            snapshot.menu_label,
            ansi::RESET
        );
    }

    fn push_setup(out: &mut String, snapshot: &Snapshot) {
        let _ = write!(
            out,
            "\n  {}{}{}\n  Rotate: Change   Press: Next   Long: Menu\n\n        {}{}{}{}\n\n",
            ansi::DIM,
            Self::setup_title(snapshot),
            ansi::RESET,
            ansi::FG_GREEN,
            ansi::BOLD,
            snapshot.value_label,
            ansi::RESET
        );
    }

    fn push_paused(out: &mut String, snapshot: &Snapshot) {
        out.push_str("\n\n");
        out.push_str(ansi::FG_RED);
        out.push_str(ansi::BOLD);
        for row in PAUSED_BANNER {
            let _ = writeln!(out, "        {}", row);
        }
        out.push_str(ansi::RESET);
        out.push('\n');
        out.push_str(&Self::render_clock(snapshot.seconds_remaining));
        let _ = write!(
            out,
            "\n  {}Rotate: +/-30s   Press: Resume   Long: Back to Menu{}\n",
            ansi::DIM,
            ansi::RESET
        );
    }

    fn push_running(out: &mut String, snapshot: &Snapshot) {
        let _ = write!(
            out,
            "\n  {}    {}\n\n",
            Self::round_line(snapshot),
            Self::phase_badge(snapshot.display_phase())
        );

        if Self::is_urgent(snapshot) {
            out.push_str(ansi::FG_RED);
            out.push_str(ansi::BOLD);
        } else {
            out.push_str(ansi::FG_GREEN);
        }
        out.push_str(&Self::render_clock(snapshot.seconds_remaining));
        out.push_str(ansi::RESET);

        let _ = writeln!(out, "\n  {}", Self::render_progress(snapshot.progress()));

        if snapshot.state == TimerState::Finished {
            let _ = writeln!(
                out,
                "\n  {}{}MATCH COMPLETE! OSS!{}",
                ansi::FG_GREEN,
                ansi::BOLD,
                ansi::RESET
            );
        } else {
            let _ = writeln!(
                out,
                "\n  {}Rotate: +/-30s   Press: Pause   Long: Reset{}",
                ansi::DIM,
                ansi::RESET
            );
        }
    }

    fn setup_title(snapshot: &Snapshot) -> &'static str {
        match (snapshot.state, snapshot.mode) {
            (TimerState::SetupWork, Mode::Competition) => "Match Length",
            (TimerState::SetupWork, Mode::Drilling) => "Interval (each)",
            (TimerState::SetupWork, _) => "Round Time",
            (TimerState::SetupRest, _) => "Rest Time",
            (_, Mode::Drilling) => "Interval (each)",
            _ => "Rounds",
        }
    }

    fn round_line(snapshot: &Snapshot) -> String {
        match snapshot.mode {
            Mode::Sparring => format!(
                "Round {}/{}",
                snapshot.current_round, snapshot.total_rounds
            ),
            Mode::Competition => format!("{}COMPETITION{}", ansi::FG_MAGENTA, ansi::RESET),
            Mode::Drilling => format!("{}DRILLING{}", ansi::FG_CYAN, ansi::RESET),
        }
    }

    fn phase_badge(phase: Phase) -> String {
        let (background, foreground) = match phase {
            Phase::Work => (ansi::BG_GREEN, ansi::FG_WHITE),
            Phase::Rest => (ansi::BG_YELLOW, ansi::FG_BLACK),
            Phase::Switch => (ansi::BG_BLUE, ansi::FG_WHITE),
        };
        format!("{}{} {} {}", background, foreground, phase.label(), ansi::RESET)
    }

    fn is_urgent(snapshot: &Snapshot) -> bool {
        snapshot.seconds_remaining <= TEN_SECOND_MARK && snapshot.phase != Phase::Rest
    }
}

// ============================================================================
// Tests
// ============================================================================
