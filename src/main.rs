//! BJJ Gym Timer CLI - an interval timer for the mat
//!
//! Three training modes share one knob-and-button control scheme:
//! - Sparring: rounds of work and rest
//! - Drilling: a repeating partner-switch interval
//! - Competition: a single match clock

use std::future::pending;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info, warn};

use bjj_timer::cli::{Cli, Commands, Display, OutputFormat, Presenter, RunArgs};
use bjj_timer::engine::{ControlLoop, LoopConfig, TimerEngine};
use bjj_timer::input::keyboard::{spawn_stdin_reader, ReaderExit};
use bjj_timer::input::InputLatch;
use bjj_timer::sound::{create_buzzer, BuzzerWorker};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with the screen or JSON output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => run_timer(args).await,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => run_timer(RunArgs::default()).await,
    }
}

/// Runs the timer in this terminal until quit.
async fn run_timer(args: RunArgs) -> Result<()> {
    let config = args.to_config().context("invalid timer configuration")?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Screen
    };
    debug!(?config, ?format, "starting timer");

    let worker = if args.no_sound {
        info!("sound disabled");
        None
    } else {
        let volume = args.volume;
        let worker = BuzzerWorker::spawn(move || create_buzzer(volume))
            .context("failed to start the buzzer")?;
        Some(worker)
    };

    let mut presenter = Presenter::new(io::stdout(), format);
    if let Some(worker) = &worker {
        presenter = presenter.with_cues(worker.sender());
    }

    let mut engine = TimerEngine::new(config).with_mode(args.mode.into());
    engine.set_observer(presenter);

    let latch = InputLatch::new();
    let reader = spawn_stdin_reader(latch.clone()).context("failed to read the keyboard")?;

    if format == OutputFormat::Screen {
        Display::show_startup();
        Display::hide_cursor();
    }

    let loop_config = LoopConfig::default().with_poll_interval(Duration::from_millis(args.poll_ms));
    let mut control = ControlLoop::new(engine, latch, loop_config);
    control.refresh();

    let shutdown = async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("failed to listen for Ctrl+C: {}", e);
                    pending::<()>().await;
                }
            }
            exit = reader => {
                if !matches!(exit, Ok(ReaderExit::Quit)) {
                    debug!("keyboard closed, waiting for Ctrl+C");
                    pending::<()>().await;
                }
            }
        }
    };
    control.run(shutdown).await;

    // Drop the presenter's sender before stopping the worker
    drop(control);
    if let Some(worker) = worker {
        worker.shutdown().context("failed to stop the buzzer")?;
    }

    if format == OutputFormat::Screen {
        Display::show_shutdown();
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bjj_timer::cli::ModeArg;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["bjj-timer"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run_with_options() {
        let cli = Cli::parse_from(["bjj-timer", "run", "--mode", "drilling", "--work", "90"]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.mode, ModeArg::Drilling);
                assert_eq!(args.work, 90);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["bjj-timer", "--verbose", "run"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_completions() {
        let cli = Cli::parse_from(["bjj-timer", "completions", "zsh"]);
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }
}
