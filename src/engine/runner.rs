//! Control loop driving the timer engine.
//!
//! The loop owns the engine, drains the input latch on a short poll
//! period and ticks the engine once per second.

use std::future::Future;

use tokio::time::{interval, interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::timer::TimerEngine;
use crate::input::InputLatch;
use crate::types::{Snapshot, TimerState};

/// Default input poll period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Countdown resolution.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// LoopConfig
// ============================================================================

/// Timing of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub poll_interval: Duration,
    pub tick_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            tick_interval: TICK_INTERVAL,
        }
    }
}

impl LoopConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// ============================================================================
// ControlLoop
// ============================================================================

/// Single owner of the engine; everything else talks to it through the
/// input latch.
#[derive(Debug)]
pub struct ControlLoop {
    engine: TimerEngine,
    latch: InputLatch,
    config: LoopConfig,
}

impl ControlLoop {
    pub fn new(engine: TimerEngine, latch: InputLatch, config: LoopConfig) -> Self {
        Self {
            engine,
            latch,
            config,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn into_engine(self) -> TimerEngine {
        self.engine
    }

    /// Publishes the current state to the observer.
    pub fn refresh(&mut self) -> Snapshot {
        self.engine.refresh()
    }

    /// Feeds latched inputs to the engine: rotation, then short press, then
    /// long press. Returns the number of snapshots published.
    pub fn apply_pending(&mut self) -> usize {
        let pending = self.latch.drain();
        if pending.is_empty() {
            return 0;
        }
        debug!(?pending, "applying input");

        pending
            .events()
            .into_iter()
            .filter_map(|event| self.engine.handle(event))
            .count()
    }

    /// Runs until `shutdown` resolves.
    ///
    /// The one-second tick restarts whenever a session starts or resumes,
    /// so the first second of a countdown is never short.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = interval_at(
            Instant::now() + self.config.tick_interval,
            self.config.tick_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut poller = interval(self.config.poll_interval);
        poller.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(state = %self.engine.state(), "control loop started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.engine.tick();
                }
                _ = poller.tick() => {
                    let was_running = self.engine.state() == TimerState::Running;
                    self.apply_pending();
                    if !was_running && self.engine.state() == TimerState::Running {
                        ticker.reset();
                    }
                }
            }
        }
    }
}
