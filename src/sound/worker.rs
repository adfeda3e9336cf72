//! Buzzer worker thread.
//!
//! The buzzer is created and driven on its own thread: audio streams are
//! not `Send`, and a two-second end tone must not delay the next tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use super::error::SoundError;
use super::Buzzer;
use crate::types::Cue;

/// Cues that may wait while an earlier pattern plays.
pub const QUEUE_CAPACITY: usize = 8;

#[derive(Debug)]
enum WorkerMessage {
    Play(Cue),
    Stop,
}

// ============================================================================
// CueSender
// ============================================================================

/// Cloneable handle for queueing cues on a [`BuzzerWorker`].
#[derive(Debug, Clone)]
pub struct CueSender {
    tx: Sender<WorkerMessage>,
}

impl CueSender {
    /// Queues a cue without blocking.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::QueueFull` when the worker is backed up and
    /// `SoundError::QueueClosed` when it has stopped.
    pub fn send(&self, cue: Cue) -> Result<(), SoundError> {
        self.tx
            .try_send(WorkerMessage::Play(cue))
            .map_err(|e| match e {
                TrySendError::Full(_) => SoundError::QueueFull(cue.to_string()),
                TrySendError::Disconnected(_) => SoundError::QueueClosed,
            })
    }
}

// ============================================================================
// BuzzerWorker
// ============================================================================

/// Owns the buzzer thread. Dropping the worker stops the thread after the
/// pattern in progress.
#[derive(Debug)]
pub struct BuzzerWorker {
    tx: Sender<WorkerMessage>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl BuzzerWorker {
    /// Starts the worker, building the buzzer on the worker thread.
    ///
    /// Returns once the factory has run.
    ///
    /// # Errors
    ///
    /// Returns the factory's error, or `SoundError::WorkerError` if the
    /// thread could not be started.
    pub fn spawn<F, B>(factory: F) -> Result<Self, SoundError>
    where
        F: FnOnce() -> Result<B, SoundError> + Send + 'static,
        B: Buzzer,
    {
        let (tx, rx) = bounded(QUEUE_CAPACITY);
        let (ready_tx, ready_rx) = bounded::<Result<(), SoundError>>(1);
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("buzzer".to_string())
            .spawn(move || {
                let buzzer = match factory() {
                    Ok(buzzer) => {
                        let _ = ready_tx.send(Ok(()));
                        buzzer
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                run_worker(&buzzer, &rx, &worker_stop);
            })
            .map_err(|e| SoundError::WorkerError(e.to_string()))?;

        let ready = ready_rx
            .recv()
            .map_err(|_| SoundError::WorkerError("worker exited during startup".to_string()));

        match ready {
            Ok(Ok(())) => {
                debug!("buzzer worker started");
                Ok(Self {
                    tx,
                    stop,
                    handle: Some(handle),
                })
            }
            Ok(Err(e)) | Err(e) => {
                let _ = handle.join();
                Err(e)
            }
        }
    }

    /// Returns a handle for queueing cues.
    pub fn sender(&self) -> CueSender {
        CueSender {
            tx: self.tx.clone(),
        }
    }

    /// Stops the worker and waits for the thread to exit.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::WorkerError` if the thread panicked.
    pub fn shutdown(mut self) -> Result<(), SoundError> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> Result<(), SoundError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.tx.try_send(WorkerMessage::Stop);

        handle
            .join()
            .map_err(|_| SoundError::WorkerError("buzzer thread panicked".to_string()))?;
        debug!("buzzer worker stopped");
        Ok(())
    }
}

impl Drop for BuzzerWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop_and_join() {
            warn!("{}", e);
        }
    }
}

fn run_worker<B: Buzzer>(buzzer: &B, rx: &Receiver<WorkerMessage>, stop: &AtomicBool) {
    for message in rx.iter() {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        match message {
            WorkerMessage::Play(cue) => {
                if let Err(e) = buzzer.play(cue) {
                    warn!(%cue, "failed to play cue: {}", e);
                }
            }
            WorkerMessage::Stop => break,
        }
    }
}
