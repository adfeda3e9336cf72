//! Queue of one-shot cues waiting to be published.

use crate::types::Cue;

/// Cues armed by transitions since the last publication.
///
/// Each cue appears at most once; draining hands the cues to exactly one
/// snapshot and leaves the queue empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CueQueue {
    pending: Vec<Cue>,
}

impl CueQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a cue. Arming an already pending cue is a no-op.
    pub fn arm(&mut self, cue: Cue) {
        if !self.pending.contains(&cue) {
            self.pending.push(cue);
        }
    }

    /// Returns true if the cue is armed.
    pub fn is_armed(&self, cue: Cue) -> bool {
        self.pending.contains(&cue)
    }

    /// Returns the pending cues in arming order.
    pub fn pending(&self) -> &[Cue] {
        &self.pending
    }

    /// Returns true if nothing is armed.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes every pending cue, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.pending)
    }
}
