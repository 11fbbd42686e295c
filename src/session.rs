//! Session history: the ordered log of runs plus the current input buffer.
//!
//! One [`Session`] exists per user session and is passed by `&mut` into every
//! action. The history is append-only except for [`Session::undo`], which pops
//! the latest run but never the last remaining one: once a run has been
//! recorded the history length never drops below 1.
//!
//! ```text
//!            record_run                 record_run / undo (len > 1)
//!   Empty ──────────────▶ HasHistory ◀──────────────────────────┐
//!                             └─────────────────────────────────┘
//! ```

use crate::output::{Output, TransformationRun};
use serde::Serialize;
use tracing::debug;

/// Coarse state of a session's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No run has been recorded yet.
    Empty,
    /// At least one run exists.
    HasHistory,
}

/// Per-session store of transformation runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    runs: Vec<TransformationRun>,
    input: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run and make its input the current buffer.
    pub fn record_run(&mut self, input: impl Into<String>, outputs: Vec<Output>) -> &TransformationRun {
        let input = input.into();
        self.input.clone_from(&input);
        self.runs.push(TransformationRun { input, outputs });
        debug!("Recorded run #{}", self.runs.len());
        &self.runs[self.runs.len() - 1]
    }

    /// Drop the most recent run and restore the input of the one before it.
    ///
    /// Does nothing when fewer than two runs exist. Returns whether a run was
    /// removed.
    pub fn undo(&mut self) -> bool {
        if self.runs.len() <= 1 {
            return false;
        }
        self.runs.pop();
        if let Some(last) = self.runs.last() {
            self.input.clone_from(&last.input);
        }
        debug!("Undo: {} run(s) remain", self.runs.len());
        true
    }

    /// Empty the input buffer. History is untouched.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Replace the input buffer (user typing, document upload).
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The most recent run, or `None` when nothing has been recorded.
    pub fn latest(&self) -> Option<&TransformationRun> {
        self.runs.last()
    }

    /// Outputs of the most recent run, for rendering.
    pub fn latest_outputs(&self) -> Option<&[Output]> {
        self.latest().map(|r| r.outputs.as_slice())
    }

    pub fn runs(&self) -> &[TransformationRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn state(&self) -> SessionState {
        if self.runs.is_empty() {
            SessionState::Empty
        } else {
            SessionState::HasHistory
        }
    }
}
