//! Playback state machine: dataset, run and cursor.
//!
//! ```text
//! Empty ──load_dataset──▶ DatasetLoaded ──load_run──▶ RunLoaded ⟲ advance
//!   ▲                          ▲  │                      │
//!   └──────────────────────────┴──┴──── load_dataset ────┘
//! ```
//!
//! The state machine is the single owner of the dataset, the current run and
//! the cursor. Everything else reads through it.

use std::fmt;

use crate::model::{Dataset, Run, Snapshot};

/// Coarse state, for affordance decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No dataset.
    Empty,
    /// Dataset present, no run.
    DatasetLoaded,
    /// Run present, cursor valid.
    RunLoaded,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Empty,
    DatasetLoaded {
        dataset: Dataset,
    },
    RunLoaded {
        dataset: Dataset,
        run: Run,
        cursor: usize,
    },
}

/// Owns the dataset, the current run and the cursor into it.
#[derive(Debug, Default)]
pub struct Playback {
    state: State,
}

impl Playback {
    /// Empty state machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current coarse state.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Empty => Phase::Empty,
            State::DatasetLoaded { .. } => Phase::DatasetLoaded,
            State::RunLoaded { .. } => Phase::RunLoaded,
        }
    }

    /// The loaded dataset, if any.
    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        match &self.state {
            State::Empty => None,
            State::DatasetLoaded { dataset }
            | State::RunLoaded { dataset, .. } => Some(dataset),
        }
    }

    /// The loaded run, if any.
    #[must_use]
    pub fn run(&self) -> Option<&Run> {
        match &self.state {
            State::RunLoaded { run, .. } => Some(run),
            _ => None,
        }
    }

    /// Cursor into the run; `None` when no run is loaded.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            State::RunLoaded { cursor, .. } => Some(cursor),
            _ => None,
        }
    }

    /// Snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        match &self.state {
            State::RunLoaded { run, cursor, .. } => run.get(*cursor),
            _ => None,
        }
    }

    /// Whether [`advance`](Self::advance) would succeed.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        match &self.state {
            State::RunLoaded { run, cursor, .. } => cursor + 1 < run.len(),
            _ => false,
        }
    }

    /// Whether the cursor sits on the run's final snapshot.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        match &self.state {
            State::RunLoaded { run, cursor, .. } => cursor + 1 == run.len(),
            _ => false,
        }
    }

    /// Replace the dataset. Discards any run; valid from every state.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        self.state = State::DatasetLoaded { dataset };
    }

    /// Load a run for the current dataset and put the cursor on its first
    /// snapshot.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidTransition`] when no dataset is loaded or the
    /// run is empty. The state is left untouched.
    pub fn load_run(&mut self, run: Run) -> Result<&Snapshot, PlaybackError> {
        if run.is_empty() {
            return Err(PlaybackError::InvalidTransition {
                operation: "load_run",
                reason: "run has no snapshots",
            });
        }
        let dataset = match std::mem::take(&mut self.state) {
            State::Empty => {
                return Err(PlaybackError::InvalidTransition {
                    operation: "load_run",
                    reason: "no dataset loaded",
                });
            }
            State::DatasetLoaded { dataset }
            | State::RunLoaded { dataset, .. } => dataset,
        };
        self.state = State::RunLoaded {
            dataset,
            run,
            cursor: 0,
        };
        self.current().ok_or(PlaybackError::InvalidTransition {
            operation: "load_run",
            reason: "cursor outside run",
        })
    }

    /// Move the cursor forward by exactly one snapshot.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoMoreSteps`] when no run is loaded or the cursor is
    /// already on the final snapshot. The cursor is unchanged.
    pub fn advance(&mut self) -> Result<&Snapshot, PlaybackError> {
        let State::RunLoaded { run, cursor, .. } = &mut self.state else {
            return Err(PlaybackError::NoMoreSteps);
        };
        if *cursor + 1 >= run.len() {
            return Err(PlaybackError::NoMoreSteps);
        }
        *cursor += 1;
        run.get(*cursor).ok_or(PlaybackError::NoMoreSteps)
    }
}

/// State machine misuse, or the benign end-of-run signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The operation is not valid in the current state.
    InvalidTransition {
        /// Operation that was attempted.
        operation: &'static str,
        /// Why it was refused.
        reason: &'static str,
    },
    /// The cursor is already on the final snapshot.
    NoMoreSteps,
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition { operation, reason } => {
                write!(f, "invalid transition: {operation}: {reason}")
            }
            Self::NoMoreSteps => write!(f, "already at the final step"),
        }
    }
}

impl std::error::Error for PlaybackError {}
