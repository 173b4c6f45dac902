//! Survey states - the per-user lifecycle of one survey walk

use serde::{Deserialize, Serialize};

/// The screen a declined reset confirmation returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetOrigin {
    /// The completion screen shown when the last poll was answered.
    Completion,
    /// The statistics screen reached from the completion menu.
    Statistics,
}

/// Per-user state of the survey progression.
///
/// `Finished` is not terminal: the completion menu keeps accepting
/// restart, statistics, and reset actions indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyState {
    /// Nothing started yet (or everything was reset).
    Idle,

    /// Walking the poll list: the poll at `position` is awaiting an answer.
    InProgress {
        /// 0-based index of the poll currently awaiting an answer.
        position: usize,
        /// Length of the poll-list snapshot for this run.
        total: usize,
        /// Run number the recorded answers are tagged with.
        run: u32,
    },

    /// Every poll of the run was answered; the completion menu is live.
    Finished { run: u32 },

    /// A global reset was requested and is awaiting yes/no confirmation.
    AwaitingReset { origin: ResetOrigin, run: u32 },
}

impl Default for SurveyState {
    fn default() -> Self {
        SurveyState::Idle
    }
}

impl SurveyState {
    /// The poll position currently awaiting an answer, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InProgress { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// The run number of the active or completed walk, if any.
    pub fn run(&self) -> Option<u32> {
        match self {
            Self::InProgress { run, .. }
            | Self::Finished { run }
            | Self::AwaitingReset { run, .. } => Some(*run),
            Self::Idle => None,
        }
    }

    /// Check whether an inbound poll answer can be applied in this state.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::InProgress { .. })
    }
}
