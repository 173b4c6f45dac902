//! Survey events - what can move a user's survey walk forward

use serde::{Deserialize, Serialize};

use super::states::ResetOrigin;

/// Events that drive state transitions for one user.
///
/// Events are emitted by the controller only after it has validated the
/// inbound update (registry lookup, position match), so the FSM never
/// sees transport-level noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyEvent {
    /// A run was started or restarted with a non-empty poll snapshot.
    /// Allowed from every state.
    RunStarted { run: u32, total: usize },

    /// The poll at the current position was answered and recorded.
    PollAnswered,

    /// A global reset was requested from the completion or statistics screen.
    ResetRequested { origin: ResetOrigin },

    /// The reset was confirmed and all stored answers were deleted.
    ResetConfirmed,

    /// The reset was declined; everything stays as it was.
    ResetDeclined,
}

impl SurveyEvent {
    /// Check if this event is part of the reset confirmation sub-flow.
    pub fn is_reset_event(&self) -> bool {
        matches!(
            self,
            Self::ResetRequested { .. } | Self::ResetConfirmed | Self::ResetDeclined
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_event_detection() {
        assert!(SurveyEvent::ResetConfirmed.is_reset_event());
        assert!(SurveyEvent::ResetRequested {
            origin: ResetOrigin::Completion
        }
        .is_reset_event());
        assert!(!SurveyEvent::PollAnswered.is_reset_event());
    }
}
