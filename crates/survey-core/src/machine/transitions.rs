//! State transitions - FSM transition logic
//!
//! Implements the event-driven transition table of the survey walk.

use super::events::SurveyEvent;
use super::states::SurveyState;

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: SurveyState,
    /// The state after the transition.
    pub to: SurveyState,
    /// The event that triggered the transition.
    pub event: SurveyEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for one user's survey walk.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current_state: SurveyState,
}

impl StateMachine {
    /// Create a new state machine in `Idle` state.
    pub fn new() -> Self {
        Self {
            current_state: SurveyState::Idle,
        }
    }

    /// Create a state machine with a specific initial state.
    pub fn with_state(state: SurveyState) -> Self {
        Self {
            current_state: state,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &SurveyState {
        &self.current_state
    }

    /// Handle an event and transition to a new state.
    ///
    /// Events that are not applicable in the current state leave it
    /// unchanged (`changed == false`); the caller decides whether that
    /// means "silently drop" or "do not render".
    pub fn handle_event(&mut self, event: SurveyEvent) -> StateTransition {
        let old_state = self.current_state;
        let new_state = compute_next_state(&old_state, &event);
        let changed = old_state != new_state;

        self.current_state = new_state;

        StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed,
        }
    }
}

/// Compute the next state given current state and event.
fn compute_next_state(state: &SurveyState, event: &SurveyEvent) -> SurveyState {
    use SurveyEvent::*;
    use SurveyState::*;

    match (state, event) {
        // ========== Starting and restarting ==========
        // Restart is allowed from every state, including mid-run and
        // while a reset confirmation is pending.
        (_, RunStarted { run, total }) => InProgress {
            position: 0,
            total: *total,
            run: *run,
        },

        // ========== Walking the poll list ==========
        (
            InProgress {
                position,
                total,
                run,
            },
            PollAnswered,
        ) => {
            if position + 1 >= *total {
                Finished { run: *run }
            } else {
                InProgress {
                    position: position + 1,
                    total: *total,
                    run: *run,
                }
            }
        }

        // ========== Reset confirmation sub-flow ==========
        (Finished { run }, ResetRequested { origin }) => AwaitingReset {
            origin: *origin,
            run: *run,
        },
        (AwaitingReset { .. }, ResetConfirmed) => Idle,
        (AwaitingReset { run, .. }, ResetDeclined) => Finished { run: *run },

        // ========== Default: no transition ==========
        _ => *state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::ResetOrigin;

    #[test]
    fn run_starts_at_position_zero() {
        let mut machine = StateMachine::new();
        let transition = machine.handle_event(SurveyEvent::RunStarted { run: 1, total: 2 });
        assert!(transition.changed);
        assert_eq!(
            machine.state(),
            &SurveyState::InProgress {
                position: 0,
                total: 2,
                run: 1
            }
        );
    }

    #[test]
    fn answers_advance_until_finished() {
        let mut machine = StateMachine::new();
        machine.handle_event(SurveyEvent::RunStarted { run: 1, total: 2 });

        let mid = machine.handle_event(SurveyEvent::PollAnswered);
        assert_eq!(
            mid.to,
            SurveyState::InProgress {
                position: 1,
                total: 2,
                run: 1
            }
        );

        let done = machine.handle_event(SurveyEvent::PollAnswered);
        assert_eq!(done.to, SurveyState::Finished { run: 1 });
    }

    #[test]
    fn answer_in_idle_or_finished_changes_nothing() {
        let mut machine = StateMachine::new();
        let transition = machine.handle_event(SurveyEvent::PollAnswered);
        assert!(!transition.changed);
        assert_eq!(machine.state(), &SurveyState::Idle);

        let mut machine = StateMachine::with_state(SurveyState::Finished { run: 3 });
        let transition = machine.handle_event(SurveyEvent::PollAnswered);
        assert!(!transition.changed);
    }

    #[test]
    fn restart_is_allowed_mid_run_and_bumps_the_run() {
        let mut machine = StateMachine::new();
        machine.handle_event(SurveyEvent::RunStarted { run: 1, total: 3 });
        machine.handle_event(SurveyEvent::PollAnswered);

        let transition = machine.handle_event(SurveyEvent::RunStarted { run: 2, total: 3 });
        assert!(transition.changed);
        assert_eq!(
            machine.state(),
            &SurveyState::InProgress {
                position: 0,
                total: 3,
                run: 2
            }
        );
    }

    #[test]
    fn reset_is_only_reachable_from_finished() {
        let mut machine = StateMachine::new();
        machine.handle_event(SurveyEvent::RunStarted { run: 1, total: 1 });

        let refused = machine.handle_event(SurveyEvent::ResetRequested {
            origin: ResetOrigin::Completion,
        });
        assert!(!refused.changed);

        machine.handle_event(SurveyEvent::PollAnswered);
        let accepted = machine.handle_event(SurveyEvent::ResetRequested {
            origin: ResetOrigin::Completion,
        });
        assert!(accepted.changed);
        assert_eq!(
            machine.state(),
            &SurveyState::AwaitingReset {
                origin: ResetOrigin::Completion,
                run: 1
            }
        );
    }

    #[test]
    fn declined_reset_returns_to_finished_with_same_run() {
        let mut machine = StateMachine::with_state(SurveyState::AwaitingReset {
            origin: ResetOrigin::Statistics,
            run: 5,
        });
        let transition = machine.handle_event(SurveyEvent::ResetDeclined);
        assert_eq!(transition.to, SurveyState::Finished { run: 5 });
    }

    #[test]
    fn confirmed_reset_returns_to_idle() {
        let mut machine = StateMachine::with_state(SurveyState::AwaitingReset {
            origin: ResetOrigin::Completion,
            run: 2,
        });
        let transition = machine.handle_event(SurveyEvent::ResetConfirmed);
        assert_eq!(transition.to, SurveyState::Idle);
    }

    #[test]
    fn restart_escapes_a_pending_reset_confirmation() {
        let mut machine = StateMachine::with_state(SurveyState::AwaitingReset {
            origin: ResetOrigin::Completion,
            run: 2,
        });
        let transition = machine.handle_event(SurveyEvent::RunStarted { run: 3, total: 2 });
        assert!(transition.changed);
        assert_eq!(machine.state().position(), Some(0));
        assert_eq!(machine.state().run(), Some(3));
    }
}
