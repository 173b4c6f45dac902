//! Survey progression state machine
//!
//! Pure FSM for a single user's walk through the poll list. Side effects
//! (recording answers, dispatching polls) live in the controller.

mod events;
mod states;
mod transitions;

pub use events::SurveyEvent;
pub use states::{ResetOrigin, SurveyState};
pub use transitions::{StateMachine, StateTransition};
