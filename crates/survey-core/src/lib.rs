//! survey-core - Domain model and progression logic for the survey bot
//!
//! This crate owns everything the chat transport does not: the poll and
//! answer model, the per-user survey progression state machine, the
//! pending-poll registry, answer bookkeeping, and report rendering. The
//! transport and the answer store are collaborators behind traits.

pub mod controller;
pub mod error;
pub mod machine;
pub mod poll;
pub mod recorder;
pub mod registry;
pub mod report;
pub mod session;
pub mod store;
pub mod transport;

// Re-export commonly used types
pub use controller::SurveyController;
pub use error::{Result, SurveyError};
pub use machine::{ResetOrigin, StateMachine, StateTransition, SurveyEvent, SurveyState};
pub use poll::{Answer, ChatId, MessageId, Poll, PollId, Tally, UserId};
pub use recorder::AnswerRecorder;
pub use registry::{PendingPoll, PendingPollRegistry};
pub use session::{SessionMap, SurveySession};
pub use store::{MemorySurveyStore, StoreError, StoreResult, SurveyStore};
pub use transport::{Menu, MenuAction, MenuButton, SurveyTransport, TransportError, TransportResult};
