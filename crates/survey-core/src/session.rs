//! Per-user survey sessions
//!
//! A session is the ephemeral state of one user's walk: the poll-list
//! snapshot taken at run start, the chat to deliver into, and the state
//! machine tracking position and run. The map hands out one lock per user
//! so event handling is serialized per user even when the transport
//! delivers updates concurrently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::machine::StateMachine;
use crate::poll::{ChatId, Poll, UserId};

/// Ephemeral state of one user's survey walk.
#[derive(Debug, Clone)]
pub struct SurveySession {
    /// Chat the run's polls and screens are delivered into.
    pub chat: ChatId,
    /// Poll list snapshot taken at run start. The ordering is fixed for
    /// the whole run even if the catalog changes concurrently.
    pub polls: Vec<Poll>,
    /// Progression state machine (position, run, reset sub-flow).
    pub machine: StateMachine,
}

impl SurveySession {
    pub fn new(chat: ChatId, polls: Vec<Poll>) -> Self {
        Self {
            chat,
            polls,
            machine: StateMachine::new(),
        }
    }
}

/// A user's session slot. `None` until the user first starts the survey.
pub type SessionSlot = Arc<Mutex<Option<SurveySession>>>;

/// Keyed store of per-user sessions.
#[derive(Debug, Default)]
pub struct SessionMap {
    slots: DashMap<UserId, SessionSlot>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Get (or lazily create) the slot for a user. Callers hold the slot
    /// lock for the duration of one event, which serializes all handling
    /// for that user.
    pub fn slot(&self, user: UserId) -> SessionSlot {
        self.slots
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Number of users that have a slot (not necessarily an active run).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::SurveyEvent;
    use crate::poll::Poll;

    fn sample_polls() -> Vec<Poll> {
        vec![
            Poll::new("p1", "One?", vec!["a".into(), "b".into()]),
            Poll::new("p2", "Two?", vec!["x".into(), "y".into()]),
        ]
    }

    #[tokio::test]
    async fn slots_start_empty_and_are_reused() {
        let map = SessionMap::new();
        let user = UserId(7);

        {
            let slot = map.slot(user);
            let mut guard = slot.lock().await;
            assert!(guard.is_none());
            *guard = Some(SurveySession::new(ChatId(7), sample_polls()));
        }

        let slot = map.slot(user);
        let guard = slot.lock().await;
        assert!(guard.is_some());
        assert_eq!(map.len(), 1);
    }

    #[tokio::test]
    async fn replacing_a_session_resets_its_machine() {
        let map = SessionMap::new();
        let slot = map.slot(UserId(1));

        let mut guard = slot.lock().await;
        let mut session = SurveySession::new(ChatId(1), sample_polls());
        session
            .machine
            .handle_event(SurveyEvent::RunStarted { run: 1, total: 2 });
        *guard = Some(session);

        *guard = Some(SurveySession::new(ChatId(1), sample_polls()));
        let session = guard.as_ref().unwrap();
        assert_eq!(session.machine.state().run(), None);
    }
}
