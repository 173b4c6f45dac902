//! Survey controller
//!
//! Orchestrates one entry point per inbound event type: start/restart,
//! poll answers, the statistics command, and menu button presses. Holds
//! the per-user session map, the pending-poll registry, and the recorder,
//! and talks to the chat through the transport trait.
//!
//! Transport-level races (unknown poll ids, answers for a position the
//! session already moved past, events with no session) are dropped
//! silently. Storage failures propagate out of the event's handling
//! before any session state is advanced, so a retried event finds the
//! session where it was.

use std::sync::Arc;

use crate::error::Result;
use crate::machine::{ResetOrigin, SurveyEvent, SurveyState};
use crate::poll::{ChatId, MessageId, Tally, UserId};
use crate::recorder::AnswerRecorder;
use crate::registry::PendingPollRegistry;
use crate::report;
use crate::session::{SessionMap, SurveySession};
use crate::store::SurveyStore;
use crate::transport::{Menu, MenuAction, SurveyTransport};

const EMPTY_CATALOG_TEXT: &str = "No polls are configured yet. Come back later!";
const COMPLETION_TEXT: &str = "Survey complete, thank you! What next?";
const RESET_CONFIRMATION_TEXT: &str =
    "This permanently deletes every recorded answer for all users. Continue?";

pub struct SurveyController<S, T> {
    store: Arc<S>,
    transport: Arc<T>,
    recorder: AnswerRecorder<S>,
    registry: PendingPollRegistry,
    sessions: SessionMap,
}

impl<S: SurveyStore, T: SurveyTransport> SurveyController<S, T> {
    pub fn new(store: Arc<S>, transport: Arc<T>) -> Self {
        Self {
            recorder: AnswerRecorder::new(Arc::clone(&store)),
            store,
            transport,
            registry: PendingPollRegistry::new(),
            sessions: SessionMap::new(),
        }
    }

    /// Start (or restart) the survey for a user: snapshot the catalog,
    /// compute the next run number, and dispatch the first poll.
    pub async fn start(&self, user: UserId, chat: ChatId) -> Result<()> {
        let slot = self.sessions.slot(user);
        let mut guard = slot.lock().await;

        let polls = self.store.list_polls().await?;
        if polls.is_empty() {
            log::info!("user {user} started with an empty poll catalog");
            self.transport.send_text(chat, EMPTY_CATALOG_TEXT).await?;
            return Ok(());
        }

        let run = self.recorder.runs_completed_by(user).await? + 1;
        let total = polls.len();

        let mut session = SurveySession::new(chat, polls);
        session
            .machine
            .handle_event(SurveyEvent::RunStarted { run, total });
        self.dispatch_current_poll(&session).await?;
        *guard = Some(session);

        log::info!("user {user} started run {run} ({total} polls)");
        Ok(())
    }

    /// Process an inbound poll answer: resolve it through the registry,
    /// record it, and advance the user's walk.
    pub async fn poll_answered(
        &self,
        transport_poll_id: &str,
        user: UserId,
        option_indexes: &[usize],
    ) -> Result<()> {
        let Some(pending) = self.registry.resolve(transport_poll_id) else {
            log::debug!("ignoring answer for unknown transport poll id {transport_poll_id}");
            return Ok(());
        };

        let slot = self.sessions.slot(user);
        let mut guard = slot.lock().await;
        let Some(session) = guard.as_mut() else {
            log::debug!("ignoring answer from user {user} with no active session");
            return Ok(());
        };

        let SurveyState::InProgress { position, run, .. } = *session.machine.state() else {
            log::debug!("ignoring answer from user {user} outside an active run");
            return Ok(());
        };
        if pending.position != position {
            log::warn!(
                "user {user} answered poll at position {} but current is {position}",
                pending.position
            );
            return Ok(());
        }

        let poll = &session.polls[position];
        if poll.id != pending.poll_id {
            // Entry from an earlier run whose snapshot had a different
            // poll at this position.
            log::debug!(
                "ignoring answer for poll {} which is no longer at position {position}",
                pending.poll_id
            );
            return Ok(());
        }
        if option_indexes.is_empty()
            || option_indexes
                .iter()
                .any(|&index| index >= poll.options.len())
        {
            log::warn!(
                "user {user} answered poll {} with invalid option indexes {option_indexes:?}",
                poll.id
            );
            return Ok(());
        }

        // Record before advancing: a storage failure leaves the session
        // at its pre-event position.
        self.recorder
            .record(&poll.id, user, option_indexes, run)
            .await?;
        log::info!(
            "user {user} answered poll {} with options {option_indexes:?} (run {run})",
            poll.id
        );

        let transition = session.machine.handle_event(SurveyEvent::PollAnswered);
        match transition.to {
            SurveyState::InProgress { .. } => self.dispatch_current_poll(session).await?,
            SurveyState::Finished { run } => {
                log::info!("user {user} finished run {run}");
                self.transport
                    .send_menu(session.chat, COMPLETION_TEXT, &Menu::completion())
                    .await?;
            }
            _ => {}
        }
        Ok(())
    }

    /// The statistics command: send the full report as a plain message.
    pub async fn show_stats(&self, chat: ChatId) -> Result<()> {
        let text = self.render_report().await?;
        self.transport.send_text(chat, &text).await?;
        Ok(())
    }

    /// Process a menu button press on one of the bot's screens.
    pub async fn menu_pressed(
        &self,
        user: UserId,
        chat: ChatId,
        message: MessageId,
        action: MenuAction,
    ) -> Result<()> {
        match action {
            MenuAction::Restart => self.start(user, chat).await,
            MenuAction::ShowStats => {
                let text = self.render_report().await?;
                self.transport
                    .edit_menu(chat, message, &text, &Menu::statistics())
                    .await?;
                Ok(())
            }
            MenuAction::RequestReset(origin) => {
                self.request_reset(user, chat, message, origin).await
            }
            MenuAction::ConfirmReset => self.confirm_reset(user, chat, message).await,
            MenuAction::CancelReset => self.cancel_reset(user, chat, message).await,
        }
    }

    async fn request_reset(
        &self,
        user: UserId,
        chat: ChatId,
        message: MessageId,
        origin: ResetOrigin,
    ) -> Result<()> {
        let slot = self.sessions.slot(user);
        let mut guard = slot.lock().await;
        let Some(session) = guard.as_mut() else {
            return Ok(());
        };

        let transition = session
            .machine
            .handle_event(SurveyEvent::ResetRequested { origin });
        if !transition.changed {
            // Stale button press outside the completion flow.
            return Ok(());
        }

        self.transport
            .edit_menu(
                chat,
                message,
                RESET_CONFIRMATION_TEXT,
                &Menu::reset_confirmation(),
            )
            .await?;
        Ok(())
    }

    async fn confirm_reset(&self, user: UserId, chat: ChatId, message: MessageId) -> Result<()> {
        let slot = self.sessions.slot(user);
        let mut guard = slot.lock().await;
        let Some(session) = guard.as_mut() else {
            return Ok(());
        };
        if !matches!(session.machine.state(), SurveyState::AwaitingReset { .. }) {
            return Ok(());
        }

        // Delete before transitioning: a storage failure keeps the
        // confirmation pending so the user can try again.
        let removed = self.store.delete_all_answers().await?;
        session.machine.handle_event(SurveyEvent::ResetConfirmed);
        log::warn!("user {user} confirmed reset: {removed} answers deleted");

        self.transport
            .edit_menu(chat, message, COMPLETION_TEXT, &Menu::completion())
            .await?;
        Ok(())
    }

    async fn cancel_reset(&self, user: UserId, chat: ChatId, message: MessageId) -> Result<()> {
        let slot = self.sessions.slot(user);
        let mut guard = slot.lock().await;
        let Some(session) = guard.as_mut() else {
            return Ok(());
        };

        let origin = match session.machine.state() {
            SurveyState::AwaitingReset { origin, .. } => *origin,
            _ => return Ok(()),
        };
        session.machine.handle_event(SurveyEvent::ResetDeclined);

        match origin {
            ResetOrigin::Completion => {
                self.transport
                    .edit_menu(chat, message, COMPLETION_TEXT, &Menu::completion())
                    .await?;
            }
            ResetOrigin::Statistics => {
                let text = self.render_report().await?;
                self.transport
                    .edit_menu(chat, message, &text, &Menu::statistics())
                    .await?;
            }
        }
        Ok(())
    }

    /// Send the poll the session is currently waiting on and register the
    /// transport id it was dispatched under.
    async fn dispatch_current_poll(&self, session: &SurveySession) -> Result<()> {
        let Some(position) = session.machine.state().position() else {
            return Ok(());
        };
        let poll = &session.polls[position];

        let transport_poll_id = self
            .transport
            .send_poll(session.chat, &poll.question, &poll.options)
            .await?;
        self.registry
            .register(transport_poll_id, poll.id.clone(), position);
        log::debug!(
            "dispatched poll {} at position {position} to chat {}",
            poll.id,
            session.chat
        );
        Ok(())
    }

    async fn render_report(&self) -> Result<String> {
        let polls = self.store.list_polls().await?;
        let mut tallies: Vec<Tally> = Vec::with_capacity(polls.len());
        for poll in &polls {
            tallies.push(self.recorder.tally(&poll.id).await?);
        }
        Ok(report::render(&polls, &tallies))
    }
}
