//! Chat transport trait and menu types
//!
//! The transport is an external collaborator: it delivers text, polls,
//! and button menus into a chat and hands back the transport-assigned
//! poll identifier the registry keys on. Implementations live outside
//! this crate (the Telegram one in survey-bot).

use async_trait::async_trait;
use thiserror::Error;

use crate::machine::ResetOrigin;
use crate::poll::{ChatId, MessageId};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// An action button on one of the bot's menu screens. The token is what
/// comes back in the transport's button-press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start the survey over with a fresh run.
    Restart,
    /// Render the statistics screen in place.
    ShowStats,
    /// Ask for confirmation before wiping all recorded answers. Carries
    /// the screen the button lives on, so a decline can return there.
    RequestReset(ResetOrigin),
    /// Confirm the pending reset.
    ConfirmReset,
    /// Decline the pending reset.
    CancelReset,
}

impl MenuAction {
    pub fn token(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::ShowStats => "stats",
            Self::RequestReset(ResetOrigin::Completion) => "reset:completion",
            Self::RequestReset(ResetOrigin::Statistics) => "reset:statistics",
            Self::ConfirmReset => "reset:confirm",
            Self::CancelReset => "reset:cancel",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "restart" => Some(Self::Restart),
            "stats" => Some(Self::ShowStats),
            "reset:completion" => Some(Self::RequestReset(ResetOrigin::Completion)),
            "reset:statistics" => Some(Self::RequestReset(ResetOrigin::Statistics)),
            "reset:confirm" => Some(Self::ConfirmReset),
            "reset:cancel" => Some(Self::CancelReset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: MenuAction,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// A button menu attached to a message, as rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<MenuButton>>,
}

impl Menu {
    /// Menu attached to the completion screen.
    pub fn completion() -> Self {
        Self {
            rows: vec![
                vec![
                    MenuButton::new("Restart survey", MenuAction::Restart),
                    MenuButton::new("📊 Statistics", MenuAction::ShowStats),
                ],
                vec![MenuButton::new(
                    "Reset all data",
                    MenuAction::RequestReset(ResetOrigin::Completion),
                )],
            ],
        }
    }

    /// Menu attached to the statistics screen.
    pub fn statistics() -> Self {
        Self {
            rows: vec![
                vec![MenuButton::new("Restart survey", MenuAction::Restart)],
                vec![MenuButton::new(
                    "Reset all data",
                    MenuAction::RequestReset(ResetOrigin::Statistics),
                )],
            ],
        }
    }

    /// Yes/no menu attached to the reset confirmation screen.
    pub fn reset_confirmation() -> Self {
        Self {
            rows: vec![vec![
                MenuButton::new("Yes, delete everything", MenuAction::ConfirmReset),
                MenuButton::new("No, keep the data", MenuAction::CancelReset),
            ]],
        }
    }
}

/// Outbound side of the chat transport.
#[async_trait]
pub trait SurveyTransport: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat: ChatId, text: &str) -> TransportResult<()>;

    /// Send a multiple-choice poll; returns the transport-assigned poll
    /// identifier later answer events will reference.
    async fn send_poll(
        &self,
        chat: ChatId,
        question: &str,
        options: &[String],
    ) -> TransportResult<String>;

    /// Send a text message with an attached button menu.
    async fn send_menu(&self, chat: ChatId, text: &str, menu: &Menu) -> TransportResult<()>;

    /// Replace an already-sent message's text and menu in place.
    async fn edit_menu(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        menu: &Menu,
    ) -> TransportResult<()>;
}
