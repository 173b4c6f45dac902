//! Teloxide implementation of the survey transport.

use async_trait::async_trait;
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters, SendPollSetters};
use teloxide::requests::Requester;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::Bot;

use survey_core::{ChatId, Menu, MessageId, SurveyTransport, TransportError, TransportResult};

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn chat(chat: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat.0)
    }
}

#[async_trait]
impl SurveyTransport for TelegramTransport {
    async fn send_text(&self, chat: ChatId, text: &str) -> TransportResult<()> {
        self.bot
            .send_message(Self::chat(chat), text)
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn send_poll(
        &self,
        chat: ChatId,
        question: &str,
        options: &[String],
    ) -> TransportResult<String> {
        let message = self
            .bot
            .send_poll(Self::chat(chat), question, options.to_vec())
            .is_anonymous(false)
            .await
            .map_err(request_error)?;

        let poll = message.poll().ok_or_else(|| {
            TransportError::MalformedResponse(
                "sent poll message carries no poll payload".to_string(),
            )
        })?;
        Ok(poll.id.clone())
    }

    async fn send_menu(&self, chat: ChatId, text: &str, menu: &Menu) -> TransportResult<()> {
        self.bot
            .send_message(Self::chat(chat), text)
            .reply_markup(keyboard(menu))
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn edit_menu(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        menu: &Menu,
    ) -> TransportResult<()> {
        self.bot
            .edit_message_text(Self::chat(chat), teloxide::types::MessageId(message.0), text)
            .reply_markup(keyboard(menu))
            .await
            .map_err(request_error)?;
        Ok(())
    }
}

fn keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.rows.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.action.token())
            })
            .collect::<Vec<_>>()
    }))
}

fn request_error(error: teloxide::RequestError) -> TransportError {
    TransportError::Request(error.to_string())
}
