//! Update dispatch: one endpoint per inbound event type.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, PollAnswer};
use teloxide::utils::command::BotCommands;

use survey_core::{ChatId, MenuAction, MessageId, UserId};

use crate::commands::Command;
use crate::{BotController, HandlerResult};

const FAILURE_TEXT: &str = "Something went wrong on our side. Please try again.";

/// Build the dptree schema routing commands, poll answers, and button
/// presses into the controller.
pub fn build_schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_poll_answer().endpoint(handle_poll_answer))
        .branch(Update::filter_callback_query().endpoint(handle_callback_query))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    controller: Arc<BotController>,
) -> HandlerResult {
    let chat = ChatId(msg.chat.id.0);
    match cmd {
        Command::Start => {
            let Some(user) = msg.from() else {
                return Ok(());
            };
            let outcome = controller.start(UserId(user.id.0), chat).await;
            report_outcome(&bot, msg.chat.id, outcome).await
        }
        Command::Stats => {
            let outcome = controller.show_stats(chat).await;
            report_outcome(&bot, msg.chat.id, outcome).await
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
            Ok(())
        }
    }
}

async fn handle_poll_answer(
    bot: Bot,
    answer: PollAnswer,
    controller: Arc<BotController>,
) -> HandlerResult {
    let user = UserId(answer.user.id.0);
    let options: Vec<usize> = answer
        .option_ids
        .iter()
        .map(|&index| index as usize)
        .collect();

    let outcome = controller.poll_answered(&answer.poll_id, user, &options).await;
    // Poll answers carry no chat; in a private chat the user id doubles
    // as the chat id.
    report_outcome(&bot, teloxide::types::ChatId(answer.user.id.0 as i64), outcome).await
}

async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    controller: Arc<BotController>,
) -> HandlerResult {
    bot.answer_callback_query(query.id.clone()).await?;

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    let Some(action) = MenuAction::parse(data) else {
        log::warn!("ignoring unknown menu token: {data}");
        return Ok(());
    };
    let Some(message) = query.message.as_ref() else {
        return Ok(());
    };

    let outcome = controller
        .menu_pressed(
            UserId(query.from.id.0),
            ChatId(message.chat.id.0),
            MessageId(message.id.0),
            action,
        )
        .await;
    report_outcome(&bot, message.chat.id, outcome).await
}

/// Storage and transport failures are surfaced to the user as a short
/// notice; dropped transport races never reach this point as errors.
async fn report_outcome(
    bot: &Bot,
    chat: teloxide::types::ChatId,
    outcome: survey_core::Result<()>,
) -> HandlerResult {
    if let Err(error) = outcome {
        log::error!("event handling failed: {error}");
        bot.send_message(chat, FAILURE_TEXT).await?;
    }
    Ok(())
}
