//! # survey-bot
//!
//! Telegram front end for the survey core: command and update routing,
//! the teloxide transport implementation, poll catalog seeding, and the
//! process surface (CLI flags, logging).

pub mod catalog;
pub mod commands;
pub mod handlers;
pub mod logging;
pub mod telegram;

// Re-exports
pub use catalog::default_catalog;
pub use commands::Command;
pub use handlers::build_schema;
pub use telegram::TelegramTransport;

use survey_core::SurveyController;
use survey_storage::SqliteSurveyStore;

/// Controller wired to the production store and transport.
pub type BotController = SurveyController<SqliteSurveyStore, TelegramTransport>;

/// Outcome of one update handler.
pub type HandlerResult = anyhow::Result<()>;
