use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use teloxide::prelude::*;

use survey_bot::logging::init_logging;
use survey_bot::{build_schema, catalog, TelegramTransport};
use survey_core::{SurveyController, SurveyStore};
use survey_storage::SqliteSurveyStore;

#[derive(Parser, Debug, Clone)]
#[command(name = "survey-bot")]
#[command(about = "Sequential survey bot for Telegram")]
#[command(version)]
struct Cli {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN")]
    bot_token: String,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "survey.db")]
    database: PathBuf,

    /// Poll catalog JSON file
    #[arg(long, env = "POLLS_FILE", default_value = "polls.json")]
    polls_file: PathBuf,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    log::info!("starting survey bot");
    log::info!("  database: {}", cli.database.display());
    log::info!("  poll catalog: {}", cli.polls_file.display());

    let store = Arc::new(SqliteSurveyStore::new(&cli.database));
    store.init().await?;

    if store.list_polls().await?.is_empty() {
        let polls = catalog::load(&cli.polls_file)?;
        store.seed_polls(&polls).await?;
        log::info!("seeded {} polls into an empty catalog", polls.len());
    }

    let bot = Bot::new(cli.bot_token);
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let controller = Arc::new(SurveyController::new(store, transport));

    log::info!("dispatching updates; press ctrl-c to stop");
    Dispatcher::builder(bot, build_schema())
        .dependencies(dptree::deps![controller])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("survey bot stopped");
    Ok(())
}
