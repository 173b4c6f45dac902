//! Bot commands.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "start the survey from the first poll.")]
    Start,
    #[command(description = "show aggregated statistics for every poll.")]
    Stats,
    #[command(description = "show this message.")]
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_their_slash_form() {
        assert_eq!(Command::parse("/start", "bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/stats", "bot").unwrap(), Command::Stats);
        assert_eq!(Command::parse("/help", "bot").unwrap(), Command::Help);
        assert!(Command::parse("/unknown", "bot").is_err());
    }
}
