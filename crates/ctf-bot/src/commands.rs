//! Slash command definitions registered at startup

use ctf_discord::{ApplicationCommand, CommandOptionType};
use ctf_service::{CHALLENGE_NAME_MAX_CHARS, CTF_NAME_MAX_CHARS};

/// Every command the bot answers, as bulk-registered in the guild
pub fn definitions() -> Vec<ApplicationCommand> {
    vec![
        ApplicationCommand::new("new", "Create a new CTF")
            .option(CommandOptionType::String, "name", "Name of the CTF", true)
            .max_length(CTF_NAME_MAX_CHARS)
            .option(
                CommandOptionType::Integer,
                "event",
                "CTFtime event id the CTF comes from",
                false,
            ),
        ApplicationCommand::new("open", "Open registrations for this CTF"),
        ApplicationCommand::new("close", "Close registrations for this CTF"),
        ApplicationCommand::new("delete", "Delete this CTF with its channels and role"),
        ApplicationCommand::new("info", "List upcoming CTFs from CTFtime").option(
            CommandOptionType::Integer,
            "weeks",
            "How many weeks ahead to look",
            false,
        ),
        ApplicationCommand::new("vote", "Start a vote on upcoming CTFs").option(
            CommandOptionType::Integer,
            "weeks",
            "How many weeks ahead to look",
            false,
        ),
        ApplicationCommand::new("flag", "Mark this challenge as solved"),
        ApplicationCommand::new("blood", "Mark this challenge as first blood"),
        ApplicationCommand::new("chal", "Open a channel for a new challenge")
            .option(CommandOptionType::String, "name", "Name of the challenge", true)
            .max_length(CHALLENGE_NAME_MAX_CHARS),
        ApplicationCommand::new("ping", "Check that the bot is alive"),
    ]
}
