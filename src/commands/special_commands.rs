//! Special commands parser for the interactive scout session
//!
//! Commands are prefixed with `/` and are case-insensitive. Anything else
//! is treated as an answer to the active prompt.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Commands that act on the session rather than answer the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Discard the conversation and start over
    Restart,

    /// Print the whole transcript so far
    ShowTranscript,

    /// Print the filters confirmed so far
    ShowFilters,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input answers the active prompt.
    None,
}

/// Parse a line of user input into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if the input starts with `/` but
/// names no command
///
/// # Examples
///
/// ```
/// use gamescout::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/restart").unwrap(), SpecialCommand::Restart);
/// assert_eq!(parse_special_command("1, 3").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/bogus").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // Bare words are answers: "quit" is a valid free-text query
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/restart" | "/new" | "/again" => Ok(SpecialCommand::Restart),
        "/transcript" | "/history" => Ok(SpecialCommand::ShowTranscript),
        "/filters" | "/status" => Ok(SpecialCommand::ShowFilters),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/quit" | "/exit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the interactive session
pub fn print_help() {
    println!(
        r#"
Game Scout Commands
===================

ANSWERING A PROMPT:
  1, 3            - Pick options by number
  rpg, open world - Pick options by name or slug
  (empty line)    - No filter for this step
  2015-2024       - Custom release window (date step)

SESSION:
  /restart        - Start a new conversation
  /filters        - Show the filters confirmed so far
  /transcript     - Show the conversation so far
  /help           - Show this help
  /quit           - Exit
"#
    );
}
