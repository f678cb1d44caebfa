//! # Host Commands
//!
//! The playground's buttons, as typed commands.
//!
//! ## Command Set
//!
//! - `run` - Compile and run the current source
//! - `clear` - Empty the console
//! - `reset` - Empty the source
//! - `load <path>` - Replace the source with a file's contents
//! - `show` - Force a redraw
//! - `state` - Report engine state and revision
//! - `quit` - Exit the host

use thiserror::Error;

/// Host command error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostCommandError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Host commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Compile and run a snapshot of the source
    Run,
    /// Clear the console transcript
    Clear,
    /// Replace the source with nothing
    Reset,
    /// Replace the source with a file's contents
    Load { path: String },
    /// Redraw even if nothing changed
    Show,
    /// Report engine state
    State,
    /// Quit the host
    Quit,
}

/// Host command parser
pub struct HostCommandParser;

impl HostCommandParser {
    /// Parses a command string, with or without its leading `:`
    pub fn parse(input: &str) -> Result<HostCommand, HostCommandError> {
        let input = input.trim();
        let input = input.strip_prefix(':').unwrap_or(input).trim_start();

        let mut parts = input.splitn(2, char::is_whitespace);
        let cmd = match parts.next() {
            Some(cmd) if !cmd.is_empty() => cmd.to_lowercase(),
            _ => {
                return Err(HostCommandError::InvalidCommand(
                    "Empty command".to_string(),
                ))
            }
        };
        let rest = parts.next().map(str::trim).unwrap_or("");

        let command = match cmd.as_str() {
            "run" | "r" => HostCommand::Run,
            "clear" | "cls" => HostCommand::Clear,
            "reset" | "new" => HostCommand::Reset,
            "load" | "open" => return Self::parse_load(rest),
            "show" => HostCommand::Show,
            "state" | "status" => HostCommand::State,
            "quit" | "exit" | "q" => HostCommand::Quit,
            _ => return Err(HostCommandError::UnknownCommand(cmd)),
        };

        if !rest.is_empty() {
            return Err(HostCommandError::InvalidCommand(format!(
                "'{}' takes no arguments",
                cmd
            )));
        }

        Ok(command)
    }

    fn parse_load(rest: &str) -> Result<HostCommand, HostCommandError> {
        if rest.is_empty() {
            return Err(HostCommandError::MissingArgument("file path".to_string()));
        }
        Ok(HostCommand::Load {
            path: rest.to_string(),
        })
    }
}
