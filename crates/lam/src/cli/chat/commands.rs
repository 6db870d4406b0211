use crate::cli::ux::{ChatMessageType, render_turns, style_chat_text};
use crate::svc::chat::Chat;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;

// -------------
// REPL commands
// -------------
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct CliCommand {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Hash, PartialEq, Eq)]
pub enum Command {
    /// Clear chat history
    Clear,
    /// Show the conversation so far
    #[command(alias = "h")]
    History,
    /// Use a canned message.
    ///
    /// With no arguments, lists the quick replies.
    /// Provide a number to put that reply on the input line.
    #[command(alias = "r")]
    Quick {
        /// Position of the quick reply, starting at 1
        index: Option<usize>,
    },
    /// Exit the chat session
    #[command(alias = "q", alias = "quit")]
    Exit,
}

/// What the REPL does after a command ran.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Start the next input line with this text.
    Prefill(String),
    Exit,
}

impl Command {
    /// Executes a REPL command, writing any output to `out`.
    pub fn execute<W: Write>(self, chat: &mut Chat, out: &mut W) -> Result<Outcome> {
        match self {
            Command::Clear => {
                chat.clear();
                writeln!(out, "Chat history cleared")?;
                Ok(Outcome::Continue)
            }
            Command::History => {
                if chat.transcript().is_empty() {
                    writeln!(
                        out,
                        "{}",
                        style_chat_text("No messages yet.", ChatMessageType::Footer)
                    )?;
                } else {
                    render_turns(out, chat.transcript().turns())?;
                }
                Ok(Outcome::Continue)
            }
            Command::Quick { index: None } => {
                for (i, reply) in chat.quick_replies().iter().enumerate() {
                    writeln!(out, "{}. {reply}", i + 1)?;
                }
                Ok(Outcome::Continue)
            }
            Command::Quick { index: Some(index) } => match chat.quick_reply(index) {
                Ok(reply) => Ok(Outcome::Prefill(reply.to_string())),
                Err(e) => {
                    writeln!(
                        out,
                        "{}",
                        style_chat_text(&e.to_string(), ChatMessageType::Error)
                    )?;
                    Ok(Outcome::Continue)
                }
            },
            Command::Exit => {
                writeln!(out, "Bye!")?;
                Ok(Outcome::Exit)
            }
        }
    }
}

/// True when `line` names a REPL command (or `/help`). Other lines, even
/// ones starting with `/`, are messages for the backend.
pub fn is_repl_command(line: &str) -> bool {
    let Some(name) = line
        .trim()
        .strip_prefix('/')
        .and_then(|rest| rest.split_whitespace().next())
    else {
        return false;
    };
    name == "help" || CliCommand::command().find_subcommand(name).is_some()
}

/// Splits a command line into clap arguments, falling back to whitespace
/// splitting when quotes are unbalanced.
pub fn parse_command_line(line: &str) -> Vec<String> {
    let trimmed_line = line.trim();
    shlex::split(trimmed_line).unwrap_or_else(|| {
        trimmed_line
            .split_whitespace()
            .map(|s| s.to_string())
            .collect()
    })
}
