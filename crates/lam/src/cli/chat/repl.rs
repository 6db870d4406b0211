use crate::cli::chat::commands::{
    CliCommand, Command, Outcome, is_repl_command, parse_command_line,
};
use crate::cli::ux::{ChatMessageType, WaitSpinner, render_turns, style_chat_text};
use crate::svc::chat::Chat;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use rustyline::completion::{Candidate, Completer};
use rustyline::error::ReadlineError;
use rustyline::hint::Hinter;
use rustyline::{CompletionType, Editor, Helper, Highlighter, Validator};
use std::io::{Write, stdout};
use tracing::debug;

#[derive(Helper, Validator, Highlighter)]
struct Repl {
    pub command_names: Vec<String>,
}

#[derive(Debug)]
struct CompletionCandidate {
    text: String,
    display_string: String,
}

impl CompletionCandidate {
    pub fn new(text: &str) -> Self {
        let display_string = style_chat_text(text, ChatMessageType::Footer).to_string();
        Self {
            text: text.to_owned(),
            display_string,
        }
    }
}

impl Candidate for CompletionCandidate {
    fn display(&self) -> &str {
        &self.display_string
    }

    fn replacement(&self) -> &str {
        &self.text
    }
}

impl Completer for Repl {
    type Candidate = CompletionCandidate;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, Vec::new()));
        }

        let candidates = self
            .command_names
            .iter()
            .filter(|name| name.starts_with(line))
            .map(|name| CompletionCandidate::new(name))
            .collect();

        Ok((0, candidates))
    }
}

impl Hinter for Repl {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if line.is_empty() || pos < line.len() || !line.starts_with('/') {
            return None;
        }
        self.command_names
            .iter()
            .find(|&cmd_name| cmd_name.starts_with(line))
            .map(|cmd_name| cmd_name[line.len()..].into())
    }
}

fn command_names() -> Vec<String> {
    CliCommand::command()
        .get_subcommands()
        .flat_map(|c| c.get_name_and_visible_aliases())
        .map(|s| format!("/{s}"))
        .collect()
}

/// Runs the interactive REPL for the chat session.
pub async fn run(chat: &mut Chat) -> Result<()> {
    println!(
        "Welcome to lam chat! Type 'process tasks' to start task processing or ask for steps to play some music."
    );
    println!("Type '/help' for commands, '/q' to exit.");

    let config = rustyline::Config::builder()
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(Repl {
        command_names: command_names(),
    }));

    let prompt = format!("\n{}", style_chat_text("> ", ChatMessageType::Prompt));
    let mut next_input = String::new();
    loop {
        let readline = rl.readline_with_initial(&prompt, (next_input.as_str(), ""));
        next_input.clear();
        match readline {
            Ok(line) => {
                rl.add_history_entry(&line)?;
                let trimmed_line = line.trim();

                if trimmed_line.is_empty() {
                    continue;
                }

                if is_repl_command(trimmed_line) {
                    match CliCommand::try_parse_from(parse_command_line(trimmed_line)) {
                        Ok(cli_command) => {
                            match execute_command(cli_command.command, chat, &mut stdout())? {
                                Outcome::Continue => {}
                                Outcome::Prefill(text) => next_input = text,
                                Outcome::Exit => return Ok(()),
                            }
                        }
                        Err(e) => {
                            e.print()?;
                        }
                    }
                } else {
                    next_input = process_message(chat, &mut stdout(), &line).await?;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Type /quit to exit.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nBye!");
                return Ok(());
            }
            Err(err) => {
                return Err(err.into());
            }
        }
    }
}

fn execute_command<W: Write>(command: Command, chat: &mut Chat, out: &mut W) -> Result<Outcome> {
    debug!(?command, "Executing REPL command");
    command.execute(chat, out)
}

/// Relays one line, prints the new turns and returns the text for the next input line.
async fn process_message<W: Write>(chat: &mut Chat, out: &mut W, line: &str) -> Result<String> {
    let (turns, next_input) = {
        let _spinner = WaitSpinner::start("Waiting for LAM...");
        chat.send(line).await
    };

    render_turns(out, &turns)?;
    Ok(next_input)
}
