//! Turns one line of user input into a backend call and a transcript update.
use tracing::{debug, error};

use crate::client::{LamBackend, RelayError};
use crate::transcript::{Speaker, Transcript, Turn};

const PROCESS_TASK_PREFIX: &str = "process task";

/// Which backend operation a line of input maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Kick off task processing on the backend.
    ProcessTasks,
    /// Ask for the steps answering the input.
    Query,
}

impl Command {
    /// Inputs starting with "process task" (ignoring case and surrounding
    /// whitespace) process tasks. Everything else is a query.
    pub fn parse(input: &str) -> Self {
        if input
            .trim()
            .to_lowercase()
            .starts_with(PROCESS_TASK_PREFIX)
        {
            Command::ProcessTasks
        } else {
            Command::Query
        }
    }
}

/// Performs the backend call for `input` and returns the turns to append.
pub async fn try_relay<B>(backend: &B, input: &str) -> Result<Vec<Turn>, RelayError>
where
    B: LamBackend + ?Sized,
{
    let command = Command::parse(input);
    debug!(?command, "Relaying input");

    match command {
        Command::ProcessTasks => {
            let message = backend.process_tasks().await?;
            // Labelled "user", not "LAM".
            Ok(vec![Turn::new(Speaker::User, message)])
        }
        Command::Query => {
            let answer = backend.query_steps(input).await?;
            Ok(vec![
                Turn::new(Speaker::User, input),
                Turn::new(Speaker::Lam, answer),
            ])
        }
    }
}

/// Relays `input` and returns the extended transcript plus the cleared input.
///
/// Never fails: a backend error becomes a single `system` turn reading
/// `An error occurred: <error>`, which is also logged.
pub async fn relay<B>(backend: &B, input: &str, history: Transcript) -> (Transcript, String)
where
    B: LamBackend + ?Sized,
{
    let mut transcript = history;
    match try_relay(backend, input).await {
        Ok(turns) => transcript.extend(turns),
        Err(e) => {
            let error_message = format!("An error occurred: {e}");
            error!("{error_message}");
            transcript.push(Turn::new(Speaker::System, error_message));
        }
    }
    (transcript, String::new())
}
