use crate::svc::chat::Chat;
use anyhow::Result;
use lam_core::client::LamBackend;
use std::sync::Arc;

mod commands;
mod repl;

/// Executes the chat command, starting an interactive REPL session.
pub async fn execute(backend: Arc<dyn LamBackend>, quick_replies: Vec<String>) -> Result<()> {
    let mut chat = Chat::new(backend, quick_replies);
    repl::run(&mut chat).await
}
