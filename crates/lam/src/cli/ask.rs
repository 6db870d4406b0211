use anyhow::{Context, Result};
use lam_core::client::LamBackend;
use lam_core::relay::relay;
use lam_core::transcript::Transcript;
use std::io::{Write, stdout};
use std::sync::Arc;

use crate::cli::ux::{WaitSpinner, render_turns};

/// Sends a single message on a fresh transcript and prints the result.
pub async fn execute(backend: Arc<dyn LamBackend>, text: &str, json: bool) -> Result<()> {
    let (transcript, _) = {
        let _spinner = WaitSpinner::start("Waiting for LAM...");
        relay(backend.as_ref(), text, Transcript::new()).await
    };

    write_transcript(&mut stdout(), &transcript, json)
}

fn write_transcript<W: Write>(out: &mut W, transcript: &Transcript, json: bool) -> Result<()> {
    if json {
        let body =
            serde_json::to_string_pretty(transcript).context("Failed to serialize transcript")?;
        writeln!(out, "{body}")?;
    } else {
        render_turns(out, transcript.turns())?;
    }
    Ok(())
}
