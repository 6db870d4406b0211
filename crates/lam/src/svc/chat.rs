use anyhow::{Result, anyhow};
use lam_core::client::LamBackend;
use lam_core::relay::relay;
use lam_core::transcript::{Transcript, Turn};
use std::sync::Arc;

/// Conversation between the user and the LAM backend.
pub struct Chat {
    backend: Arc<dyn LamBackend>,
    transcript: Transcript,
    quick_replies: Vec<String>,
}

impl Chat {
    pub fn new(backend: Arc<dyn LamBackend>, quick_replies: Vec<String>) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            quick_replies,
        }
    }

    /// Relays `input` and returns the turns it added, along with the text the
    /// input line should be reset to.
    pub async fn send(&mut self, input: &str) -> (Vec<Turn>, String) {
        let before = self.transcript.len();
        let history = std::mem::take(&mut self.transcript);
        let (transcript, cleared_input) = relay(self.backend.as_ref(), input, history).await;
        self.transcript = transcript;
        (self.transcript.since(before).to_vec(), cleared_input)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn clear(&mut self) {
        self.transcript = Transcript::new();
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.quick_replies
    }

    /// Quick reply by 1-based position, as listed to the user.
    pub fn quick_reply(&self, index: usize) -> Result<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.quick_replies.get(i))
            .map(String::as_str)
            .ok_or_else(|| {
                anyhow!(
                    "No quick reply #{index}. Choose 1 to {}.",
                    self.quick_replies.len()
                )
            })
    }
}
