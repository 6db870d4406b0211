//! The conversation as shown to the user: an ordered list of (speaker, text) turns.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a displayed turn is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "LAM")]
    Lam,
    #[serde(rename = "system")]
    System,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match &self {
            Speaker::User => "user",
            Speaker::Lam => "LAM",
            Speaker::System => "system",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single displayed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Append-only sequence of turns.
///
/// Owned by the display surface and handed to the relay by value on each
/// interaction. Existing turns are never edited or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn extend(&mut self, turns: impl IntoIterator<Item = Turn>) {
        self.turns.extend(turns);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns appended after the first `n`. Empty when `n` is past the end.
    pub fn since(&self, n: usize) -> &[Turn] {
        self.turns.get(n..).unwrap_or(&[])
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

impl From<Vec<(Speaker, &str)>> for Transcript {
    fn from(pairs: Vec<(Speaker, &str)>) -> Self {
        pairs
            .into_iter()
            .map(|(speaker, text)| Turn::new(speaker, text))
            .collect::<Vec<_>>()
            .into()
    }
}

impl From<Transcript> for Vec<Turn> {
    fn from(transcript: Transcript) -> Self {
        transcript.turns
    }
}
