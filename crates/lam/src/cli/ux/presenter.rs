use console::{Style, StyledObject};
use lam_core::transcript::{Speaker, Turn};
use std::io::Write;

/// Represents the type of a chat message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessageType {
    /// The prompt for user input.
    Prompt,
    /// Text the user sent, or that the backend attributed to the user.
    User,
    /// An answer from the LAM backend.
    Lam,
    /// Hints and status lines.
    Footer,
    /// An error message.
    Error,
}

impl From<Speaker> for ChatMessageType {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::User => ChatMessageType::User,
            Speaker::Lam => ChatMessageType::Lam,
            Speaker::System => ChatMessageType::Error,
        }
    }
}

/// Styles a string of text according to the specified `ChatMessageType`.
pub fn style_chat_text(text: &str, style: ChatMessageType) -> StyledObject<&str> {
    let style_obj = match style {
        ChatMessageType::Prompt => Style::new().blue().bold(),
        ChatMessageType::User => Style::new().blue(),
        ChatMessageType::Lam => Style::new().white().bright(),
        ChatMessageType::Footer => Style::new().white().dim(),
        ChatMessageType::Error => Style::new().red().bold(),
    };
    style_obj.apply_to(text)
}

/// Writes each turn as `<speaker>: <text>`, styled by speaker.
pub fn render_turns<W: Write>(out: &mut W, turns: &[Turn]) -> std::io::Result<()> {
    for turn in turns {
        let style = ChatMessageType::from(turn.speaker);
        let label = format!("{}:", turn.speaker);
        writeln!(
            out,
            "{} {}",
            style_chat_text(&label, style).bold(),
            style_chat_text(&turn.text, style)
        )?;
    }
    out.flush()
}
