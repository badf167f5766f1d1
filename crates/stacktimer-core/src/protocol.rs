use crate::emoji::EmojiCategory;
use crate::limits::Direction;
use crate::task::{AccentColor, Task};
use serde::{Deserialize, Serialize};

/// Which countdown a tick or completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Task,
    Break,
}

/// How the delete button was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Tap,
    /// Sustained press; the only gesture that confirms a delete.
    Hold,
}

/// Haptic feedback the host should give. The widget never triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Impact,
    Selection,
    Success,
    Error,
}

/// Flat mode name for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    View,
    Edit,
    Timer,
    BreakPrompt,
    Break,
    Delete,
}

/// Everything a host needs to draw the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: ModeKind,
    /// None is the empty state.
    pub task: Option<Task>,
    pub remaining_secs: u32,
    /// `remaining_secs` as MM:SS
    pub remaining: String,
    pub paused: bool,
    pub break_remaining_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_prompt_minutes: Option<u32>,
}

/// Messages from the widget to the host (JSON-lines on stdout).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    State(Snapshot),
    Feedback { kind: Feedback },
    /// A countdown reached zero.
    Completed { channel: Channel },
    Emojis {
        category: EmojiCategory,
        emojis: Vec<String>,
    },
    Ack { ok: bool, message: String },
}

/// Messages from the host to the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Resume,
    FinishEarly,
    CancelTimer,
    OpenEdit,
    SetName { name: String },
    SetEmoji { emoji: String },
    SetColor { color: AccentColor },
    SetDuration { minutes: u32 },
    AdjustDuration { direction: Direction },
    ConfirmEdit,
    CancelEdit,
    RequestDelete,
    PressDelete,
    ReleaseDelete,
    ConfirmDelete { gesture: Gesture },
    CancelDelete,
    AdjustBreak { direction: Direction },
    /// Take the offered break; `minutes` defaults to the prompt's value.
    ConfirmBreak {
        #[serde(default)]
        minutes: Option<u32>,
    },
    CancelBreak,
    AddTask,
    Background,
    Foreground,
    Status,
    /// Search the emoji catalogue.
    Emojis {
        #[serde(default)]
        query: String,
        #[serde(default)]
        category: EmojiCategory,
    },
    Quit,
}

/// Serialize a message as a JSON line (with trailing newline).
pub fn encode(msg: &impl Serialize) -> serde_json::Result<String> {
    let mut s = serde_json::to_string(msg)?;
    s.push('\n');
    Ok(s)
}

/// Deserialize a command line. Returns None on empty/whitespace input.
pub fn decode_command(line: &str) -> Option<serde_json::Result<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

/// Deserialize an event line. Returns None on empty or malformed input.
pub fn decode_event(line: &str) -> Option<Event> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}
