use serde::{Deserialize, Serialize};
use std::fmt;

/// Accent color of a task card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl AccentColor {
    /// Palette order, as offered by the color picker.
    pub const ALL: [AccentColor; 7] = [
        AccentColor::Red,
        AccentColor::Orange,
        AccentColor::Yellow,
        AccentColor::Green,
        AccentColor::Blue,
        AccentColor::Purple,
        AccentColor::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccentColor::Red => "red",
            AccentColor::Orange => "orange",
            AccentColor::Yellow => "yellow",
            AccentColor::Green => "green",
            AccentColor::Blue => "blue",
            AccentColor::Purple => "purple",
            AccentColor::Pink => "pink",
        }
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user-configured focus activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub duration_minutes: u32,
    pub emoji: String,
    pub color: AccentColor,
}

impl Task {
    pub fn duration_secs(&self) -> u32 {
        minutes_to_seconds(self.duration_minutes)
    }

    /// Card headline, e.g. "Read a book for 45 minutes".
    pub fn headline(&self) -> String {
        format!("{} for {} minutes", self.name, self.duration_minutes)
    }
}

impl Default for Task {
    fn default() -> Self {
        Self {
            name: "Read a book".into(),
            duration_minutes: 45,
            emoji: "📚".into(),
            color: AccentColor::Blue,
        }
    }
}

pub fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

/// Render seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
