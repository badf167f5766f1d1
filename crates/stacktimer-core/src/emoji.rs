use serde::{Deserialize, Serialize};

/// Picker tabs, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiCategory {
    Smileys,
    People,
    Animals,
    /// The picker opens here.
    #[default]
    Objects,
}

impl EmojiCategory {
    pub const ALL: [EmojiCategory; 4] = [
        EmojiCategory::Smileys,
        EmojiCategory::People,
        EmojiCategory::Animals,
        EmojiCategory::Objects,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmojiCategory::Smileys => "Smileys",
            EmojiCategory::People => "People",
            EmojiCategory::Animals => "Animals",
            EmojiCategory::Objects => "Objects",
        }
    }
}

/// A glyph plus the short name used for searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emoji {
    pub glyph: &'static str,
    pub name: &'static str,
}

const fn e(glyph: &'static str, name: &'static str) -> Emoji {
    Emoji { glyph, name }
}

const SMILEYS: [Emoji; 20] = [
    e("😀", "grinning"),
    e("😁", "beaming"),
    e("😂", "tears of joy"),
    e("🤣", "rolling laughing"),
    e("😊", "smiling"),
    e("😍", "heart eyes"),
    e("😘", "kiss"),
    e("😎", "sunglasses cool"),
    e("😇", "halo angel"),
    e("🙂", "slight smile"),
    e("🙃", "upside down"),
    e("😉", "wink"),
    e("😌", "relieved"),
    e("🤗", "hug"),
    e("🤩", "star struck"),
    e("🥳", "party"),
    e("😴", "sleeping"),
    e("😤", "triumph"),
    e("😬", "grimace"),
    e("🤔", "thinking"),
];

const PEOPLE: [Emoji; 20] = [
    e("👶", "baby"),
    e("🧒", "child"),
    e("👦", "boy"),
    e("👧", "girl"),
    e("🧑", "person"),
    e("👨", "man"),
    e("👩", "woman"),
    e("👨‍🦰", "man red hair"),
    e("👩‍🦰", "woman red hair"),
    e("👨‍🦳", "man white hair"),
    e("👩‍🦳", "woman white hair"),
    e("👨‍🦱", "man curly hair"),
    e("👩‍🦱", "woman curly hair"),
    e("🧓", "older person"),
    e("👴", "old man"),
    e("👵", "old woman"),
    e("🧔", "beard"),
    e("🙇", "bow"),
    e("💃", "dancer"),
    e("🕺", "dancing man"),
];

const ANIMALS: [Emoji; 20] = [
    e("🐶", "dog"),
    e("🐱", "cat"),
    e("🐭", "mouse"),
    e("🐹", "hamster"),
    e("🐰", "rabbit"),
    e("🦊", "fox"),
    e("🐻", "bear"),
    e("🐼", "panda"),
    e("🐨", "koala"),
    e("🐯", "tiger"),
    e("🦁", "lion"),
    e("🐮", "cow"),
    e("🐷", "pig"),
    e("🐸", "frog"),
    e("🐵", "monkey"),
    e("🐤", "chick"),
    e("🐥", "hatching chick"),
    e("🐦", "bird"),
    e("🐧", "penguin"),
    e("🐠", "fish"),
];

const OBJECTS: [Emoji; 20] = [
    e("📚", "books"),
    e("📖", "open book"),
    e("📝", "memo"),
    e("🖊️", "pen"),
    e("🖋️", "fountain pen"),
    e("✏️", "pencil"),
    e("🗓️", "calendar"),
    e("⏰", "alarm clock"),
    e("⏳", "hourglass"),
    e("🕹️", "joystick"),
    e("🎧", "headphones"),
    e("🎮", "video game"),
    e("💻", "laptop"),
    e("🖥️", "desktop computer"),
    e("📱", "phone"),
    e("📷", "camera"),
    e("🎒", "backpack"),
    e("🧪", "test tube"),
    e("⚽", "soccer ball"),
    e("🏋️", "weight lifting"),
];

/// The built-in emoji list for a category.
pub fn builtin_emojis(category: EmojiCategory) -> &'static [Emoji] {
    match category {
        EmojiCategory::Smileys => &SMILEYS,
        EmojiCategory::People => &PEOPLE,
        EmojiCategory::Animals => &ANIMALS,
        EmojiCategory::Objects => &OBJECTS,
    }
}

/// Search a category. A blank query returns the whole category; otherwise
/// entries whose glyph or name contains the trimmed, lowercased query.
pub fn filter_emojis(query: &str, category: EmojiCategory) -> Vec<&'static str> {
    let list = builtin_emojis(category);
    let q = query.trim().to_lowercase();
    list.iter()
        .filter(|emoji| q.is_empty() || emoji.name.contains(&q) || emoji.glyph.contains(&q))
        .map(|emoji| emoji.glyph)
        .collect()
}
