//! Solve markers prepended to challenge channel names

/// Marker glyph put in front of a solved challenge channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Regular solve
    Flag,
    /// First solve of the whole competition
    Blood,
}

impl Marker {
    /// Every marker, in the order they are checked
    pub const ALL: [Marker; 2] = [Marker::Flag, Marker::Blood];

    /// The glyph as a single `char`
    pub const fn glyph(self) -> char {
        match self {
            Self::Flag => '\u{1F6A9}',
            Self::Blood => '\u{1FA78}',
        }
    }

    /// Whether `name` already starts with any marker glyph
    ///
    /// Only the first character is inspected.
    pub fn is_marked(name: &str) -> bool {
        name.chars()
            .next()
            .is_some_and(|c| Self::ALL.iter().any(|m| m.glyph() == c))
    }

    /// The channel name after marking
    pub fn apply(self, name: &str) -> String {
        format!("{} {name}", self.glyph())
    }
}

/// Normalized name of a challenge channel, ignoring solve markers
///
/// Leading marker glyphs and the separators that follow them are stripped, the
/// rest is lowercased and inner whitespace collapses to `-` (the platform does
/// the same to text channel names).
pub fn logical_channel_name(name: &str) -> String {
    let mut rest = name.trim();
    while let Some(c) = rest.chars().next() {
        if Marker::ALL.iter().any(|m| m.glyph() == c) {
            rest = rest[c.len_utf8()..].trim_start_matches([' ', '-']);
        } else {
            break;
        }
    }

    rest.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
