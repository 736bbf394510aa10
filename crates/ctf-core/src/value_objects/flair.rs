//! Cheer phrases and vote reactions

/// Phrases picked from when a challenge is marked solved
pub const CHEERS: [&str; 10] = [
    "Hooray",
    "Woo-hoo",
    "Cheers",
    "Yippee",
    "Yay",
    "Let's go",
    "Hip, hip, hooray",
    "Fantastic",
    "Celebrate",
    "Party time",
];

/// Number of distinct vote reactions available
pub const MAX_VOTE_OPTIONS: usize = 10;

const KEYCAPS: [&str; MAX_VOTE_OPTIONS] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
    "\u{1f51f}",
];

/// Cheer phrase for an entropy value
pub fn cheer(entropy: u32) -> &'static str {
    CHEERS[entropy as usize % CHEERS.len()]
}

/// Vote reaction for the 1-based option `n`
pub fn vote_emoji(n: usize) -> Option<&'static str> {
    n.checked_sub(1).and_then(|i| KEYCAPS.get(i)).copied()
}
