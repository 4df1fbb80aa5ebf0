// Display-label fixing for right-to-left text.
// Terminals render Hebrew left-to-right, so labels are flipped for display only.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static HEBREW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{0590}-\u{05FF}]+").expect("valid Hebrew range pattern"));

/// Reverse every Hebrew run in `text` and then the word order.
/// Text without Hebrew is returned untouched.
pub fn display_label(text: &str) -> Cow<'_, str> {
    if !HEBREW.is_match(text) {
        return Cow::Borrowed(text);
    }

    let flipped = HEBREW.replace_all(text, |caps: &regex::Captures<'_>| {
        caps[0].chars().rev().collect::<String>()
    });

    let words: Vec<&str> = flipped.split_whitespace().rev().collect();
    Cow::Owned(words.join(" "))
}
