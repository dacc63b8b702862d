//! Context words used by the built-in proper-name heuristic.
//!
//! Titles mark the following capitalized run as a person; locative
//! prepositions suggest a place. Abbreviations listed here do not end a
//! sentence when followed by a period.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Honorifics and titles that precede a personal name.
pub static TITLES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "mr", "mrs", "ms", "miss", "dr", "prof", "professor", "sir", "dame", "lord", "lady",
        "king", "queen", "prince", "princess", "captain", "capt", "general", "gen", "colonel",
        "col", "president", "senator", "rev", "father", "sister", "aunt", "uncle",
    ]
    .into_iter()
    .collect()
});

/// Prepositions that typically introduce a place name.
pub static LOCATIVE_PREPOSITIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "in", "at", "to", "from", "into", "near", "across", "through", "toward", "towards",
    ]
    .into_iter()
    .collect()
});

/// Abbreviations whose trailing period does not end a sentence.
pub static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Titles and honorifics
    set.extend([
        "mr", "mrs", "ms", "dr", "prof", "rev", "fr", "sr", "jr", "st", "capt", "col", "gen",
        "lt", "sgt", "hon",
    ]);

    // Common abbreviations
    set.extend(["etc", "vs", "cf", "approx", "no", "vol", "fig", "inc", "ltd", "co"]);

    set
});

/// Check if a word is a title (case-insensitive).
pub fn is_title(word: &str) -> bool {
    TITLES.contains(word.to_lowercase().as_str())
}

/// Check if a word is a locative preposition (case-insensitive).
pub fn is_locative_preposition(word: &str) -> bool {
    LOCATIVE_PREPOSITIONS.contains(word.to_lowercase().as_str())
}

/// Check if a word is an abbreviation that suppresses a sentence break.
pub fn is_abbreviation(word: &str) -> bool {
    ABBREVIATIONS.contains(word.to_lowercase().trim_end_matches('.'))
}
