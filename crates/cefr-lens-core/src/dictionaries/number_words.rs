//! Spelled-out number words.
//!
//! Tokens made of these words (alone or hyphenated, e.g. `twenty-one`) are
//! flagged as number-like and never counted as vocabulary.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Cardinal and ordinal number words.
pub static NUMBER_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Cardinals
    set.extend([
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
        "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
        "hundred", "thousand", "million", "billion", "trillion",
    ]);

    // Ordinals
    set.extend([
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth", "eleventh", "twelfth", "twentieth", "hundredth", "thousandth", "millionth",
    ]);

    set
});

/// Check whether a word (or a hyphenated compound of words) is a number word.
pub fn is_number_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    !lower.is_empty()
        && lower
            .split('-')
            .all(|part| NUMBER_WORDS.contains(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_and_compound() {
        assert!(is_number_word("seven"));
        assert!(is_number_word("Twenty-One"));
        assert!(is_number_word("hundredth"));
    }

    #[test]
    fn non_numbers() {
        assert!(!is_number_word("someone"));
        assert!(!is_number_word("one-sided"));
        assert!(!is_number_word(""));
    }
}
