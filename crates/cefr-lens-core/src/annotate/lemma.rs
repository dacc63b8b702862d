//! Dictionary-validated suffix lemmatizer.
//!
//! Irregular forms come from [`irregular_forms`]. Regular inflections are
//! undone by generating candidate stems (`-ies` → `-y`, `-ing` → ``/`-e`,
//! doubled consonants, …) and keeping the first candidate the vocabulary
//! knows. Without a vocabulary only irregular forms are resolved, since an
//! unchecked suffix strip does more harm (`making` → `mak`) than good.

use crate::dictionaries::irregular_forms::irregular_lemma;
use crate::lexicon::Lexicon;

/// Shortest stem a suffix rule may produce.
const MIN_STEM: usize = 2;

/// Maps lowercase word forms to lemmas.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lemmatizer<'a> {
    vocabulary: Option<&'a Lexicon>,
}

impl<'a> Lemmatizer<'a> {
    /// A lemmatizer that only resolves irregular forms.
    pub const fn new() -> Self {
        Self { vocabulary: None }
    }

    /// Validate suffix-stripped candidates against `vocabulary`.
    pub const fn with_vocabulary(vocabulary: &'a Lexicon) -> Self {
        Self {
            vocabulary: Some(vocabulary),
        }
    }

    /// Whether candidates are checked against a vocabulary.
    pub const fn has_vocabulary(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Whether the vocabulary knows `word`. Always `false` without one.
    pub fn knows(&self, word: &str) -> bool {
        self.vocabulary.is_some_and(|v| v.contains(word))
    }

    /// Lemma of a lowercase word form.
    pub fn lemmatize(&self, lower: &str) -> String {
        if let Some(lemma) = irregular_lemma(lower) {
            return lemma.to_string();
        }
        let Some(vocabulary) = self.vocabulary else {
            return lower.to_string();
        };
        // A listed word is its own lemma, even when a suffix rule would match.
        if vocabulary.contains(lower) {
            return lower.to_string();
        }

        inflection_candidates(lower)
            .into_iter()
            .chain(comparative_candidates(lower))
            .find(|candidate| vocabulary.contains(candidate))
            .unwrap_or_else(|| lower.to_string())
    }
}

/// Stems for plural, third-person, past and progressive endings.
fn inflection_candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(stem) = word.strip_suffix("ies") {
        push_stem(&mut out, format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("es") {
        push_stem(&mut out, stem.to_string());
        push_stem(&mut out, format!("{stem}e"));
    }
    if let Some(stem) = word.strip_suffix('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        push_stem(&mut out, stem.to_string());
    }

    if let Some(stem) = word.strip_suffix("ied") {
        push_stem(&mut out, format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("ed") {
        push_verb_stems(&mut out, stem);
    }
    if let Some(stem) = word.strip_suffix("ing") {
        push_verb_stems(&mut out, stem);
    }

    out
}

/// Stems for `-er`/`-est` adjective forms.
fn comparative_candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();
    for suffix in ["est", "er"] {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if let Some(base) = stem.strip_suffix('i') {
            push_stem(&mut out, format!("{base}y"));
        }
        push_verb_stems(&mut out, stem);
    }
    out
}

/// `stem`, `stem + e` and the undoubled stem (`runn` → `run`).
fn push_verb_stems(out: &mut Vec<String>, stem: &str) {
    push_stem(out, stem.to_string());
    push_stem(out, format!("{stem}e"));
    if let Some(undoubled) = undouble(stem) {
        push_stem(out, undoubled);
    }
}

fn push_stem(out: &mut Vec<String>, stem: String) {
    if stem.chars().count() >= MIN_STEM && !out.contains(&stem) {
        out.push(stem);
    }
}

fn undouble(stem: &str) -> Option<String> {
    let mut chars = stem.chars().rev();
    let last = chars.next()?;
    let prev = chars.next()?;
    if last == prev && !matches!(last, 'a' | 'e' | 'i' | 'o' | 'u' | 'l' | 's' | 'z') {
        let mut out = stem.to_string();
        out.pop();
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Lexicon {
        Lexicon::from_rows([
            ("run", "A1"),
            ("make", "A1"),
            ("city", "A1"),
            ("box", "A1"),
            ("study", "A1"),
            ("walk", "A1"),
            ("glass", "A1"),
            ("big", "A1"),
            ("happy", "A1"),
            ("late", "A1"),
            ("water", "A1"),
            ("bus", "A1"),
        ])
    }

    #[test]
    fn irregular_forms_without_vocabulary() {
        let lemmatizer = Lemmatizer::new();
        assert_eq!(lemmatizer.lemmatize("went"), "go");
        assert_eq!(lemmatizer.lemmatize("making"), "making");
    }

    #[test]
    fn suffix_rules_are_validated() {
        let vocab = vocab();
        let lemmatizer = Lemmatizer::with_vocabulary(&vocab);
        assert_eq!(lemmatizer.lemmatize("running"), "run");
        assert_eq!(lemmatizer.lemmatize("making"), "make");
        assert_eq!(lemmatizer.lemmatize("cities"), "city");
        assert_eq!(lemmatizer.lemmatize("boxes"), "box");
        assert_eq!(lemmatizer.lemmatize("studied"), "study");
        assert_eq!(lemmatizer.lemmatize("walked"), "walk");
        assert_eq!(lemmatizer.lemmatize("glasses"), "glass");
    }

    #[test]
    fn comparatives_only_when_surface_is_unknown() {
        let vocab = vocab();
        let lemmatizer = Lemmatizer::with_vocabulary(&vocab);
        assert_eq!(lemmatizer.lemmatize("bigger"), "big");
        assert_eq!(lemmatizer.lemmatize("happiest"), "happy");
        assert_eq!(lemmatizer.lemmatize("later"), "late");
        assert_eq!(lemmatizer.lemmatize("water"), "water");
    }

    #[test]
    fn protected_endings_are_kept() {
        let vocab = vocab();
        let lemmatizer = Lemmatizer::with_vocabulary(&vocab);
        assert_eq!(lemmatizer.lemmatize("bus"), "bus");
        assert_eq!(lemmatizer.lemmatize("glass"), "glass");
    }

    #[test]
    fn listed_words_keep_their_own_lemma() {
        let vocab = Lexicon::from_rows([
            ("be", "A1"),
            ("bed", "A1"),
            ("the", "A1"),
            ("thing", "A1"),
            ("see", "A1"),
            ("seed", "B1"),
            ("even", "A2"),
            ("evening", "A1"),
        ]);
        let lemmatizer = Lemmatizer::with_vocabulary(&vocab);
        let lemmas: Vec<String> = ["bed", "thing", "seed", "evening"]
            .iter()
            .map(|w| lemmatizer.lemmatize(w))
            .collect();
        assert_eq!(lemmas, ["bed", "thing", "seed", "evening"]);
        assert_eq!(lemmatizer.lemmatize("things"), "thing");
        assert_eq!(lemmatizer.lemmatize("seeing"), "see");
    }

    #[test]
    fn unknown_words_pass_through() {
        let vocab = vocab();
        let lemmatizer = Lemmatizer::with_vocabulary(&vocab);
        assert_eq!(lemmatizer.lemmatize("zephyrs"), "zephyrs");
        assert!(!lemmatizer.knows("zephyr"));
        assert!(lemmatizer.knows("run"));
    }
}
