//! Built-in rule-based annotator.
//!
//! A lightweight stand-in for a statistical NLP pipeline so that plain text
//! can be profiled without an external model:
//!
//! - Regex tokenization into words, numbers, dotted abbreviations and
//!   punctuation. English clitics are split off (`don't` → `do` + `n't`).
//! - Number detection for digits with separators, ordinals and spelled-out
//!   number words.
//! - Lemmatization through [`Lemmatizer`].
//! - Proper-name spans from capitalization: a run of capitalized words that
//!   does not open a sentence is tagged PERSON after a title, GPE after a
//!   locative preposition, ORG when it contains an organization keyword and
//!   PERSON otherwise. A sentence-initial word joins a run only when the
//!   vocabulary does not know it.

use std::sync::LazyLock;

use regex::Regex;

use super::{AnnotatedDoc, AnnotatedToken, Annotator, EntityLabel, EntitySpan, Lemmatizer};
use crate::dictionaries::name_cues::{is_abbreviation, is_locative_preposition, is_title};
use crate::dictionaries::number_words::is_number_word;
use crate::error::AnnotationResult;
use crate::lexicon::Lexicon;

/// Token pattern. Alternatives are tried left to right.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?P<abbr>(?:\p{L}\.){2,})
      | (?P<num>\d+(?:[.,:/]\d+)*(?:st|nd|rd|th)?)
      | (?P<word>\p{L}+(?:['’]\p{L}+)*)
      | (?P<punct>\S)
    ",
    )
    .expect("valid regex")
});

/// Words that mark a capitalized run as an organization.
const ORG_KEYWORDS: &[&str] = &[
    "inc",
    "ltd",
    "corp",
    "company",
    "corporation",
    "university",
    "college",
    "bank",
    "institute",
    "association",
    "agency",
    "council",
    "ministry",
    "department",
];

const OPENING_MARKS: &[&str] = &["\"", "'", "“", "‘", "(", "[", "«"];

/// Regex tokenizer with suffix lemmatization and a capitalization-based
/// proper-name heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnnotator<'a> {
    lemmatizer: Lemmatizer<'a>,
}

/// Token kind before lemmatization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Word,
    Number,
    Punct,
}

/// A raw token plus its layout context.
#[derive(Debug)]
struct Piece {
    text: String,
    kind: Kind,
    sentence_start: bool,
}

impl<'a> RuleAnnotator<'a> {
    /// An annotator without vocabulary validation.
    pub const fn new() -> Self {
        Self {
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// Validate lemmas and sentence-initial names against `vocabulary`.
    pub const fn with_vocabulary(self, vocabulary: &'a Lexicon) -> RuleAnnotator<'a> {
        RuleAnnotator {
            lemmatizer: Lemmatizer::with_vocabulary(vocabulary),
        }
    }

    fn to_token(&self, piece: &Piece) -> AnnotatedToken {
        match piece.kind {
            Kind::Punct => AnnotatedToken::punct(piece.text.as_str()),
            Kind::Number => AnnotatedToken::number(piece.text.as_str()),
            Kind::Word if is_number_word(&piece.text) => {
                let mut token = AnnotatedToken::word(
                    piece.text.as_str(),
                    piece.text.to_lowercase(),
                );
                token.like_num = true;
                token
            }
            Kind::Word => {
                let lower = piece.text.to_lowercase();
                let lemma = clitic_lemma(&lower).map_or_else(
                    || self.lemmatizer.lemmatize(&lower),
                    str::to_string,
                );
                AnnotatedToken::word(piece.text.as_str(), lemma)
            }
        }
    }

    /// Whether a capitalized word at a sentence start is likely a name.
    fn unknown_opener(&self, token: &AnnotatedToken) -> bool {
        self.lemmatizer.has_vocabulary()
            && !self.lemmatizer.knows(&token.text.to_lowercase())
            && !self.lemmatizer.knows(&token.lemma)
    }

    fn find_entities(&self, pieces: &[Piece], tokens: &[AnnotatedToken]) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < pieces.len() {
            if !is_name_word(&pieces[i]) {
                i += 1;
                continue;
            }
            let opener = pieces[i].sentence_start;
            let mut end = i + 1;
            while end < pieces.len() && is_name_word(&pieces[end]) && !pieces[end].sentence_start
            {
                end += 1;
            }

            let mut start = i;
            if opener && !self.unknown_opener(&tokens[i]) {
                start += 1;
            }
            // Titles stay outside the span ("Dr" in "Dr Watson").
            while start < end && is_title(&pieces[start].text) {
                start += 1;
            }

            if start < end {
                let label = classify(pieces, start, end);
                spans.push(EntitySpan::new(label, start, end));
            }
            i = end;
        }
        spans
    }
}

impl Annotator for RuleAnnotator<'_> {
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    fn annotate(&self, text: &str) -> AnnotationResult<AnnotatedDoc> {
        let pieces = split_pieces(text);
        let tokens: Vec<AnnotatedToken> = pieces.iter().map(|p| self.to_token(p)).collect();
        let entities = self.find_entities(&pieces, &tokens);
        tracing::debug!(
            tokens = tokens.len(),
            entities = entities.len(),
            "annotated text"
        );
        AnnotatedDoc::new(tokens, entities)
    }
}

/// Tokenize and mark sentence starts.
fn split_pieces(text: &str) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = Vec::new();
    let mut at_start = true;
    let mut last_end = 0;

    for caps in TOKEN_PATTERN.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if text[last_end..m.start()].contains("\n\n") {
            at_start = true;
        }
        last_end = m.end();

        if caps.name("punct").is_some() {
            let mark = m.as_str();
            match mark {
                "." => {
                    let after_abbreviation = pieces
                        .last()
                        .is_some_and(|p| p.kind == Kind::Word && is_abbreviation(&p.text));
                    at_start = !after_abbreviation;
                }
                "!" | "?" | "…" => at_start = true,
                open if OPENING_MARKS.contains(&open) => {}
                _ => at_start = false,
            }
            pieces.push(Piece {
                text: mark.to_string(),
                kind: Kind::Punct,
                sentence_start: false,
            });
            continue;
        }

        let kind = if caps.name("num").is_some() {
            Kind::Number
        } else {
            Kind::Word
        };
        let sentence_start = at_start;
        at_start = false;

        if kind == Kind::Word && caps.name("word").is_some() {
            for (i, part) in split_clitics(m.as_str()).into_iter().enumerate() {
                pieces.push(Piece {
                    text: part.to_string(),
                    kind,
                    sentence_start: sentence_start && i == 0,
                });
            }
        } else {
            pieces.push(Piece {
                text: m.as_str().to_string(),
                kind,
                sentence_start,
            });
        }
    }
    pieces
}

/// Split `don't` → `do`, `n't` and `she'll` → `she`, `'ll`.
fn split_clitics(word: &str) -> Vec<&str> {
    for negation in ["n't", "n’t"] {
        if let Some(cut) = word.len().checked_sub(negation.len())
            && cut > 0
            && word
                .get(cut..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(negation))
        {
            return vec![&word[..cut], &word[cut..]];
        }
    }
    match word.rfind(['\'', '’']) {
        Some(pos) if pos > 0 => vec![&word[..pos], &word[pos..]],
        _ => vec![word],
    }
}

/// Lemma of a split-off clitic or contracted stem.
fn clitic_lemma(lower: &str) -> Option<&'static str> {
    let normalized = lower.replace('’', "'");
    Some(match normalized.as_str() {
        "n't" => "not",
        "'re" | "'m" => "be",
        "'ll" => "will",
        "'ve" => "have",
        "'d" => "would",
        "'s" => "'s",
        "ca" => "can",
        "wo" => "will",
        "sha" => "shall",
        _ => return None,
    })
}

/// A word that could belong to a proper name.
fn is_name_word(piece: &Piece) -> bool {
    piece.kind == Kind::Word
        && piece.text != "I"
        && piece.text.chars().next().is_some_and(char::is_uppercase)
        && !piece.text.contains(['\'', '’'])
}

fn classify(pieces: &[Piece], start: usize, end: usize) -> EntityLabel {
    // Look past the period of an abbreviated title ("Dr. Watson").
    let before = pieces[..start]
        .iter()
        .rev()
        .find(|p| p.text != ".")
        .map(|p| p.text.as_str());
    if before.is_some_and(is_title) {
        return EntityLabel::Person;
    }
    if pieces[start..end]
        .iter()
        .any(|p| ORG_KEYWORDS.contains(&p.text.to_lowercase().as_str()))
    {
        return EntityLabel::Org;
    }
    if before.is_some_and(is_locative_preposition) {
        return EntityLabel::Gpe;
    }
    EntityLabel::Person
}
