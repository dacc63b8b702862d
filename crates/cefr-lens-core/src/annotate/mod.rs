//! Annotated token model and the annotator seam.
//!
//! The classification engine never tokenizes or lemmatizes text itself. It
//! consumes an [`AnnotatedDoc`] produced by an [`Annotator`]: either the
//! built-in [`RuleAnnotator`], or a document annotated elsewhere (for
//! example by spaCy) and decoded with [`AnnotatedDoc::from_json`].
//!
//! # JSON layout
//!
//! ```json
//! {
//!   "tokens": [
//!     {"text": "John", "lemma": "John"},
//!     {"text": "ran", "lemma": "run"},
//!     {"text": ".", "lemma": ".", "is_punct": true}
//!   ],
//!   "entities": [{"label": "PERSON", "start": 0, "end": 1}]
//! }
//! ```
//!
//! Flags default to `false`, a missing lemma defaults to the token text, and
//! entity ranges are half-open token indices.

mod lemma;
mod rules;

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnnotationError, AnnotationResult};

pub use lemma::Lemmatizer;
pub use rules::RuleAnnotator;

/// Turns raw text into annotated tokens and entity spans.
///
/// Implementations own any model loading; a missing model is reported as
/// [`AnnotationError::Unavailable`].
pub trait Annotator {
    /// Annotate a full document.
    fn annotate(&self, text: &str) -> AnnotationResult<AnnotatedDoc>;
}

/// One token as seen by the annotator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedToken {
    /// Surface text as it appeared in the document.
    pub text: String,
    /// Dictionary form of the token.
    #[serde(default)]
    pub lemma: String,
    /// Punctuation mark.
    #[serde(default)]
    pub is_punct: bool,
    /// Whitespace-only token.
    #[serde(default)]
    pub is_space: bool,
    /// Consists of ASCII digits only.
    #[serde(default)]
    pub is_digit: bool,
    /// Looks like a number (`3.14`, `1,000`, `seven`, `1st`).
    #[serde(default)]
    pub like_num: bool,
}

impl AnnotatedToken {
    /// A word token with its lemma.
    pub fn word(text: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            ..Self::default()
        }
    }

    /// A punctuation token.
    pub fn punct(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            lemma: text.clone(),
            text,
            is_punct: true,
            ..Self::default()
        }
    }

    /// A whitespace token.
    pub fn space(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            lemma: text.clone(),
            text,
            is_space: true,
            ..Self::default()
        }
    }

    /// A number-like token; `is_digit` is derived from the text.
    pub fn number(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            lemma: text.clone(),
            is_digit: !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()),
            like_num: true,
            text,
            ..Self::default()
        }
    }
}

/// Named-entity category, using the OntoNotes tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    /// People, including fictional.
    Person,
    /// Nationalities or religious or political groups.
    Norp,
    /// Buildings, airports, highways, bridges.
    Fac,
    /// Companies, agencies, institutions.
    Org,
    /// Countries, cities, states.
    Gpe,
    /// Non-GPE locations, mountain ranges, bodies of water.
    Loc,
    /// Objects, vehicles, foods (not services).
    Product,
    /// Named hurricanes, battles, wars, sports events.
    Event,
    /// Titles of books, songs.
    WorkOfArt,
    /// Named documents made into laws.
    Law,
    /// Any named language.
    Language,
    /// Absolute or relative dates or periods.
    Date,
    /// Times smaller than a day.
    Time,
    /// Percentage.
    Percent,
    /// Monetary values.
    Money,
    /// Measurements.
    Quantity,
    /// "first", "second", etc.
    Ordinal,
    /// Numerals that do not fall under another type.
    Cardinal,
    /// Any label outside the tag set.
    #[serde(other)]
    Other,
}

impl EntityLabel {
    /// Whether tokens in a span with this label are excluded from counting.
    ///
    /// Proper names of people, places, organizations, facilities, groups and
    /// events say nothing about vocabulary difficulty.
    pub const fn is_proper_name(&self) -> bool {
        matches!(
            self,
            Self::Person | Self::Gpe | Self::Org | Self::Loc | Self::Fac | Self::Norp | Self::Event
        )
    }
}

/// A named-entity span over token indices `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntitySpan {
    /// Entity category.
    pub label: EntityLabel,
    /// First token index.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
}

impl EntitySpan {
    /// Create a span.
    pub const fn new(label: EntityLabel, start: usize, end: usize) -> Self {
        Self { label, start, end }
    }
}

/// Annotator output: the token sequence plus entity spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedDoc {
    /// Tokens in document order.
    pub tokens: Vec<AnnotatedToken>,
    /// Named-entity spans.
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl AnnotatedDoc {
    /// Create a document, checking that every span lies within the tokens.
    pub fn new(tokens: Vec<AnnotatedToken>, entities: Vec<EntitySpan>) -> AnnotationResult<Self> {
        let doc = Self { tokens, entities };
        doc.validate()?;
        Ok(doc)
    }

    /// Decode a pre-annotated document from JSON.
    #[tracing::instrument(skip_all, fields(input_len = json.len()))]
    pub fn from_json(json: &str) -> AnnotationResult<Self> {
        let mut doc: Self =
            serde_json::from_str(json).map_err(|source| AnnotationError::Malformed { source })?;
        for token in &mut doc.tokens {
            if token.lemma.is_empty() {
                token.lemma.clone_from(&token.text);
            }
        }
        doc.validate()?;
        tracing::debug!(
            tokens = doc.tokens.len(),
            entities = doc.entities.len(),
            "decoded annotated document"
        );
        Ok(doc)
    }

    /// Check that every entity span is a valid range over the tokens.
    pub fn validate(&self) -> AnnotationResult<()> {
        let len = self.tokens.len();
        for span in &self.entities {
            if span.start > span.end || span.end > len {
                return Err(AnnotationError::SpanOutOfRange {
                    start: span.start,
                    end: span.end,
                    len,
                });
            }
        }
        Ok(())
    }

    /// Indices of tokens covered by a proper-name entity span.
    pub fn proper_name_indices(&self) -> HashSet<usize> {
        self.entities
            .iter()
            .filter(|span| span.label.is_proper_name())
            .flat_map(|span| span.start..span.end.min(self.tokens.len()))
            .collect()
    }
}
