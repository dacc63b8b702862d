//! CEFR vocabulary profiling.
//!
//! [`analyze`] turns an [`AnnotatedDoc`] into a [`CefrReport`] in four steps:
//!
//! 1. Tokens inside proper-name entity spans are set aside.
//! 2. Punctuation, whitespace, numbers and non-words are filtered out,
//!    leaving `(surface, lemma)` word occurrences.
//! 3. Each occurrence is classified by its lemma, falling back to its surface
//!    form, or counted as Unknown.
//! 4. Counts become percentages, a weighted difficulty score and a primary
//!    level (see [`CefrLevel::from_score`]).
//!
//! The computation is pure: the same document and lexicon always produce the
//! same report, and an empty document yields an all-zero report rather than
//! an error.

use std::collections::{BTreeSet, HashSet};

use schemars::JsonSchema;
use unicode_normalization::char::is_combining_mark;
use serde::{Deserialize, Serialize};

use crate::annotate::{AnnotatedDoc, AnnotatedToken, Annotator};
use crate::error::AnnotationResult;
use crate::level::CefrLevel;
use crate::lexicon::Lexicon;

/// Default cap on `sample_unknown_words`.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Single-letter lemmas that are real English words.
const SINGLE_LETTER_WORDS: &[&str] = &["a", "i"];

/// Tuning knobs for [`analyze_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Maximum number of unknown words listed in the report.
    pub sample_size: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Statistics for one distribution bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    /// Word occurrences in this bucket.
    pub count: usize,
    /// Share of all counted words, in percent (two decimals).
    pub percentage: f64,
    /// Distinct lemmas in this bucket.
    pub unique_words: usize,
}

/// Per-level statistics plus the Unknown bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Distribution {
    /// A1 words.
    #[serde(rename = "A1")]
    pub a1: BucketStats,
    /// A2 words.
    #[serde(rename = "A2")]
    pub a2: BucketStats,
    /// B1 words.
    #[serde(rename = "B1")]
    pub b1: BucketStats,
    /// B2 words.
    #[serde(rename = "B2")]
    pub b2: BucketStats,
    /// C1 words.
    #[serde(rename = "C1")]
    pub c1: BucketStats,
    /// C2 words.
    #[serde(rename = "C2")]
    pub c2: BucketStats,
    /// Words not found in the lexicon.
    #[serde(rename = "Unknown")]
    pub unknown: BucketStats,
}

impl Distribution {
    /// Statistics for one level.
    pub const fn level(&self, level: CefrLevel) -> &BucketStats {
        match level {
            CefrLevel::A1 => &self.a1,
            CefrLevel::A2 => &self.a2,
            CefrLevel::B1 => &self.b1,
            CefrLevel::B2 => &self.b2,
            CefrLevel::C1 => &self.c1,
            CefrLevel::C2 => &self.c2,
        }
    }

    const fn level_mut(&mut self, level: CefrLevel) -> &mut BucketStats {
        match level {
            CefrLevel::A1 => &mut self.a1,
            CefrLevel::A2 => &mut self.a2,
            CefrLevel::B1 => &mut self.b1,
            CefrLevel::B2 => &mut self.b2,
            CefrLevel::C1 => &mut self.c1,
            CefrLevel::C2 => &mut self.c2,
        }
    }

    /// All seven buckets with their labels, easiest first, Unknown last.
    pub fn buckets(&self) -> [(&'static str, &BucketStats); 7] {
        [
            ("A1", &self.a1),
            ("A2", &self.a2),
            ("B1", &self.b1),
            ("B2", &self.b2),
            ("C1", &self.c1),
            ("C2", &self.c2),
            ("Unknown", &self.unknown),
        ]
    }
}

/// Vocabulary profile of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CefrReport {
    /// Word occurrences that survived filtering.
    pub total_words: usize,
    /// Distinct lemmas among them.
    pub unique_words: usize,
    /// Occurrences found in the lexicon.
    pub known_words_count: usize,
    /// Occurrences not found in the lexicon.
    pub unknown_words_count: usize,
    /// Unknown share of all words, in percent (two decimals).
    pub unknown_words_ratio: f64,
    /// Per-bucket statistics.
    pub distribution: Distribution,
    /// Weighted mean level of known words (A1 = 1 … C2 = 6), two decimals.
    pub difficulty_score: f64,
    /// Level the difficulty score falls into.
    pub primary_level: CefrLevel,
    /// Alphabetically first unknown lemmas.
    pub sample_unknown_words: Vec<String>,
}

impl CefrReport {
    /// Whether the primary level is harder than `max`.
    pub fn exceeds(&self, max: CefrLevel) -> bool {
        self.primary_level > max
    }
}

/// A filtered word: lowercase surface form and lowercase lemma.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WordOccurrence {
    surface: String,
    lemma: String,
}

/// Running counts while classifying occurrences.
#[derive(Debug, Default)]
struct Tally {
    counts: [usize; 6],
    distinct: [HashSet<String>; 6],
    unknown: usize,
    unknown_words: BTreeSet<String>,
    all_lemmas: HashSet<String>,
    total: usize,
}

impl Tally {
    fn record(&mut self, word: WordOccurrence, lexicon: &Lexicon) {
        self.total += 1;
        self.all_lemmas.insert(word.lemma.clone());

        let level = lexicon
            .get(&word.lemma)
            .or_else(|| lexicon.get(&word.surface));
        match level {
            Some(level) => {
                self.counts[level.index()] += 1;
                self.distinct[level.index()].insert(word.lemma);
            }
            None => {
                self.unknown += 1;
                self.unknown_words.insert(word.lemma);
            }
        }
    }

    fn into_report(self, sample_size: usize) -> CefrReport {
        let mut distribution = Distribution::default();
        for level in CefrLevel::ALL {
            let count = self.counts[level.index()];
            *distribution.level_mut(level) = BucketStats {
                count,
                percentage: percent(count, self.total),
                unique_words: self.distinct[level.index()].len(),
            };
        }
        distribution.unknown = BucketStats {
            count: self.unknown,
            percentage: percent(self.unknown, self.total),
            unique_words: self.unknown_words.len(),
        };

        let known = self.total - self.unknown;
        let weighted_sum: usize = CefrLevel::ALL
            .iter()
            .map(|level| self.counts[level.index()] * level.weight() as usize)
            .sum();
        let difficulty_score = if known == 0 {
            0.0
        } else {
            round2(weighted_sum as f64 / known as f64)
        };

        CefrReport {
            total_words: self.total,
            unique_words: self.all_lemmas.len(),
            known_words_count: known,
            unknown_words_count: self.unknown,
            unknown_words_ratio: percent(self.unknown, self.total),
            distribution,
            difficulty_score,
            primary_level: CefrLevel::from_score(difficulty_score),
            sample_unknown_words: self.unknown_words.into_iter().take(sample_size).collect(),
        }
    }
}

/// Profile an annotated document with default options.
pub fn analyze(doc: &AnnotatedDoc, lexicon: &Lexicon) -> CefrReport {
    analyze_with(doc, lexicon, &AnalyzeOptions::default())
}

/// Profile an annotated document.
#[tracing::instrument(skip_all, fields(tokens = doc.tokens.len(), lexicon = lexicon.len()))]
pub fn analyze_with(doc: &AnnotatedDoc, lexicon: &Lexicon, options: &AnalyzeOptions) -> CefrReport {
    let excluded = doc.proper_name_indices();

    let mut tally = Tally::default();
    for (index, token) in doc.tokens.iter().enumerate() {
        if excluded.contains(&index) {
            continue;
        }
        if let Some(word) = word_occurrence(token) {
            tally.record(word, lexicon);
        }
    }

    let report = tally.into_report(options.sample_size);
    tracing::debug!(
        total_words = report.total_words,
        unknown = report.unknown_words_count,
        excluded_names = excluded.len(),
        difficulty = report.difficulty_score,
        primary_level = %report.primary_level,
        "profiled document"
    );
    report
}

/// Annotate raw text and profile it.
pub fn analyze_text<A: Annotator + ?Sized>(
    text: &str,
    annotator: &A,
    lexicon: &Lexicon,
    options: &AnalyzeOptions,
) -> AnnotationResult<CefrReport> {
    let doc = annotator.annotate(text)?;
    Ok(analyze_with(&doc, lexicon, options))
}

/// Apply the token filters; `None` means the token is not counted.
fn word_occurrence(token: &AnnotatedToken) -> Option<WordOccurrence> {
    if token.is_punct || token.is_space || token.is_digit || token.like_num {
        return None;
    }

    let lemma = token.lemma.trim().to_lowercase();
    let surface = token.text.trim().to_lowercase();

    if lemma.chars().count() < 2 && !SINGLE_LETTER_WORDS.contains(&lemma.as_str()) {
        return None;
    }
    if lemma.is_empty() || !lemma.chars().all(is_letter) {
        return None;
    }

    Some(WordOccurrence { surface, lemma })
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}

/// Letters in the general-category sense (Lu, Ll, Lt, Lm, Lo).
///
/// `char::is_alphabetic` also admits letter numbers, combining marks and
/// enclosed letters, none of which count as word characters here.
fn is_letter(c: char) -> bool {
    c.is_alphabetic()
        && !c.is_numeric()
        && !is_combining_mark(c)
        && !matches!(c, '\u{24B6}'..='\u{24E9}' | '\u{1F130}'..='\u{1F189}')
}

/// Round to two decimals, sending exact ties to the even digit.
///
/// Formatting rounds the exact binary value, so `2.625` becomes `2.62` and
/// `2.675` (stored just below the tie) becomes `2.67`.
fn round2(v: f64) -> f64 {
    format!("{v:.2}").parse().unwrap_or(v)
}
