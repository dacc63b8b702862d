//! CEFR lexicon: a headword → level table.
//!
//! The lexicon is built once from a tabular source (a CSV file with a
//! header row) and is read-only afterwards, so a single instance can be
//! shared across threads.
//!
//! # Normalization rules
//!
//! - Headwords are trimmed and lowercased.
//! - Level labels are trimmed and uppercased; only A1..C2 are kept.
//! - A headword listing variants separated by `/` (e.g. `a.m./A.M./am/AM`)
//!   produces one entry per non-empty variant.
//! - When a key is seen more than once, the first level wins. Row order of
//!   the source is significant.
//! - Malformed rows are skipped; only an unreadable source is an error.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{LexiconError, LexiconResult};
use crate::level::CefrLevel;

/// File name of the bundled CEFR-J vocabulary profile.
pub const DEFAULT_LEXICON_FILE: &str = "cefrj-vocabulary-profile-1.5.csv";

/// Separator between headword variants in a single source row.
const VARIANT_DELIMITER: char = '/';

/// Column names to read from a lexicon CSV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LexiconColumns {
    /// Column holding the headword.
    pub headword: String,
    /// Column holding the CEFR level label.
    pub level: String,
}

impl Default for LexiconColumns {
    fn default() -> Self {
        Self {
            headword: "headword".to_string(),
            level: "CEFR".to_string(),
        }
    }
}

/// Immutable mapping from normalized word to CEFR level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: HashMap<String, CefrLevel>,
}

impl Lexicon {
    /// Start an empty builder.
    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::default()
    }

    /// Build a lexicon from `(headword, level label)` rows in source order.
    pub fn from_rows<I, H, L>(rows: I) -> Self
    where
        I: IntoIterator<Item = (H, L)>,
        H: AsRef<str>,
        L: AsRef<str>,
    {
        let mut builder = Self::builder();
        for (headword, label) in rows {
            builder.push_row(headword.as_ref(), label.as_ref());
        }
        builder.build()
    }

    /// Load a lexicon CSV from disk using the default column names.
    pub fn from_path<P: AsRef<Utf8Path>>(path: P) -> LexiconResult<Self> {
        Self::from_path_with_columns(path, &LexiconColumns::default())
    }

    /// Load a lexicon CSV from disk.
    #[tracing::instrument(skip(columns), fields(path = %path.as_ref()))]
    pub fn from_path_with_columns<P: AsRef<Utf8Path>>(
        path: P,
        columns: &LexiconColumns,
    ) -> LexiconResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path.as_std_path()).map_err(|source| LexiconError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_csv_reader(file, columns, path)?;
        tracing::debug!(entries = lexicon.len(), path = %path, "lexicon loaded");
        Ok(lexicon)
    }

    /// Read a lexicon from any CSV byte stream.
    ///
    /// `source` only labels errors; nothing is read from it.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        columns: &LexiconColumns,
        source: &Utf8Path,
    ) -> LexiconResult<Self> {
        let csv_error = |e: csv::Error| LexiconError::Csv {
            path: source.to_path_buf(),
            source: e,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| LexiconError::MissingColumn {
                    path: source.to_path_buf(),
                    column: name.to_string(),
                })
        };
        let headword_idx = position(&columns.headword)?;
        let level_idx = position(&columns.level)?;

        let mut builder = Self::builder();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            // Short rows read as empty fields and are dropped by the builder.
            let headword = record.get(headword_idx).unwrap_or_default();
            let label = record.get(level_idx).unwrap_or_default();
            builder.push_row(headword, label);
        }

        let skipped_rows = builder.skipped_rows();
        let lexicon = builder.build();
        tracing::debug!(entries = lexicon.len(), skipped_rows, "lexicon parsed");
        Ok(lexicon)
    }

    /// Level for an already-normalized key.
    pub fn get(&self, key: &str) -> Option<CefrLevel> {
        self.entries.get(key).copied()
    }

    /// Level for a free-form word, normalized the same way as headwords.
    pub fn lookup(&self, word: &str) -> Option<CefrLevel> {
        self.get(&normalize_headword(word))
    }

    /// Whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys mapped to each level, indexed like [`CefrLevel::ALL`].
    pub fn level_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for level in self.entries.values() {
            counts[level.index()] += 1;
        }
        counts
    }

    /// Iterate over `(key, level)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CefrLevel)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Incremental lexicon construction with first-seen-wins insertion.
#[derive(Debug, Default)]
pub struct LexiconBuilder {
    entries: HashMap<String, CefrLevel>,
    skipped: usize,
}

impl LexiconBuilder {
    /// Add one source row, expanding `/`-separated variants.
    ///
    /// Rows with an empty headword or an invalid level label are skipped.
    pub fn push_row(&mut self, headword: &str, label: &str) -> &mut Self {
        let headword = normalize_headword(headword);
        let Some(level) = CefrLevel::from_label(label) else {
            self.skipped += 1;
            return self;
        };
        if headword.is_empty() {
            self.skipped += 1;
            return self;
        }

        if headword.contains(VARIANT_DELIMITER) {
            for variant in headword.split(VARIANT_DELIMITER) {
                let variant = variant.trim();
                if !variant.is_empty() {
                    self.insert_if_absent(variant, level);
                }
            }
        } else {
            self.insert_if_absent(&headword, level);
        }
        self
    }

    /// Insert `key` unless it already has a level. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, key: &str, level: CefrLevel) -> bool {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(level);
                true
            }
        }
    }

    /// Rows dropped so far for an empty headword or unknown level.
    pub const fn skipped_rows(&self) -> usize {
        self.skipped
    }

    /// Finish building.
    pub fn build(self) -> Lexicon {
        Lexicon {
            entries: self.entries,
        }
    }
}

/// Normalize a headword or lookup word: trim, then lowercase.
pub fn normalize_headword(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Return the first candidate path that exists as a file.
#[tracing::instrument(skip_all, fields(candidates = candidates.len()))]
pub fn resolve_path(candidates: &[Utf8PathBuf]) -> LexiconResult<Utf8PathBuf> {
    for candidate in candidates {
        tracing::debug!(path = %candidate, "checking lexicon candidate");
        if candidate.is_file() {
            return Ok(candidate.clone());
        }
    }
    Err(LexiconError::NotFound {
        candidates: candidates.to_vec(),
    })
}

/// Default lexicon search locations, in order.
///
/// 1. `<exe_dir>/../resources/<file>`
/// 2. `<exe_dir>/resources/<file>`
/// 3. `<cwd>/resources/<file>`
/// 4. `<data_dir>/<file>` (platform user data directory)
pub fn default_candidates(
    exe_dir: Option<&Utf8Path>,
    cwd: &Utf8Path,
    data_dir: Option<&Utf8Path>,
) -> Vec<Utf8PathBuf> {
    let mut candidates = Vec::new();
    if let Some(exe_dir) = exe_dir {
        if let Some(parent) = exe_dir.parent() {
            candidates.push(parent.join("resources").join(DEFAULT_LEXICON_FILE));
        }
        candidates.push(exe_dir.join("resources").join(DEFAULT_LEXICON_FILE));
    }
    candidates.push(cwd.join("resources").join(DEFAULT_LEXICON_FILE));
    if let Some(data_dir) = data_dir {
        candidates.push(data_dir.join(DEFAULT_LEXICON_FILE));
    }
    candidates
}
