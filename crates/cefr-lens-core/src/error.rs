//! Error types for cefr-lens-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a CEFR lexicon.
///
/// Only whole-source failures are reported here. Individual malformed rows
/// are skipped by the builder and never surface as errors.
#[derive(Error, Debug)]
pub enum LexiconError {
    /// No lexicon file exists at any of the candidate locations.
    #[error("CEFR vocabulary file not found (searched: {})", display_paths(.candidates))]
    NotFound {
        /// Every path that was checked, in search order.
        candidates: Vec<Utf8PathBuf>,
    },

    /// The lexicon file could not be opened.
    #[error("failed to open lexicon {path}")]
    Open {
        /// Path of the lexicon source.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The lexicon source is not valid CSV.
    #[error("failed to parse lexicon {path}")]
    Csv {
        /// Path (or label) of the lexicon source.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A required column is missing from the header row.
    #[error("lexicon {path} has no `{column}` column")]
    MissingColumn {
        /// Path (or label) of the lexicon source.
        path: Utf8PathBuf,
        /// The column that was expected.
        column: String,
    },
}

/// Result type alias using [`LexiconError`].
pub type LexiconResult<T> = Result<T, LexiconError>;

/// Errors raised by an [`Annotator`](crate::annotate::Annotator).
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// The annotation backend could not be initialized (e.g. model missing).
    #[error("annotator unavailable: {0}")]
    Unavailable(String),

    /// A pre-annotated document could not be decoded.
    #[error("malformed annotation document")]
    Malformed {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An entity span points outside the token list.
    #[error("entity span {start}..{end} is outside the {len} annotated tokens")]
    SpanOutOfRange {
        /// First token index of the span.
        start: usize,
        /// One past the last token index of the span.
        end: usize,
        /// Number of tokens in the document.
        len: usize,
    },
}

/// Result type alias using [`AnnotationError`].
pub type AnnotationResult<T> = Result<T, AnnotationError>;

fn display_paths(paths: &[Utf8PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidates".to_string();
    }
    paths
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_candidates() {
        let err = LexiconError::NotFound {
            candidates: vec![Utf8PathBuf::from("a.csv"), Utf8PathBuf::from("b/a.csv")],
        };
        assert_eq!(
            err.to_string(),
            "CEFR vocabulary file not found (searched: a.csv, b/a.csv)"
        );
    }

    #[test]
    fn not_found_without_candidates() {
        let err = LexiconError::NotFound { candidates: vec![] };
        assert!(err.to_string().contains("no candidates"));
    }

    #[test]
    fn missing_column_names_column() {
        let err = LexiconError::MissingColumn {
            path: Utf8PathBuf::from("vocab.csv"),
            column: "CEFR".to_string(),
        };
        assert_eq!(err.to_string(), "lexicon vocab.csv has no `CEFR` column");
    }
}
