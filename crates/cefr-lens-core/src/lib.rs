//! Core library for cefr-lens.
//!
//! This crate classifies the vocabulary of English text against the CEFR
//! proficiency scale (A1–C2) and produces a [`CefrReport`]: per-level counts,
//! percentages, an aggregate difficulty score and a primary level.
//!
//! # Modules
//!
//! - [`level`] - The six CEFR levels and the difficulty policy
//! - [`lexicon`] - Headword → level table built from a CSV source
//! - [`annotate`] - Annotated token model and the [`Annotator`] seam
//! - [`profile`] - The classification engine
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use cefr_lens_core::{Annotator, Lexicon, RuleAnnotator, profile};
//!
//! let lexicon = Lexicon::from_path("resources/cefrj-vocabulary-profile-1.5.csv")
//!     .expect("Failed to load lexicon");
//! let doc = RuleAnnotator::new()
//!     .with_vocabulary(&lexicon)
//!     .annotate("The quick brown fox jumps over the lazy dog.")
//!     .expect("Failed to annotate");
//!
//! let report = profile::analyze(&doc, &lexicon);
//! println!("Primary level: {}", report.primary_level);
//! ```
#![deny(unsafe_code)]

pub mod annotate;
pub mod config;
pub mod dictionaries;
pub mod error;
pub mod level;
pub mod lexicon;
pub mod profile;

pub use annotate::{AnnotatedDoc, AnnotatedToken, Annotator, EntityLabel, EntitySpan, RuleAnnotator};
pub use config::{Config, ConfigLoader, LogLevel};
pub use error::{
    AnnotationError, AnnotationResult, ConfigError, ConfigResult, LexiconError, LexiconResult,
};
pub use level::CefrLevel;
pub use lexicon::Lexicon;
pub use profile::{AnalyzeOptions, BucketStats, CefrReport, Distribution};

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
