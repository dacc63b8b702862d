//! Dictionaries for the built-in annotator.
//!
//! Provides curated word sets used for lemmatization, number detection and
//! proper-name spotting.

pub mod irregular_forms;
pub mod name_cues;
pub mod number_words;
