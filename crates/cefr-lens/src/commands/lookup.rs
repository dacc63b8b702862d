//! Lookup command: CEFR level of individual words.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use cefr_lens_core::annotate::Lemmatizer;
use cefr_lens_core::config::Config;
use cefr_lens_core::lexicon::normalize_headword;
use cefr_lens_core::{CefrLevel, Lexicon};

use super::load_lexicon;

/// Arguments for the `lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Words to look up.
    #[arg(required = true)]
    pub words: Vec<String>,

    /// CEFR vocabulary CSV (default: search the resources folders).
    #[arg(long, visible_alias = "cefr", value_name = "CSV")]
    pub lexicon: Option<Utf8PathBuf>,
}

/// Level of one looked-up word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordLevel {
    /// The word as given.
    pub word: String,
    /// Dictionary form used for the lookup.
    pub lemma: String,
    /// Level, or `None` when the lexicon does not list the word.
    pub level: Option<CefrLevel>,
}

/// Look up words the way the analyzer does: lemma first, then the word itself.
pub fn lookup_words<S: AsRef<str>>(lexicon: &Lexicon, words: &[S]) -> Vec<WordLevel> {
    let lemmatizer = Lemmatizer::with_vocabulary(lexicon);
    words
        .iter()
        .map(|word| {
            let word = word.as_ref();
            let normalized = normalize_headword(word);
            let lemma = lemmatizer.lemmatize(&normalized);
            let level = lexicon.get(&lemma).or_else(|| lexicon.get(&normalized));
            WordLevel {
                word: word.to_string(),
                lemma,
                level,
            }
        })
        .collect()
}

/// Print the CEFR level of each word.
#[instrument(name = "cmd_lookup", skip_all, fields(words = args.words.len()))]
pub fn cmd_lookup(
    args: LookupArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(words = ?args.words, "executing lookup command");

    let lexicon = load_lexicon(args.lexicon.as_deref(), config, cwd)?;
    let results = lookup_words(&lexicon, &args.words);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let width = results.iter().map(|r| r.word.len()).max().unwrap_or(0);
    for result in &results {
        let level = result
            .level
            .map_or_else(|| "unknown".dimmed().to_string(), |l| l.bold().to_string());
        if result.lemma == normalize_headword(&result.word) {
            println!("{:<width$}  {}", result.word, level);
        } else {
            println!(
                "{:<width$}  {}  {}",
                result.word,
                level,
                format!("({})", result.lemma).dimmed()
            );
        }
    }
    Ok(())
}
