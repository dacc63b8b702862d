//! Analyze command: CEFR vocabulary profile of a text file.

use std::fmt;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use cefr_lens_core::annotate::{AnnotatedDoc, Annotator, RuleAnnotator};
use cefr_lens_core::config::Config;
use cefr_lens_core::profile::{self, CefrReport};
use cefr_lens_core::{CefrLevel, Lexicon};

use super::{load_lexicon, read_input_file};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text file to analyze (or annotated JSON with `--annotations`).
    pub file: Utf8PathBuf,

    /// CEFR vocabulary CSV (default: search the resources folders).
    #[arg(long, visible_alias = "cefr", value_name = "CSV")]
    pub lexicon: Option<Utf8PathBuf>,

    /// Treat FILE as a pre-annotated JSON document instead of raw text.
    #[arg(long)]
    pub annotations: bool,

    /// Fail when the primary level is above this level.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub max_level: Option<CefrLevel>,

    /// Maximum number of unknown words to list.
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,
}

/// The primary level is above the configured maximum.
///
/// Returned after the report has been printed, so callers in JSON mode can
/// exit non-zero without printing a second document.
#[derive(Debug)]
pub struct LevelGateExceeded {
    /// File that was analyzed.
    pub file: Utf8PathBuf,
    /// Primary level of the file.
    pub level: CefrLevel,
    /// Highest acceptable level.
    pub max: CefrLevel,
}

impl fmt::Display for LevelGateExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is at level {} (max: {}). Replace harder vocabulary or raise --max-level.",
            self.file, self.level, self.max
        )
    }
}

impl std::error::Error for LevelGateExceeded {}

/// JSON output: the report plus run metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    #[serde(flatten)]
    report: &'a CefrReport,
    cefr_dictionary_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_level: Option<CefrLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    within_max_level: Option<bool>,
}

/// Profile the vocabulary of a file.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        file = %args.file,
        annotations = args.annotations,
        max_level = ?args.max_level,
        "executing analyze command"
    );

    let lexicon = load_lexicon(args.lexicon.as_deref(), config, cwd)?;
    let content = read_input_file(&args.file, max_input_bytes)?;

    let doc = annotate(&content, args.annotations, &lexicon)
        .with_context(|| format!("failed to annotate {}", args.file))?;

    let mut options = config.analyze_options();
    if let Some(sample_size) = args.sample_size {
        options.sample_size = sample_size;
    }
    let report = profile::analyze_with(&doc, &lexicon, &options);

    let max_level = args.max_level.or(config.max_level);
    let within = max_level.map(|max| !report.exceeds(max));

    if global_json {
        let output = AnalyzeOutput {
            report: &report,
            cefr_dictionary_size: lexicon.len(),
            max_level,
            within_max_level: within,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&args.file, &report, lexicon.len());
    }

    if let Some(max) = max_level
        && report.exceeds(max)
    {
        return Err(LevelGateExceeded {
            file: args.file,
            level: report.primary_level,
            max,
        }
        .into());
    }
    if let Some(max) = max_level
        && !global_json
    {
        println!(
            "\n{} {} is within {} (primary level {})",
            "PASS:".green(),
            args.file,
            max,
            report.primary_level,
        );
    }

    Ok(())
}

fn annotate(content: &str, pre_annotated: bool, lexicon: &Lexicon) -> anyhow::Result<AnnotatedDoc> {
    let doc = if pre_annotated {
        AnnotatedDoc::from_json(content)?
    } else {
        RuleAnnotator::new()
            .with_vocabulary(lexicon)
            .annotate(content)?
    };
    Ok(doc)
}

fn print_summary(file: &Utf8Path, report: &CefrReport, dictionary_size: usize) {
    println!("{}", file.bold());
    println!(
        "\n  {} {} (difficulty {:.2})",
        "Primary level:".cyan(),
        paint_level(report.primary_level),
        report.difficulty_score,
    );
    println!(
        "  {} {} total, {} unique, {} known, {} unknown ({:.2}%)",
        "Words:".cyan(),
        report.total_words,
        report.unique_words,
        report.known_words_count,
        report.unknown_words_count,
        report.unknown_words_ratio,
    );

    println!("\n  {}", "Distribution:".cyan());
    for (label, bucket) in report.distribution.buckets() {
        println!(
            "    {:<8} {:>6} {:>7.2}%  {}  ({} unique)",
            label,
            bucket.count,
            bucket.percentage,
            bar(bucket.percentage).dimmed(),
            bucket.unique_words,
        );
    }

    if !report.sample_unknown_words.is_empty() {
        println!(
            "\n  {} {}",
            "Unknown:".yellow(),
            report.sample_unknown_words.join(", "),
        );
    }
    println!(
        "\n  {}",
        format!("{dictionary_size} words in CEFR dictionary").dimmed()
    );
}

fn paint_level(level: CefrLevel) -> String {
    match level {
        CefrLevel::A1 | CefrLevel::A2 => level.green().to_string(),
        CefrLevel::B1 | CefrLevel::B2 => level.yellow().to_string(),
        CefrLevel::C1 | CefrLevel::C2 => level.red().to_string(),
    }
}

/// One block per 5 percent.
fn bar(percentage: f64) -> String {
    "█".repeat((percentage / 5.0).round() as usize)
}
