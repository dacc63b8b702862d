//! Info command implementation

use camino::Utf8Path;
use cefr_lens_core::CefrLevel;
use cefr_lens_core::config::{Config, ConfigSources};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{load_lexicon, resolve_lexicon_path};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    headword_column: String,
    level_column: String,
    sample_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_level: Option<CefrLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let columns = config.lexicon_columns();
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            headword_column: columns.headword,
            level_column: columns.level,
            sample_size: config.analyze_options().sample_size,
            max_level: config.max_level,
            max_input_bytes: config.input_limit(),
        }
    }
}

#[derive(Serialize)]
struct LexiconInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    levels: Option<Vec<LevelCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct LevelCount {
    level: CefrLevel,
    words: usize,
}

impl LexiconInfo {
    fn inspect(config: &Config, cwd: &Utf8Path) -> Self {
        let path = resolve_lexicon_path(None, config, cwd).ok();
        match load_lexicon(None, config, cwd) {
            Ok(lexicon) => {
                let counts = lexicon.level_counts();
                Self {
                    path: path.map(|p| p.to_string()),
                    size: Some(lexicon.len()),
                    levels: Some(
                        CefrLevel::ALL
                            .iter()
                            .map(|level| LevelCount {
                                level: *level,
                                words: counts[level.index()],
                            })
                            .collect(),
                    ),
                    error: None,
                }
            }
            Err(err) => Self {
                path: path.map(|p| p.to_string()),
                size: None,
                levels: None,
                error: Some(format!("{err:#}")),
            },
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    lexicon: LexiconInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
/// * `cwd` - Working directory, for lexicon discovery
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
        lexicon: LexiconInfo::inspect(config, cwd),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    if let Some(ref path) = full_info.config.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
    if let Some(ref dir) = full_info.config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    println!(
        "{}: {} / {}",
        "Columns".dimmed(),
        full_info.config.headword_column,
        full_info.config.level_column
    );
    println!("{}: {}", "Sample size".dimmed(), full_info.config.sample_size);
    print_opt("Max level", &full_info.config.max_level);
    print_opt("Input limit (bytes)", &full_info.config.max_input_bytes);

    println!();
    println!("{}", "Lexicon".bold().underline());
    match (&full_info.lexicon.size, &full_info.lexicon.levels) {
        (Some(size), Some(levels)) => {
            if let Some(ref path) = full_info.lexicon.path {
                println!("{}: {}", "Path".dimmed(), path.cyan());
            }
            println!("{}: {}", "Words".dimmed(), size);
            let breakdown: Vec<String> = levels
                .iter()
                .map(|l| format!("{} {}", l.level, l.words))
                .collect();
            println!("{}: {}", "Levels".dimmed(), breakdown.join(", "));
        }
        _ => {
            let reason = full_info.lexicon.error.as_deref().unwrap_or("not loaded");
            println!("{}: {}", "Status".dimmed(), reason.yellow());
        }
    }

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: &Option<T>) {
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}
