//! Logging setup for the CLI.
//!
//! Human-readable logs go to stderr so stdout stays clean for reports and
//! the MCP stdio transport. When a log path or directory is configured, the
//! same events are also written to a file through a non-blocking appender.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable naming an explicit log file.
const ENV_LOG_PATH: &str = "CEFR_LENS_LOG_PATH";
/// Environment variable naming a log directory.
const ENV_LOG_DIR: &str = "CEFR_LENS_LOG_DIR";
/// File name used inside a log directory.
const LOG_FILE_NAME: &str = "cefr-lens.log";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file; wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory that receives `cefr-lens.log`.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to the configured `log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
            std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            log_path: env_path,
            log_dir: env_dir.or(config_dir),
        }
    }

    /// Directory and file name for the log file, if file logging is on.
    fn file_target(&self) -> Option<(PathBuf, PathBuf)> {
        if let Some(path) = &self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let name = path.file_name().map(PathBuf::from)?;
            return Some((dir, name));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), PathBuf::from(LOG_FILE_NAME)))
    }
}

/// Build the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `-q` means errors only, each `-v`
/// raises the level one step, and the configured level is the default.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_directive(quiet, verbose, default_level))
}

fn level_directive(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live until
/// the process exits.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match config.file_target() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, &name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
