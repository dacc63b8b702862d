//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};

use cefr_lens_core::config::Config;
use cefr_lens_core::lexicon::{self, Lexicon};

pub mod analyze;
pub mod info;
pub mod lookup;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Resolve and load the lexicon for a command.
///
/// `explicit` (from `--lexicon`) and the configured path are used as-is;
/// otherwise the default locations around the executable, the working
/// directory and the user data directory are searched.
pub fn load_lexicon(
    explicit: Option<&Utf8Path>,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<Lexicon> {
    let path = resolve_lexicon_path(explicit, config, cwd)?;
    let lexicon = Lexicon::from_path_with_columns(&path, &config.lexicon_columns())
        .with_context(|| format!("failed to load CEFR dictionary from {path}"))?;
    Ok(lexicon)
}

/// First existing lexicon candidate for a command.
pub fn resolve_lexicon_path(
    explicit: Option<&Utf8Path>,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<Utf8PathBuf> {
    let exe_dir = executable_dir();
    let candidates = config.lexicon_candidates(explicit, exe_dir.as_deref(), cwd);
    Ok(lexicon::resolve_path(&candidates)?)
}

fn executable_dir() -> Option<Utf8PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe = Utf8PathBuf::from_path_buf(exe).ok()?;
    exe.parent().map(Utf8Path::to_path_buf)
}
