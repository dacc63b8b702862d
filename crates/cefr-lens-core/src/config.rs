//! Settings for lexicon loading, analysis and logging.
//!
//! Settings come from, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the user file `config.<ext>` in the platform config directory
//!    (`~/.config/cefr-lens/` on Linux)
//! 3. project files `.cefr-lens.<ext>` then `cefr-lens.<ext>` in the
//!    nearest directory holding any, searching up from the working
//!    directory and stopping at a `.git` boundary
//! 4. files passed explicitly (`--config`)
//! 5. `CEFR_LENS_*` environment variables
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`; inside one directory they
//! merge in that order. A relative `lexicon` or `log_dir` path resolves
//! against the directory of the file that set it.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use cefr_lens_core::config::ConfigLoader;
//!
//! # fn main() -> Result<(), cefr_lens_core::ConfigError> {
//! let (config, sources) = ConfigLoader::new()
//!     .with_project_search(Utf8Path::new("."))
//!     .load()?;
//! println!("{:?} from {:?}", config.max_level, sources.primary_file());
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use figment::providers::{Env, Format as _, Json, Serialized, Toml, Yaml};
use figment::{Figment, Metadata};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::level::CefrLevel;
use crate::lexicon::{self, LexiconColumns};
use crate::profile::AnalyzeOptions;

/// The configuration for cefr-lens.
///
/// Deserialized from config files found during discovery (TOML, YAML, or
/// JSON), then overridden by `CEFR_LENS_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for log files; file logging is off when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Lexicon CSV to use instead of the default search locations.
    pub lexicon: Option<Utf8PathBuf>,
    /// Name of the headword column (default: `headword`).
    pub headword_column: Option<String>,
    /// Name of the level column (default: `CEFR`).
    pub level_column: Option<String>,
    /// How many unknown words to list in a report (default: 50).
    pub sample_size: Option<usize>,
    /// Fail `analyze` when the primary level is above this one.
    pub max_level: Option<CefrLevel>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Prevents resource exhaustion from oversized inputs in both CLI and MCP server.
    /// Omit to use the default (5 MiB). Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored and no size check is performed.
    /// Default: `false`.
    #[serde(default)]
    pub disable_input_limit: bool,
}

impl Config {
    /// Lexicon column names, with defaults for unset fields.
    pub fn lexicon_columns(&self) -> LexiconColumns {
        let defaults = LexiconColumns::default();
        LexiconColumns {
            headword: self.headword_column.clone().unwrap_or(defaults.headword),
            level: self.level_column.clone().unwrap_or(defaults.level),
        }
    }

    /// Analysis options derived from this config.
    pub fn analyze_options(&self) -> AnalyzeOptions {
        let mut options = AnalyzeOptions::default();
        if let Some(sample_size) = self.sample_size {
            options.sample_size = sample_size;
        }
        options
    }

    /// Effective input size limit, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(crate::DEFAULT_MAX_INPUT_BYTES))
        }
    }

    /// Ordered lexicon locations to try.
    ///
    /// An explicit path (from the command line) or the configured `lexicon`
    /// is the only candidate when present; otherwise the default search
    /// locations are returned.
    pub fn lexicon_candidates(
        &self,
        explicit: Option<&Utf8Path>,
        exe_dir: Option<&Utf8Path>,
        cwd: &Utf8Path,
    ) -> Vec<Utf8PathBuf> {
        if let Some(path) = explicit.or(self.lexicon.as_deref()) {
            return vec![path.to_path_buf()];
        }
        let data_dir = user_data_dir();
        lexicon::default_candidates(exe_dir, cwd, data_dir.as_deref())
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Config files that contributed to a loaded [`Config`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// User config file, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Project files from the nearest directory that has any, low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// Files passed explicitly, in the order given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Every file in merge order, lowest precedence first.
    pub fn files(&self) -> impl Iterator<Item = &Utf8Path> {
        self.user_file
            .iter()
            .chain(&self.project_files)
            .chain(&self.explicit_files)
            .map(Utf8PathBuf::as_path)
    }

    /// The file whose values win, if any file was loaded.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.files().last()
    }

    /// Whether no config file was found.
    pub fn is_empty(&self) -> bool {
        self.files().next().is_none()
    }
}

const APP_NAME: &str = "cefr-lens";

const ENV_PREFIX: &str = "CEFR_LENS_";

/// Directory that ends the upward project search.
const BOUNDARY_MARKER: &str = ".git";

/// Config file syntax, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    /// Recognized extensions in merge order.
    const EXTENSIONS: &'static [&'static str] = &["toml", "yaml", "yml", "json"];

    fn of(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("yaml" | "yml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    fn merge(self, figment: Figment, path: &Utf8Path) -> Figment {
        let path = path.as_std_path();
        match self {
            Self::Toml => figment.merge(Toml::file_exact(path)),
            Self::Yaml => figment.merge(Yaml::file_exact(path)),
            Self::Json => figment.merge(Json::file_exact(path)),
        }
    }
}

/// `<stem>.<ext>` files in `dir` that exist, in merge order.
fn existing_files(dir: &Utf8Path, stem: &str) -> impl Iterator<Item = Utf8PathBuf> {
    FileFormat::EXTENSIONS
        .iter()
        .map(move |ext| dir.join(format!("{stem}.{ext}")))
        .filter(|path| path.is_file())
}

/// Builder that discovers config files and merges them into a [`Config`].
#[derive(Debug)]
pub struct ConfigLoader {
    search_from: Option<Utf8PathBuf>,
    user_config: bool,
    stop_at_boundary: bool,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader with user config and the `.git` boundary enabled, and no
    /// project search until [`with_project_search`](Self::with_project_search).
    pub const fn new() -> Self {
        Self {
            search_from: None,
            user_config: true,
            stop_at_boundary: true,
            explicit_files: Vec::new(),
        }
    }

    /// Search for project files upward from `dir`.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.search_from = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Include or skip the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Search past `.git` directories up to the filesystem root.
    pub const fn without_boundary_marker(mut self) -> Self {
        self.stop_at_boundary = false;
        self
    }

    /// Merge `path` after every discovered file; later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge defaults, discovered files, explicit files and the environment.
    #[tracing::instrument(skip(self), fields(search_from = ?self.search_from))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        Self::extract(sources)
    }

    /// Like [`load`](Self::load), but fails with [`ConfigError::NotFound`]
    /// when no config file exists anywhere.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        if sources.is_empty() {
            return Err(ConfigError::NotFound);
        }
        Self::extract(sources)
    }

    fn discover(self) -> ConfigSources {
        ConfigSources {
            user_file: if self.user_config { find_user_config() } else { None },
            project_files: self
                .search_from
                .as_deref()
                .map(|dir| self.find_project_configs(dir))
                .unwrap_or_default(),
            explicit_files: self.explicit_files,
        }
    }

    fn extract(sources: ConfigSources) -> ConfigResult<(Config, ConfigSources)> {
        let figment = sources
            .files()
            .fold(
                Figment::from(Serialized::defaults(Config::default())),
                |figment, path| FileFormat::of(path).merge(figment, path),
            )
            // CEFR_LENS_MAX_LEVEL=b2, CEFR_LENS_LEXICON=/path/to.csv, ...
            .merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let mut config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        anchor(&mut config.lexicon, figment.find_metadata("lexicon"));
        anchor(&mut config.log_dir, figment.find_metadata("log_dir"));

        tracing::debug!(
            files = sources.files().count(),
            lexicon = ?config.lexicon,
            max_level = ?config.max_level,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Project files from the nearest directory at or above `start` that has any.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found: Vec<_> = existing_files(dir, &format!(".{APP_NAME}"))
                .chain(existing_files(dir, APP_NAME))
                .collect();
            if !found.is_empty() {
                return found;
            }
            if self.stop_at_boundary && dir.join(BOUNDARY_MARKER).exists() {
                break;
            }
        }
        Vec::new()
    }
}

fn find_user_config() -> Option<Utf8PathBuf> {
    existing_files(&user_config_dir()?, "config").next()
}

/// Resolve a relative path against the directory of the file that set it.
///
/// Values from defaults or the environment stay as they are.
fn anchor(path: &mut Option<Utf8PathBuf>, metadata: Option<&Metadata>) {
    let Some(value) = path.as_mut().filter(|p| p.is_relative()) else {
        return;
    };
    let base = metadata
        .and_then(|m| m.source.as_ref())
        .and_then(|source| source.file_path())
        .and_then(Path::parent)
        .and_then(Utf8Path::from_path);
    if let Some(base) = base {
        *value = base.join(&*value);
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Platform config directory (`~/.config/cefr-lens/` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(project_dirs()?.config_dir().to_path_buf()).ok()
}

/// Platform data directory, the last place searched for the default
/// lexicon (`~/.local/share/cefr-lens/` on Linux).
pub fn user_data_dir() -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(project_dirs()?.data_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables via `set_var`/`remove_var`.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Temp dir with `files` written into it, plus its UTF-8 path.
    fn layout(files: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        for (name, contents) in files {
            let path = root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
        }
        (tmp, root)
    }

    fn isolated() -> ConfigLoader {
        ConfigLoader::new().with_user_config(false)
    }

    /// Load while holding the env lock so env overrides cannot leak in.
    fn load(loader: ConfigLoader) -> ConfigResult<(Config, ConfigSources)> {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        loader.load()
    }

    fn load_file(name: &str, contents: &str) -> Config {
        let (_tmp, root) = layout(&[(name, contents)]);
        load(isolated().with_file(root.join(name))).unwrap().0
    }

    #[test]
    fn defaults_describe_the_cefrj_profile() {
        let config = Config::default();
        assert_eq!(config.lexicon_columns(), LexiconColumns::default());
        assert_eq!(config.analyze_options().sample_size, 50);
        assert_eq!(config.input_limit(), Some(crate::DEFAULT_MAX_INPUT_BYTES));
        assert!(config.max_level.is_none());
    }

    #[test]
    fn every_field_loads_from_toml() {
        let config = load_file(
            "settings.toml",
            r#"log_level = "debug"
log_dir = "/var/log/cefr"
lexicon = "/data/cefrj.csv"
headword_column = "word"
level_column = "level"
sample_size = 10
max_level = "B2"
max_input_bytes = 2048
"#,
        );
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_dir, Some(Utf8PathBuf::from("/var/log/cefr")));
        assert_eq!(config.lexicon, Some(Utf8PathBuf::from("/data/cefrj.csv")));
        assert_eq!(config.lexicon_columns().headword, "word");
        assert_eq!(config.lexicon_columns().level, "level");
        assert_eq!(config.analyze_options().sample_size, 10);
        assert_eq!(config.max_level, Some(CefrLevel::B2));
        assert_eq!(config.input_limit(), Some(2048));
    }

    #[test]
    fn yaml_and_json_accept_lowercase_levels() {
        let yaml = load_file("settings.yaml", "max_level: b1\nheadword_column: Word\n");
        assert_eq!(yaml.max_level, Some(CefrLevel::B1));
        assert_eq!(yaml.lexicon_columns().headword, "Word");

        let json = load_file("settings.json", r#"{"max_level": "c1", "sample_size": 0}"#);
        assert_eq!(json.max_level, Some(CefrLevel::C1));
        assert_eq!(json.analyze_options().sample_size, 0);
    }

    #[test]
    fn yaml_deserializes_without_figment() {
        let config: Config =
            serde_yaml::from_str("lexicon: data/cefrj.csv\nmax_level: A2\n").unwrap();
        assert_eq!(config.lexicon, Some(Utf8PathBuf::from("data/cefrj.csv")));
        assert_eq!(config.max_level, Some(CefrLevel::A2));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let (_tmp, root) = layout(&[("settings.toml", "max_level = \"D4\"\n")]);
        let result = load(isolated().with_file(root.join("settings.toml")));
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn disabling_the_limit_keeps_the_configured_value() {
        let config = load_file(
            "settings.toml",
            "max_input_bytes = 1024\ndisable_input_limit = true\n",
        );
        assert_eq!(config.max_input_bytes, Some(1024));
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn relative_lexicon_resolves_against_its_config_file() {
        let (_tmp, root) = layout(&[
            ("book/.cefr-lens.toml", "lexicon = \"data/words.csv\"\nlog_dir = \"logs\"\n"),
            ("book/chapters/one.txt", "text"),
        ]);

        let loader = isolated()
            .with_project_search(root.join("book/chapters"));
        let (config, _) = load(loader).unwrap();
        assert_eq!(config.lexicon, Some(root.join("book/data/words.csv")));
        assert_eq!(config.log_dir, Some(root.join("book/logs")));
    }

    #[test]
    fn absolute_lexicon_is_kept() {
        let config = load_file("settings.toml", "lexicon = \"/srv/cefrj.csv\"\n");
        assert_eq!(config.lexicon, Some(Utf8PathBuf::from("/srv/cefrj.csv")));
    }

    #[test]
    fn explicit_files_merge_in_order() {
        let (_tmp, root) = layout(&[
            ("base.toml", "max_level = \"A2\"\nsample_size = 5\n"),
            ("strict.yaml", "max_level: A1\n"),
        ]);

        let loader = isolated()
            .with_file(root.join("base.toml"))
            .with_file(root.join("strict.yaml"));
        let (config, sources) = load(loader).unwrap();

        assert_eq!(config.max_level, Some(CefrLevel::A1));
        assert_eq!(config.sample_size, Some(5));
        assert_eq!(sources.primary_file(), Some(root.join("strict.yaml").as_path()));
    }

    #[test]
    fn project_search_walks_up_to_the_nearest_directory() {
        let (_tmp, root) = layout(&[
            ("cefr-lens.toml", "sample_size = 9\n"),
            ("course/.cefr-lens.yaml", "level_column: Level\n"),
        ]);
        fs::create_dir_all(root.join("course/unit/texts")).unwrap();

        let loader = isolated()
            .without_boundary_marker()
            .with_project_search(root.join("course/unit/texts"));
        let (config, sources) = load(loader).unwrap();

        // Only the nearest directory contributes.
        assert_eq!(config.lexicon_columns().level, "Level");
        assert!(config.sample_size.is_none());
        assert_eq!(sources.project_files, vec![root.join("course/.cefr-lens.yaml")]);
    }

    #[test]
    fn plain_name_overrides_dotfile() {
        let (_tmp, root) = layout(&[
            (".cefr-lens.toml", "max_level = \"B1\"\nsample_size = 3\n"),
            ("cefr-lens.json", r#"{"max_level": "C2"}"#),
        ]);

        let (config, sources) = load(isolated().with_project_search(&root)).unwrap();

        assert_eq!(config.max_level, Some(CefrLevel::C2));
        assert_eq!(config.sample_size, Some(3));
        assert_eq!(sources.project_files.len(), 2);
        assert_eq!(sources.primary_file(), Some(root.join("cefr-lens.json").as_path()));
    }

    #[test]
    fn git_directory_bounds_the_search() {
        let (_tmp, root) = layout(&[("cefr-lens.toml", "max_level = \"A1\"\n")]);
        fs::create_dir_all(root.join("repo/.git")).unwrap();
        fs::create_dir_all(root.join("repo/texts")).unwrap();

        let loader = isolated()
            .with_project_search(root.join("repo/texts"));
        let (config, sources) = load(loader).unwrap();
        assert!(config.max_level.is_none());
        assert!(sources.is_empty());

        // From the repository root itself the boundary applies too.
        let (config, _) = load(isolated().with_project_search(root.join("repo"))).unwrap();
        assert!(config.max_level.is_none());
    }

    #[test]
    fn explicit_file_overrides_project_file() {
        let (_tmp, root) = layout(&[
            (".cefr-lens.toml", "lexicon = \"project.csv\"\n"),
            ("ci.toml", "lexicon = \"/ci/words.csv\"\n"),
        ]);

        let loader = isolated()
            .with_project_search(&root)
            .with_file(root.join("ci.toml"));
        let (config, sources) = load(loader).unwrap();

        assert_eq!(config.lexicon, Some(Utf8PathBuf::from("/ci/words.csv")));
        assert_eq!(sources.files().count(), 2);
    }

    #[test]
    fn load_or_error_requires_a_file() {
        let (_tmp, root) = layout(&[]);
        let result = isolated()
            .with_project_search(&root)
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn user_dirs_are_namespaced() {
        for dir in [user_config_dir(), user_data_dir()].into_iter().flatten() {
            assert!(dir.as_str().contains("cefr-lens"));
        }
    }

    #[test]
    fn lexicon_columns_fall_back_per_field() {
        let config = Config {
            level_column: Some("level".to_string()),
            ..Config::default()
        };
        let columns = config.lexicon_columns();
        assert_eq!(columns.headword, "headword");
        assert_eq!(columns.level, "level");
    }

    #[test]
    fn explicit_lexicon_wins_outright() {
        let config = Config {
            lexicon: Some(Utf8PathBuf::from("/configured.csv")),
            ..Config::default()
        };
        let candidates = config.lexicon_candidates(
            Some(Utf8Path::new("/explicit.csv")),
            Some(Utf8Path::new("/opt/cefr/bin")),
            Utf8Path::new("/work"),
        );
        assert_eq!(candidates, vec![Utf8PathBuf::from("/explicit.csv")]);

        let candidates = config.lexicon_candidates(None, None, Utf8Path::new("/work"));
        assert_eq!(candidates, vec![Utf8PathBuf::from("/configured.csv")]);
    }

    #[test]
    fn default_lexicon_search_order() {
        let candidates = Config::default().lexicon_candidates(
            None,
            Some(Utf8Path::new("/opt/cefr/bin")),
            Utf8Path::new("/work"),
        );
        let names: Vec<&str> = candidates.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            &names[..3],
            &[
                "/opt/cefr/resources/cefrj-vocabulary-profile-1.5.csv",
                "/opt/cefr/bin/resources/cefrj-vocabulary-profile-1.5.csv",
                "/work/resources/cefrj-vocabulary-profile-1.5.csv",
            ]
        );
    }

    #[test]
    #[allow(unsafe_code)]
    fn environment_overrides_files_without_anchoring() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let (_tmp, root) = layout(&[("settings.toml", "max_level = \"B1\"\nlexicon = \"a.csv\"\n")]);

        // SAFETY: Test environment; mutex serializes env access across tests.
        unsafe {
            std::env::set_var("CEFR_LENS_MAX_LEVEL", "C1");
            std::env::set_var("CEFR_LENS_LEXICON", "env/words.csv");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(root.join("settings.toml"))
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("CEFR_LENS_MAX_LEVEL");
            std::env::remove_var("CEFR_LENS_LEXICON");
        }

        let (config, _sources) = result.unwrap();
        assert_eq!(config.max_level, Some(CefrLevel::C1));
        assert_eq!(config.lexicon, Some(Utf8PathBuf::from("env/words.csv")));
    }
}
