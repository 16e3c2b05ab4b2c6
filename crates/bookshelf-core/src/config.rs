use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Configuration for bookshelf.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (BOOKSHELF_* prefix)
/// 3. Config file (~/.config/bookshelf/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding one JSON document per storage key.
    ///
    /// Can be set via:
    /// - CLI: --data-dir /path/to/dir
    /// - ENV: BOOKSHELF_DATA_DIR
    /// - Config: data_dir = "/path/to/dir"
    /// - Default: ~/.local/share/bookshelf
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Logger settings for twyg. Output goes to stderr unless the
    /// `[logging]` table names another destination.
    #[serde(default = "default_logging", deserialize_with = "deserialize_logging")]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            logging: default_logging(),
        }
    }
}

impl Config {
    /// Load configuration from the user's config file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path(), None)
    }

    /// Like [`Config::load`], with the `--data-dir` flag taking precedence
    /// over every other source when given.
    pub fn load_with_data_dir(data_dir: Option<PathBuf>) -> Result<Self> {
        Self::load_from(&config_file_path(), data_dir)
    }

    /// Load configuration from `path` (skipped if it does not exist), then
    /// `BOOKSHELF_*` variables, then `data_dir_override`.
    pub fn load_from(path: &Path, data_dir_override: Option<PathBuf>) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if path.exists() {
            let path_str = path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .with_context(|| format!("Failed to load config file {}", path.display()))?;
        }

        builder
            .add_env(env::Options::with_top_level("bookshelf"))
            .context("Failed to load environment variables")?;

        let mut config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        if let Some(dir) = data_dir_override {
            config.data_dir = dir;
        }

        Ok(config)
    }
}

fn default_logging() -> twyg::Opts {
    twyg::OptsBuilder::new()
        .output(twyg::Output::Stderr)
        .build()
        .unwrap_or_default()
}

/// Deserialize the `[logging]` table, defaulting `output` to stderr when the
/// table leaves it out.
fn deserialize_logging<'de, D>(deserializer: D) -> std::result::Result<twyg::Opts, D::Error>
where
    D: Deserializer<'de>,
{
    let mut table: serde_json::Map<String, serde_json::Value> =
        Deserialize::deserialize(deserializer)?;
    table
        .entry("output")
        .or_insert_with(|| serde_json::Value::from("stderr"));
    serde_json::from_value(serde_json::Value::Object(table)).map_err(serde::de::Error::custom)
}

/// Returns: ~/.local/share/bookshelf (or platform equivalent)
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookshelf")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/bookshelf/config.toml
/// - macOS: ~/Library/Application Support/bookshelf/config.toml
/// - Windows: %APPDATA%\bookshelf\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bookshelf")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Bookshelf Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (BOOKSHELF_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Directory where the library is stored
#
# Holds one JSON file per document: library_books.json, library_theme.json,
# library_filter.json, library_search_query.json, library_search_options.json
#
# Can also be set via:
# - CLI: bookshelf --data-dir /custom/dir list
# - Environment: BOOKSHELF_DATA_DIR=/custom/dir
#
# Default: Platform-specific data directory
#data_dir = "/path/to/custom/bookshelf"

[logging]
# One of: trace, debug, info, warn, error
level = "warn"
coloured = true
# Where log lines go: "stderr" or "stdout". Keep stderr when using the TUI,
# which draws on stdout.
output = "stderr"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
