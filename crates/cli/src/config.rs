//! Configuration layering
//!
//! Built-in defaults, then the TOML config file, then command-line flags.

use crate::args::Cli;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stepprune_core::{CheckpointPattern, PolicyError, RetentionPolicy};

/// Environment variable naming a config file to use instead of the default
pub const CONFIG_ENV: &str = "STEPPRUNE_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Contents of the config file. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub policy: RetentionPolicy,
    pub scan: CheckpointPattern,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub dry_run: bool,
    pub no_confirm: bool,
}

impl FileConfig {
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Default config file location (`<config dir>/stepprune/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stepprune").join("config.toml"))
}

/// Load the config file
///
/// An explicit path or `$STEPPRUNE_CONFIG` must exist. The default
/// location is optional and falls back to built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let required = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let path = match required {
        Some(path) => path,
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    tracing::debug!("Loading config from {}", path.display());
    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
        path: path.clone(),
        source,
    })?;

    FileConfig::parse(&contents, &path)
}

/// Fully merged settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory to prune; `None` auto-selects under `search_root`
    pub model_dir: Option<PathBuf>,
    /// Where to look for `checkpoints/*` when `model_dir` is not given
    pub search_root: PathBuf,
    pub policy: RetentionPolicy,
    pub pattern: CheckpointPattern,
    pub dry_run: bool,
    pub no_confirm: bool,
}

impl Settings {
    /// Overlay command-line flags on the file config and validate the result
    pub fn merge(file: FileConfig, cli: &Cli, search_root: PathBuf) -> Result<Self, ConfigError> {
        let mut policy = file.policy;

        if let Some(interval) = cli.early_interval() {
            policy.early_interval = interval;
        }
        if let Some(interval) = cli.middle_interval() {
            policy.middle_interval = interval;
        }
        if let Some(interval) = cli.last_interval() {
            policy.last_interval = interval;
        }
        if let Some(boundary) = cli.middle_start() {
            policy.middle_start = boundary;
        }
        if let Some(boundary) = cli.last_start() {
            policy.last_start = boundary;
        }
        policy.keep_all_last |= cli.keep_all_last;

        policy.validate()?;

        Ok(Self {
            model_dir: cli.model_dir.clone(),
            search_root,
            policy,
            pattern: file.scan,
            dry_run: cli.dry_run || file.run.dry_run,
            no_confirm: cli.no_confirm || file.run.no_confirm,
        })
    }
}

/// Example configuration with every key at its default
pub fn example_config() -> String {
    r#"# stepprune configuration
# Command-line flags override these values.

[policy]
early_interval = { steps = 5000 }
middle_interval = { steps = 10000 }
last_interval = { steps = 2000 }
# Boundaries accept { steps = N } or { percent = P }
middle_start = { percent = 33.0 }
last_start = { percent = 90.0 }
keep_all_last = false

[scan]
prefix = "model_step_"
suffix = ".pt"

[run]
dry_run = false
no_confirm = false
"#
    .to_string()
}
