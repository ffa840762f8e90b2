//! Daemon configuration
//!
//! Read from `<home>/config.toml`. Every field has a default, so a missing
//! file is fine; a file that exists but cannot be read or parsed is not.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_COMMAND: &str = "viirs_check";
const DEFAULT_PROGRAM: &str = "python";
const DEFAULT_SCRIPT: &str = "validate_viirs.py";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level config file layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub bot: BotSection,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Command behavior
#[derive(Debug, Clone, Deserialize)]
pub struct BotSection {
    /// Command keyword the bot listens for
    #[serde(default = "default_command")]
    pub command: String,
    /// Reply to the user when the analysis process fails to run
    #[serde(default = "default_true")]
    pub notify_on_failure: bool,
    /// Reject date tokens that are not `today` or `YYYY-MM-DD`
    #[serde(default)]
    pub strict_dates: bool,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            command: default_command(),
            notify_on_failure: true,
            strict_dates: false,
        }
    }
}

/// How to launch the analysis process
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Executable to run
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before the date and layer
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Working directory for the process
    pub working_dir: Option<PathBuf>,
    /// Kill the process after this many seconds (no limit when unset)
    pub timeout_secs: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            working_dir: None,
            timeout_secs: None,
        }
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_args() -> Vec<String> {
    vec![DEFAULT_SCRIPT.to_string()]
}

fn default_true() -> bool {
    true
}

impl BotConfig {
    /// Load `config.toml` from the bot home directory.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file exists but is unreadable or invalid.
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = home.join(CONFIG_FILE);
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: BotConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        info!(
            config_path = %path.display(),
            command = %config.bot.command,
            program = %config.analysis.program,
            timeout_secs = ?config.analysis.timeout_secs,
            "Loaded config"
        );
        Ok(config)
    }
}
