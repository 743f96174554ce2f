//! Configuration parsing for the exchange.
//!
//! Uses a `key=value` file format with `#` comments and optional quotes.
//! Precedence: CLI flags > `--config` file > `.skillswap/config` > defaults.

use crate::ledger::{LedgerPolicy, MAX_RATING, MIN_RATING};
use crate::store::{JsonFileStore, DEFAULT_MEMBERS_FILE, DEFAULT_REQUESTS_FILE};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Project-level config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".skillswap/config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid config line: {0}")]
    InvalidLine(String),
    #[error("invalid boolean value for {key}: {value}")]
    InvalidBool { key: String, value: String },
    #[error("invalid integer value for {key}: {value}")]
    InvalidInt { key: String, value: String },
}

/// Exchange configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the collection files.
    pub data_dir: PathBuf,
    /// Members collection file (relative paths resolve against `data_dir`).
    pub members_file: PathBuf,
    /// Swap requests collection file (relative paths resolve against `data_dir`).
    pub requests_file: PathBuf,
    /// Install the demo roster when the member collection is empty.
    pub seed_directory: bool,
    /// Reject a swap request identical to one still pending.
    pub dedupe_pending_requests: bool,
    /// Rating recorded when a swap is completed without one (1-5).
    pub default_rating: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            members_file: PathBuf::from(DEFAULT_MEMBERS_FILE),
            requests_file: PathBuf::from(DEFAULT_REQUESTS_FILE),
            seed_directory: true,
            dedupe_pending_requests: false,
            default_rating: MAX_RATING,
        }
    }
}

/// `$XDG_DATA_HOME/skillswap`, falling back to `./.skillswap/data`.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(".skillswap/data"), |d| d.join("skillswap"))
}

impl Config {
    /// Load config from a file, merging with defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.load_file(path)?;
        Ok(config)
    }

    /// Load and merge values from a config file.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_content(&content)
    }

    /// Parse config content (key=value format).
    fn parse_content(&mut self, content: &str) -> Result<(), ConfigError> {
        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine(line.to_string()));
            };

            let key = key.trim();
            let value = Self::unquote(value.trim());

            self.apply_value(key, &value)?;
        }
        Ok(())
    }

    /// Remove surrounding quotes from a value.
    fn unquote(value: &str) -> String {
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            return value[1..value.len() - 1].to_string();
        }
        value.to_string()
    }

    fn apply_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "members_file" => self.members_file = PathBuf::from(value),
            "requests_file" => self.requests_file = PathBuf::from(value),
            "seed_directory" => self.seed_directory = Self::parse_bool(key, value)?,
            "dedupe_pending_requests" => {
                self.dedupe_pending_requests = Self::parse_bool(key, value)?;
            }
            "default_rating" => {
                let rating: u8 = value.parse().map_err(|_| ConfigError::InvalidInt {
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
                if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                    return Err(ConfigError::InvalidLine(format!(
                        "default_rating must be between {MIN_RATING} and {MAX_RATING}, got '{value}'"
                    )));
                }
                self.default_rating = rating;
            }
            _ => {
                warn!(key, "unknown config key, ignoring");
            }
        }
        Ok(())
    }

    fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Ok(true),
            "false" | "0" | "no" | "n" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Resolve relative paths: `data_dir` against `base`, the collection
    /// files against `data_dir`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.data_dir.is_relative() {
            self.data_dir = base.join(&self.data_dir);
        }
        if self.members_file.is_relative() {
            self.members_file = self.data_dir.join(&self.members_file);
        }
        if self.requests_file.is_relative() {
            self.requests_file = self.data_dir.join(&self.requests_file);
        }
    }

    pub fn ledger_policy(&self) -> LedgerPolicy {
        LedgerPolicy {
            dedupe_pending_requests: self.dedupe_pending_requests,
            default_rating: self.default_rating,
        }
    }

    /// JSON-file store for the configured collection files.
    pub fn json_store(&self) -> JsonFileStore {
        JsonFileStore::new(
            self.data_dir.join(&self.members_file),
            self.data_dir.join(&self.requests_file),
        )
    }
}
