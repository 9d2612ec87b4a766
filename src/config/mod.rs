//! Configuration for the chat client
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (`--log`)
//! 2. Environment variables
//! 3. Config file (~/.config/respite/config.toml)
//! 4. Built-in defaults
//!
//! The Slack token is only ever read from `SLACK_TOKEN`; it is never stored in
//! or written to the config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod connection;
mod observability;


pub use connection::{ConnectionConfig, FileConnection};
pub use observability::{FileLogging, FileSink, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Environment variable names
pub const ENV_TOKEN: &str = "SLACK_TOKEN";
pub const ENV_API_URL: &str = "RESPITE_API_URL";
pub const ENV_AUDIT_LOG: &str = "RESPITE_AUDIT_LOG";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Slack API token (env only)
    pub token: Option<String>,

    /// Slack Web API base URL
    pub api_url: String,

    /// Where audit lines go; None discards them
    pub audit_log: Option<PathBuf>,

    pub logging: LoggingConfig,

    pub connection: ConnectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            audit_log: None,
            logging: LoggingConfig::default(),
            connection: ConnectionConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_url: Option<String>,
    pub audit_log: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [connection] section
    pub connection: Option<FileConnection>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/respite/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("respite").join("config.toml"))
    }

    /// Parse a config file; a missing file means defaults, a broken one is an error
    pub(crate) fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    /// Load configuration: CLI -> env vars -> file -> defaults
    pub fn load(cli_log: Option<PathBuf>) -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };

        Ok(Self::resolve(file, |key| std::env::var(key).ok(), cli_log))
    }

    /// Merge the layers. `env` is injected so precedence can be tested
    /// without touching the process environment.
    pub(crate) fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        cli_log: Option<PathBuf>,
    ) -> Self {
        let token = env(ENV_TOKEN).filter(|t| !t.trim().is_empty());

        // API URL: env > file > default
        let api_url = env(ENV_API_URL)
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // Audit log: --log > env > file > none
        let audit_log = cli_log
            .or_else(|| env(ENV_AUDIT_LOG).map(PathBuf::from))
            .or_else(|| file.audit_log.map(PathBuf::from));

        Self {
            token,
            api_url,
            audit_log,
            logging: LoggingConfig::from_file(file.logging),
            connection: ConnectionConfig::from_file(file.connection),
        }
    }

    /// The token, or an actionable error when it's missing
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .with_context(|| format!("{} is not set; export your Slack API token", ENV_TOKEN))
    }

    /// Token safe to print: first four characters, the rest starred
    pub fn masked_token(&self) -> String {
        match &self.token {
            None => "(unset)".to_string(),
            Some(token) => {
                let visible: String = token.chars().take(4).collect();
                format!("{}{}", visible, "*".repeat(token.chars().count().saturating_sub(4)))
            }
        }
    }
}
