//! `[logging]`: level filter and the optional JSON file sink

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_FILE_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "respite";

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Hourly, Self::Daily, Self::Never]
            .into_iter()
            .find(|r| s.eq_ignore_ascii_case(&r.to_string()))
            .ok_or_else(|| format!("unknown log rotation {:?}", s))
    }
}

impl fmt::Display for LogRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        })
    }
}

/// Where diagnostics go besides the log pane
#[derive(Debug, Clone, PartialEq)]
pub struct FileSink {
    pub dir: PathBuf,
    pub rotation: LogRotation,
    /// File name prefix ("respite" -> "respite.2019-06-08")
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Level for `respite*` targets when RUST_LOG is unset
    pub level: String,
    /// None keeps diagnostics in the log pane only
    pub file: Option<FileSink>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            file: None,
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Missing keys take defaults; an unknown rotation rolls daily
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let sink = file.file_enabled.unwrap_or(false).then(|| FileSink {
            dir: PathBuf::from(file.file_dir.as_deref().unwrap_or(DEFAULT_FILE_DIR)),
            rotation: file
                .file_rotation
                .and_then(|r| r.parse().ok())
                .unwrap_or_default(),
            prefix: file
                .file_prefix
                .unwrap_or_else(|| DEFAULT_FILE_PREFIX.to_string()),
        });

        Self {
            level: file.level.unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            file: sink,
        }
    }
}
