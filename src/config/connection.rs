//! RTM connection tuning: heartbeat and reconnect backoff

use serde::Deserialize;
use std::time::Duration;

/// RTM connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Seconds between JSON pings on an idle socket
    pub ping_interval_secs: u64,
    /// Upper bound for the reconnect delay (starts at 1s, doubles)
    pub max_backoff_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: 30,
            max_backoff_secs: 60,
        }
    }
}

/// `[connection]` as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileConnection {
    pub ping_interval_secs: Option<u64>,
    pub max_backoff_secs: Option<u64>,
}

impl ConnectionConfig {
    pub fn from_file(file: Option<FileConnection>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            // Zero would make tokio's interval panic
            ping_interval_secs: file
                .ping_interval_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.ping_interval_secs),
            max_backoff_secs: file
                .max_backoff_secs
                .map(|secs| secs.max(1))
                .unwrap_or(defaults.max_backoff_secs),
        }
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }
}
