//! Error taxonomy for the view-routing core and the Slack source
//!
//! Everything except `SourceError::InvalidCredentials` is recovered where it
//! happens: the caller substitutes an empty value or posts a line to the log
//! pane and carries on.

use crate::tui::pane::PaneId;
use std::num::ParseIntError;

/// Identity resolution failure
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("failed to map ID {id} to a username")]
    UnknownUser { id: String },

    #[error("failed to get channel info for channel id {id} : {reason}")]
    Channel { id: String, reason: String },
}

/// A pane could not take focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FocusSwitchError {
    #[error("unknown pane: {}", .0.name())]
    UnknownPane(PaneId),

    #[error("pane {} cannot take focus", .0.name())]
    NotFocusable(PaneId),
}

/// A message timestamp did not start with integer Unix seconds
#[derive(Debug, thiserror::Error)]
pub enum TimestampParseError {
    #[error("invalid timestamp {raw:?}: {source}")]
    Invalid {
        raw: String,
        #[source]
        source: ParseIntError,
    },

    #[error("timestamp {raw:?} is out of range")]
    OutOfRange { raw: String },
}

/// Buffer lookups on a pane
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaneError {
    #[error("no word under the cursor at line {line}")]
    NoWord { line: usize },
}

/// Failures talking to the messaging service
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("socket: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    #[error("invalid credentials")]
    InvalidCredentials,
}

impl SourceError {
    /// Classify an `ok: false` Web API response
    pub fn from_api(method: &str, error: &str) -> Self {
        match error {
            "invalid_auth" | "not_authed" | "account_inactive" | "token_revoked" => {
                Self::InvalidCredentials
            }
            _ => Self::Api {
                method: method.to_string(),
                error: error.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_fatal_credentials() {
        for code in ["invalid_auth", "not_authed", "account_inactive", "token_revoked"] {
            assert!(matches!(
                SourceError::from_api("rtm.connect", code),
                SourceError::InvalidCredentials
            ));
        }
    }

    #[test]
    fn other_api_errors_keep_method_and_code() {
        let err = SourceError::from_api("conversations.info", "channel_not_found");
        assert_eq!(err.to_string(), "conversations.info failed: channel_not_found");
    }

    #[test]
    fn focus_errors_name_the_pane() {
        assert_eq!(
            FocusSwitchError::UnknownPane(PaneId::Log).to_string(),
            "unknown pane: log"
        );
    }
}
