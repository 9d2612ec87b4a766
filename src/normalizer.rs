// Message normalizer
//
// Turns raw RTM messages into display-ready parts. Resolution (names, time,
// audit line) happens in the event pump; the filter is applied later, in the
// TUI loop that owns it, by `Normalized::render`.

use crate::audit::AuditLog;
use crate::error::TimestampParseError;
use crate::events::{InboundMessage, UiSender};
use crate::filter::FilterState;
use crate::identity::SharedIdentity;
use crate::slack::MessagingSource;
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::sync::Arc;

/// Display format for message times (local time zone)
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// When a message was sent, or a marker when its `ts` was unreadable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTime {
    At(DateTime<Utc>),
    Invalid,
}

impl fmt::Display for MessageTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageTime::At(at) => write!(f, "{}", at.with_timezone(&Local).format(TIME_FORMAT)),
            MessageTime::Invalid => f.write_str("invalid time"),
        }
    }
}

/// Parse the integer-seconds prefix of a Slack `ts` ("1560000000.000100")
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    let seconds = ts.split('.').next().unwrap_or_default();
    let seconds: i64 = seconds
        .parse()
        .map_err(|source| TimestampParseError::Invalid {
            raw: ts.to_string(),
            source,
        })?;

    DateTime::from_timestamp(seconds, 0).ok_or_else(|| TimestampParseError::OutOfRange {
        raw: ts.to_string(),
    })
}

/// A message with ids resolved to names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub time: MessageTime,
    pub channel: String,
    pub user: String,
    pub text: String,
}

impl Normalized {
    /// Transcript line for the current filter; empty means suppressed
    pub fn render(&self, filter: &FilterState) -> String {
        match filter.active() {
            None => format!(
                "[{}] #{}| [{}]> {}",
                self.time, self.channel, self.user, self.text
            ),
            Some(active) if active == self.channel => {
                format!("[{}] [{}]> {}", self.time, self.user, self.text)
            }
            Some(_) => String::new(),
        }
    }

    /// Filter-independent audit line
    pub fn audit_line(&self, domain: &str) -> String {
        format!(
            "[{}] {}.slack.com #{}| [{}]> {}",
            self.time, domain, self.channel, self.user, self.text
        )
    }
}

/// Resolves inbound messages and keeps the audit trail
pub struct Normalizer {
    identity: SharedIdentity,
    source: Arc<dyn MessagingSource>,
    audit: AuditLog,
    domain: String,
    ui: UiSender,
}

impl Normalizer {
    pub fn new(
        identity: SharedIdentity,
        source: Arc<dyn MessagingSource>,
        audit: AuditLog,
        ui: UiSender,
    ) -> Self {
        Self {
            identity,
            source,
            audit,
            domain: String::new(),
            ui,
        }
    }

    /// Team domain used in audit lines
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = domain.into();
    }

    /// Resolve a raw message. Uploads yield None and leave no trace.
    ///
    /// Lookup and parse failures degrade to empty names / an invalid time and
    /// are reported to the log pane; they never drop the message.
    pub async fn normalize(&mut self, msg: &InboundMessage) -> Option<Normalized> {
        if msg.is_upload {
            return None;
        }

        let user = self.identity.resolve_user(&msg.sender_id).unwrap_or_else(|e| {
            tracing::debug!(target: "respite::meta", "{}", e);
            String::new()
        });

        let channel = match self
            .identity
            .resolve_channel(&msg.channel_id, self.source.as_ref())
            .await
        {
            Ok(name) => name,
            Err(e) => {
                self.ui.log(e.to_string()).await;
                String::new()
            }
        };

        let time = match parse_timestamp(&msg.timestamp) {
            Ok(at) => MessageTime::At(at),
            Err(e) => {
                self.ui
                    .log(format!("failed to convert timestamp to Int64: {}", e))
                    .await;
                MessageTime::Invalid
            }
        };

        let normalized = Normalized {
            time,
            channel,
            user,
            text: msg.text.clone(),
        };

        if let Err(e) = self.audit.record(&normalized.audit_line(&self.domain)) {
            self.ui.log(format!("{:#}", e)).await;
        }

        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::UiEvent;
    use crate::identity::IdentityCache;
    use crate::slack::testing::FakeSource;
    use crate::slack::UserEntry;
    use tokio::sync::mpsc;

    fn hi() -> InboundMessage {
        InboundMessage {
            sender_id: "U1".to_string(),
            channel_id: "C1".to_string(),
            timestamp: "1560000000.000100".to_string(),
            text: "hi".to_string(),
            is_upload: false,
        }
    }

    fn expected_time() -> String {
        DateTime::from_timestamp(1_560_000_000, 0)
            .unwrap()
            .with_timezone(&Local)
            .format(TIME_FORMAT)
            .to_string()
    }

    struct Harness {
        normalizer: Normalizer,
        source: Arc<FakeSource>,
        ui_rx: mpsc::Receiver<UiEvent>,
        audit_path: std::path::PathBuf,
        _dir: tempfile::TempDir,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("audit.log");
        let audit = AuditLog::open(Some(&audit_path)).unwrap();

        let identity = Arc::new(IdentityCache::new());
        identity.prime_users(vec![UserEntry {
            id: "U1".to_string(),
            name: "alice".to_string(),
        }]);

        let source = Arc::new(FakeSource::default().with_channel("C1", "general"));
        let (tx, ui_rx) = mpsc::channel(16);
        let mut normalizer = Normalizer::new(identity, source.clone(), audit, UiSender::new(tx));
        normalizer.set_domain("blacksun");

        Harness {
            normalizer,
            source,
            ui_rx,
            audit_path,
            _dir: dir,
        }
    }

    fn sample(channel: &str) -> Normalized {
        Normalized {
            time: MessageTime::At(parse_timestamp("1560000000.000100").unwrap()),
            channel: channel.to_string(),
            user: "alice".to_string(),
            text: "hi".to_string(),
        }
    }

    #[test]
    fn timestamp_uses_integer_prefix() {
        let at = parse_timestamp("1560000000.000100").unwrap();
        assert_eq!(at.timestamp(), 1_560_000_000);
        assert_eq!(parse_timestamp("42").unwrap().timestamp(), 42);
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        assert!(matches!(
            parse_timestamp("soon.0001"),
            Err(TimestampParseError::Invalid { .. })
        ));
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn unfiltered_line_names_the_channel() {
        let line = sample("general").render(&FilterState::default());
        assert_eq!(line, format!("[{}] #general| [alice]> hi", expected_time()));
    }

    #[test]
    fn matching_filter_elides_the_channel() {
        let mut filter = FilterState::default();
        filter.set("general");
        let line = sample("general").render(&filter);
        assert_eq!(line, format!("[{}] [alice]> hi", expected_time()));
    }

    #[test]
    fn other_filter_suppresses() {
        let mut filter = FilterState::default();
        filter.set("random");
        assert_eq!(sample("general").render(&filter), "");
    }

    #[test]
    fn invalid_time_renders_a_placeholder() {
        let mut message = sample("general");
        message.time = MessageTime::Invalid;
        assert!(message
            .render(&FilterState::default())
            .starts_with("[invalid time] #general|"));
    }

    #[tokio::test]
    async fn resolves_names_and_writes_one_audit_line() {
        let mut h = harness();
        let normalized = h.normalizer.normalize(&hi()).await.unwrap();

        assert_eq!(normalized, sample("general"));
        let audit = std::fs::read_to_string(&h.audit_path).unwrap();
        assert_eq!(
            audit,
            format!(
                "[{}] blacksun.slack.com #general| [alice]> hi\n",
                expected_time()
            )
        );
        assert!(h.ui_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn uploads_leave_no_trace() {
        let mut h = harness();
        let mut upload = hi();
        upload.is_upload = true;

        assert!(h.normalizer.normalize(&upload).await.is_none());
        assert_eq!(std::fs::read_to_string(&h.audit_path).unwrap(), "");
        assert_eq!(h.source.channel_lookups(), 0);
        assert!(h.ui_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_ids_degrade_to_empty_names() {
        let mut h = harness();
        let mut msg = hi();
        msg.sender_id = "U404".to_string();
        msg.channel_id = "C404".to_string();

        let normalized = h.normalizer.normalize(&msg).await.unwrap();
        assert_eq!(normalized.user, "");
        assert_eq!(normalized.channel, "");

        // Only the channel failure is reported
        match h.ui_rx.try_recv() {
            Ok(UiEvent::Log(line)) => assert!(line.contains("C404")),
            other => panic!("expected a log line, got {:?}", other),
        }
        assert!(h.ui_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn bad_timestamp_is_logged_and_message_kept() {
        let mut h = harness();
        let mut msg = hi();
        msg.timestamp = "garbage".to_string();

        let normalized = h.normalizer.normalize(&msg).await.unwrap();
        assert_eq!(normalized.time, MessageTime::Invalid);
        match h.ui_rx.try_recv() {
            Ok(UiEvent::Log(line)) => assert!(line.starts_with("failed to convert timestamp")),
            other => panic!("expected a log line, got {:?}", other),
        }
    }
}
