// Events that flow between the messaging source, the event pump and the TUI
//
// Two channels connect the tasks:
// - SourceEvent: RTM task -> event pump (what the messaging service said)
// - UiEvent: event pump / tracing layer -> TUI loop (what to show)
//
// Both are closed enums so every producer and consumer matches exhaustively.

use crate::normalizer::Normalized;
use tokio::sync::mpsc;

/// Raw chat message as delivered by the RTM socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_id: String,
    pub channel_id: String,
    /// Slack `ts`: "<unix seconds>.<sequence>"
    pub timestamp: String,
    pub text: String,
    pub is_upload: bool,
}

/// Everything the messaging source can tell us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Hello,
    Connected {
        team_name: String,
        team_domain: String,
        user_name: String,
    },
    Message(InboundMessage),
    TransportError {
        description: String,
    },
    InvalidCredentials,
    /// Frame types we don't render (typing, presence, pong, ...)
    Ignored {
        kind: String,
    },
}

/// Why the TUI stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user asked to quit
    Quit,
    /// The token was rejected; nothing to retry
    InvalidCredentials,
}

/// Work handed to the TUI loop
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A line for the log pane
    Log(String),
    /// A normalized chat message, rendered against the current filter
    Message(Normalized),
    Shutdown(ExitReason),
}

/// Cloneable handle for posting work to the TUI loop
#[derive(Debug, Clone)]
pub struct UiSender {
    tx: mpsc::Sender<UiEvent>,
}

impl UiSender {
    pub fn new(tx: mpsc::Sender<UiEvent>) -> Self {
        Self { tx }
    }

    /// Queue a log pane line (waits for room in the channel)
    pub async fn log(&self, line: impl Into<String>) {
        self.send(UiEvent::Log(line.into())).await;
    }

    pub async fn message(&self, message: Normalized) {
        self.send(UiEvent::Message(message)).await;
    }

    pub async fn shutdown(&self, reason: ExitReason) {
        self.send(UiEvent::Shutdown(reason)).await;
    }

    /// Queue without waiting; drops the line if the channel is full or closed
    pub fn try_log(&self, line: String) {
        let _ = self.tx.try_send(UiEvent::Log(line));
    }

    /// Whether the TUI loop has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send(&self, event: UiEvent) {
        // A closed channel means the TUI is shutting down; nothing left to show
        if self.tx.send(event).await.is_err() {
            tracing::debug!(target: "respite::meta", "UI channel closed, dropping event");
        }
    }
}
