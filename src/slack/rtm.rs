// RTM connection manager
//
// Owns the real-time socket: `rtm.connect` for a websocket URL, then a read
// loop that decodes frames into SourceEvents. A JSON ping keeps idle sockets
// alive. Dropped connections are retried with exponential backoff; rejected
// credentials end the task.

use super::models::RtmFrame;
use super::SlackClient;
use crate::config::ConnectionConfig;
use crate::error::SourceError;
use crate::events::{InboundMessage, SourceEvent};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Why a socket session ended without an error
#[derive(Debug, PartialEq, Eq)]
enum StreamEnd {
    /// Server closed the socket; reconnect
    Closed,
    /// Nobody is listening for events anymore; stop
    ReceiverGone,
}

/// Reconnect delay: 1s, doubling, capped
#[derive(Debug)]
pub struct Backoff {
    current: Duration,
    max: Duration,
}

impl Backoff {
    const INITIAL: Duration = Duration::from_secs(1);

    pub fn new(max: Duration) -> Self {
        Self {
            current: Self::INITIAL,
            max: max.max(Self::INITIAL),
        }
    }

    /// Delay to wait now; the following one is twice as long
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = Self::INITIAL;
    }
}

/// Start the RTM task. It stops when `tx`'s receiver is dropped or the token
/// is rejected.
pub fn spawn(
    client: Arc<SlackClient>,
    tx: mpsc::Sender<SourceEvent>,
    config: ConnectionConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move { run(client, tx, config).await })
}

async fn run(client: Arc<SlackClient>, tx: mpsc::Sender<SourceEvent>, config: ConnectionConfig) {
    let mut backoff = Backoff::new(config.max_backoff());

    loop {
        let session = match client.rtm_connect().await {
            Ok(session) => session,
            Err(SourceError::InvalidCredentials) => {
                let _ = tx.send(SourceEvent::InvalidCredentials).await;
                return;
            }
            Err(e) => {
                if !report(&tx, e.to_string()).await {
                    return;
                }
                tokio::time::sleep(backoff.next_delay()).await;
                continue;
            }
        };

        tracing::debug!(target: "respite::meta", "RTM session for team {}", session.team.domain);
        let connected = SourceEvent::Connected {
            team_name: session.team.name,
            team_domain: session.team.domain,
            user_name: session.me.name,
        };
        if tx.send(connected).await.is_err() {
            return;
        }

        match stream(&session.url, &tx, config.ping_interval()).await {
            Ok(StreamEnd::ReceiverGone) => return,
            Ok(StreamEnd::Closed) => {
                backoff.reset();
                if !report(&tx, "connection closed by server".to_string()).await {
                    return;
                }
            }
            Err(e) => {
                if !report(&tx, e.to_string()).await {
                    return;
                }
            }
        }

        let delay = backoff.next_delay();
        tracing::debug!(target: "respite::meta", "Reconnecting in {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

/// Forward a transport error; false when the receiver is gone
async fn report(tx: &mpsc::Sender<SourceEvent>, description: String) -> bool {
    tx.send(SourceEvent::TransportError { description })
        .await
        .is_ok()
}

/// One websocket session: read frames, answer pings, send heartbeats
async fn stream(
    url: &str,
    tx: &mpsc::Sender<SourceEvent>,
    ping_interval: Duration,
) -> Result<StreamEnd, SourceError> {
    let (socket, _) = connect_async(url).await?;
    let (mut write, mut read) = socket.split();

    let mut heartbeat = tokio::time::interval(ping_interval);
    // First tick completes immediately; skip it
    heartbeat.tick().await;
    let mut ping_id: u64 = 0;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                ping_id += 1;
                let ping = serde_json::json!({ "id": ping_id, "type": "ping" }).to_string();
                write.send(Message::Text(ping)).await?;
            }

            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if tx.send(decode_event(&text)).await.is_err() {
                            return Ok(StreamEnd::ReceiverGone);
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        write.send(Message::Pong(payload)).await?;
                    }
                    Some(Ok(Message::Close(_))) | None => return Ok(StreamEnd::Closed),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }
        }
    }
}

/// Decode one text frame. Anything we don't render becomes `Ignored`.
pub fn decode_event(text: &str) -> SourceEvent {
    match serde_json::from_str::<RtmFrame>(text) {
        Ok(RtmFrame::Hello) => SourceEvent::Hello,
        Ok(RtmFrame::Message {
            user,
            channel,
            text,
            ts,
            upload,
        }) => SourceEvent::Message(InboundMessage {
            sender_id: user,
            channel_id: channel,
            timestamp: ts,
            text,
            is_upload: upload,
        }),
        Ok(RtmFrame::Error { error }) => SourceEvent::TransportError {
            description: format!("{}: {}", error.code, error.msg),
        },
        Ok(RtmFrame::Other) | Err(_) => SourceEvent::Ignored {
            kind: frame_type(text),
        },
    }
}

fn frame_type(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
