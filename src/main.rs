// Respite - terminal chat client for Slack
//
// Connects to Slack's real-time messaging socket and shows a channel list, a
// message transcript and a log in a three-pane terminal UI. The transcript can
// be filtered down to a single channel.
//
// Architecture:
// - RTM task (slack::rtm): websocket read loop, emits SourceEvents
// - Event pump (pump): resolves names and times, writes the audit log,
//   forwards UiEvents
// - TUI (ratatui): sole owner of panes, focus and the channel filter
// - Event system: bounded mpsc channels connect the three tasks

mod audit;
mod channels;
mod cli;
mod config;
mod error;
mod events;
mod filter;
mod identity;
mod logging;
mod normalizer;
mod pump;
mod slack;
mod tui;

use anyhow::Result;
use audit::AuditLog;
use clap::Parser;
use config::Config;
use events::{ExitReason, UiSender};
use identity::IdentityCache;
use normalizer::Normalizer;
use slack::{MessagingSource, SlackClient};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Buffer size for both event channels; a full channel makes senders wait
const CHANNEL_CAPACITY: usize = 1000;

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --path)
    let cli = cli::Cli::parse();
    if cli::handle_command(&cli)? {
        return Ok(());
    }

    // Precedence: --log > env > config file > defaults
    let config = Config::load(cli.log)?;
    let token = config.require_token()?.to_string();

    // Diagnostics go to the log pane (and optionally a JSON file) so nothing
    // writes over the alternate screen. The guard must outlive the TUI.
    let (ui_tx, ui_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let ui = UiSender::new(ui_tx);
    let _file_guard = logging::init(&config.logging, ui.clone())?;

    let audit = AuditLog::open(config.audit_log.as_deref())?;
    if let Some(path) = audit.path() {
        tracing::info!("Audit log: {}", path.display());
    }

    let client = Arc::new(SlackClient::new(token, config.api_url.clone())?);
    let source: Arc<dyn MessagingSource> = client.clone();
    let identity = Arc::new(IdentityCache::new());

    // RTM task -> event pump
    let (source_tx, source_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let rtm_handle = slack::rtm::spawn(client, source_tx, config.connection.clone());

    let normalizer = Normalizer::new(identity.clone(), source.clone(), audit, ui.clone());
    let pump_handle = tokio::spawn(pump::run(
        source_rx,
        normalizer,
        source.clone(),
        identity.clone(),
        ui,
    ));

    // Run the TUI in the main task until the user quits or the token is rejected
    let exit = tui::run_tui(ui_rx, identity, source).await;

    // Background tasks hold no state worth flushing; the audit log flushes per line
    rtm_handle.abort();
    pump_handle.abort();

    match exit? {
        ExitReason::Quit => {
            tracing::debug!(target: logging::META_TARGET, "Shutdown complete");
            Ok(())
        }
        ExitReason::InvalidCredentials => {
            anyhow::bail!("Slack rejected the token in {}", config::ENV_TOKEN)
        }
    }
}
