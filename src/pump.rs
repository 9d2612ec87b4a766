// Event pump - consumes messaging events one at a time
//
// Primes the identity cache before the first message is looked at, then turns
// each SourceEvent into zero or more UiEvents. Runs until the source channel
// closes or the credentials are rejected.

use crate::events::{ExitReason, SourceEvent, UiSender};
use crate::identity::SharedIdentity;
use crate::normalizer::Normalizer;
use crate::slack::MessagingSource;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run(
    mut source_rx: mpsc::Receiver<SourceEvent>,
    mut normalizer: Normalizer,
    source: Arc<dyn MessagingSource>,
    identity: SharedIdentity,
    ui: UiSender,
) -> Result<()> {
    prime(&mut normalizer, source.as_ref(), &identity, &ui).await;

    while let Some(event) = source_rx.recv().await {
        match event {
            SourceEvent::Hello => {
                tracing::debug!("RTM hello received");
            }
            SourceEvent::Connected {
                team_name,
                team_domain,
                user_name,
            } => {
                normalizer.set_domain(team_domain.clone());
                ui.log(format!(
                    "Connected to {} ({}.slack.com) as user {}",
                    team_name, team_domain, user_name
                ))
                .await;
            }
            SourceEvent::Message(msg) => {
                if let Some(normalized) = normalizer.normalize(&msg).await {
                    ui.message(normalized).await;
                }
            }
            SourceEvent::TransportError { description } => {
                ui.log(format!("error: {}", description)).await;
            }
            SourceEvent::InvalidCredentials => {
                ui.log("Invalid credentials").await;
                ui.shutdown(ExitReason::InvalidCredentials).await;
                return Ok(());
            }
            SourceEvent::Ignored { kind } => {
                tracing::trace!(target: "respite::meta", kind = %kind, "Ignored RTM event");
            }
        }

        if ui.is_closed() {
            break;
        }
    }

    tracing::debug!(target: "respite::meta", "Event pump stopped");
    Ok(())
}

/// Load every user name and the team domain. Failures degrade names, never stop
/// the pump.
async fn prime(
    normalizer: &mut Normalizer,
    source: &dyn MessagingSource,
    identity: &SharedIdentity,
    ui: &UiSender,
) {
    match source.list_users().await {
        Ok(users) => {
            let added = identity.prime_users(users);
            tracing::debug!(target: "respite::meta", "Primed {} users", added);
        }
        Err(e) => ui.log(format!("failed to list users: {}", e)).await,
    }

    match source.team_info().await {
        Ok(team) => {
            tracing::info!("Workspace: {} ({}.slack.com)", team.name, team.domain);
            normalizer.set_domain(team.domain);
        }
        Err(e) => ui.log(format!("failed to get team info: {}", e)).await,
    }
}
