// Slack module - the messaging source
//
// The view-routing core only sees the `MessagingSource` trait. `SlackClient`
// implements it over the Web API, and `rtm` turns the real-time socket into a
// stream of `SourceEvent`s.

pub mod client;
pub mod models;
pub mod rtm;

pub use client::SlackClient;

use crate::channels::Conversation;
use crate::error::SourceError;
use async_trait::async_trait;

/// A workspace member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub id: String,
    pub name: String,
}

/// Workspace identity used for audit lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamInfo {
    pub name: String,
    pub domain: String,
}

/// Directory lookups the core needs from the messaging service
#[async_trait]
pub trait MessagingSource: Send + Sync {
    /// Every public, private and direct-message conversation visible to the user
    async fn list_conversations(&self) -> Result<Vec<Conversation>, SourceError>;

    async fn list_users(&self) -> Result<Vec<UserEntry>, SourceError>;

    /// Display name of a single channel
    async fn channel_info(&self, id: &str) -> Result<String, SourceError>;

    async fn team_info(&self) -> Result<TeamInfo, SourceError>;
}

#[cfg(test)]
pub mod testing {
    //! In-memory messaging source for tests

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct FakeSource {
        pub conversations: Vec<Conversation>,
        pub users: Vec<UserEntry>,
        pub channels: HashMap<String, String>,
        pub team: TeamInfo,
        channel_lookups: AtomicUsize,
    }

    impl FakeSource {
        pub fn with_channel(mut self, id: &str, name: &str) -> Self {
            self.channels.insert(id.to_string(), name.to_string());
            self
        }

        pub fn with_user(mut self, id: &str, name: &str) -> Self {
            self.users.push(UserEntry {
                id: id.to_string(),
                name: name.to_string(),
            });
            self
        }

        pub fn with_domain(mut self, domain: &str) -> Self {
            self.team = TeamInfo {
                name: domain.to_string(),
                domain: domain.to_string(),
            };
            self
        }

        /// Number of live `channel_info` calls made so far
        pub fn channel_lookups(&self) -> usize {
            self.channel_lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MessagingSource for FakeSource {
        async fn list_conversations(&self) -> Result<Vec<Conversation>, SourceError> {
            Ok(self.conversations.clone())
        }

        async fn list_users(&self) -> Result<Vec<UserEntry>, SourceError> {
            Ok(self.users.clone())
        }

        async fn channel_info(&self, id: &str) -> Result<String, SourceError> {
            self.channel_lookups.fetch_add(1, Ordering::SeqCst);
            self.channels
                .get(id)
                .cloned()
                .ok_or_else(|| SourceError::from_api("conversations.info", "channel_not_found"))
        }

        async fn team_info(&self) -> Result<TeamInfo, SourceError> {
            Ok(self.team.clone())
        }
    }
}
