// Identity cache - Slack IDs to human-friendly names
//
// Users are primed in bulk at startup and never fetched one by one. Channels
// are filled from the sidebar listing and, on a miss, by a single live lookup
// whose result is kept. Names are immutable once mapped: first insert wins.

use crate::error::LookupError;
use crate::slack::{MessagingSource, UserEntry};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared between the event pump (resolution) and the TUI (sidebar inserts)
pub type SharedIdentity = Arc<IdentityCache>;

#[derive(Debug, Default)]
pub struct IdentityCache {
    users: RwLock<HashMap<String, String>>,
    channels: RwLock<HashMap<String, String>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk insert user names; existing entries are kept
    pub fn prime_users(&self, users: impl IntoIterator<Item = UserEntry>) -> usize {
        let mut map = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        for user in users {
            map.entry(user.id).or_insert(user.name);
        }
        map.len() - before
    }

    /// Cached user name; never goes to the network
    pub fn resolve_user(&self, id: &str) -> Result<String, LookupError> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| LookupError::UnknownUser { id: id.to_string() })
    }

    pub fn channel_name(&self, id: &str) -> Option<String> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Insert a channel name unless the id is already mapped.
    /// Returns true when the entry is new.
    pub fn remember_channel(&self, id: &str, name: &str) -> bool {
        let mut map = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(id) {
            return false;
        }
        map.insert(id.to_string(), name.to_string());
        true
    }

    /// Cached channel name, or one live lookup whose result is cached
    pub async fn resolve_channel(
        &self,
        id: &str,
        source: &dyn MessagingSource,
    ) -> Result<String, LookupError> {
        if let Some(name) = self.channel_name(id) {
            return Ok(name);
        }

        let name = source
            .channel_info(id)
            .await
            .map_err(|e| LookupError::Channel {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        self.remember_channel(id, &name);
        // Another writer may have won the race; the cache is authoritative
        Ok(self.channel_name(id).unwrap_or(name))
    }
}
