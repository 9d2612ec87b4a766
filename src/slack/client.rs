// Slack Web API client
//
// Thin reqwest wrapper: every call is a GET with the bearer token, and every
// response carries an `ok` flag that has to be checked before the body means
// anything. List endpoints are cursor-paginated; we walk all pages.

use super::models::{
    ConversationInfo, ConversationsPage, RtmConnect, TeamInfoResponse, UsersPage,
};
use super::{MessagingSource, TeamInfo, UserEntry};
use crate::channels::Conversation;
use crate::error::SourceError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Page size for list endpoints (Slack caps this at 1000, recommends <= 200)
const PAGE_LIMIT: &str = "200";

/// Conversation types shown in the sidebar
const CONVERSATION_TYPES: &str = "public_channel,private_channel,im";

pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("respite/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Call a Web API method and decode the body once `ok` is confirmed
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, method);
        let value: serde_json::Value = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !value.get("ok").and_then(|ok| ok.as_bool()).unwrap_or(false) {
            let error = value
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("unknown_error");
            return Err(SourceError::from_api(method, error));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Open an RTM session: returns the websocket URL plus who we are
    pub async fn rtm_connect(&self) -> Result<RtmConnect, SourceError> {
        self.call("rtm.connect", &[]).await
    }
}

#[async_trait]
impl MessagingSource for SlackClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, SourceError> {
        let mut conversations = Vec::new();
        let mut cursor = String::new();

        loop {
            let mut query = vec![("types", CONVERSATION_TYPES), ("limit", PAGE_LIMIT)];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }
            let page: ConversationsPage = self.call("conversations.list", &query).await?;

            conversations.extend(
                page.channels
                    .into_iter()
                    .filter_map(|c| c.into_conversation()),
            );

            if page.response_metadata.next_cursor.is_empty() {
                break;
            }
            cursor = page.response_metadata.next_cursor;
        }

        tracing::debug!("Listed {} conversations", conversations.len());
        Ok(conversations)
    }

    async fn list_users(&self) -> Result<Vec<UserEntry>, SourceError> {
        let mut users = Vec::new();
        let mut cursor = String::new();

        loop {
            let mut query = vec![("limit", PAGE_LIMIT)];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }
            let page: UsersPage = self.call("users.list", &query).await?;

            users.extend(page.members.into_iter().map(|u| UserEntry {
                id: u.id,
                name: u.name,
            }));

            if page.response_metadata.next_cursor.is_empty() {
                break;
            }
            cursor = page.response_metadata.next_cursor;
        }

        Ok(users)
    }

    async fn channel_info(&self, id: &str) -> Result<String, SourceError> {
        let info: ConversationInfo = self
            .call("conversations.info", &[("channel", id)])
            .await?;
        Ok(info.channel.name)
    }

    async fn team_info(&self) -> Result<TeamInfo, SourceError> {
        let info: TeamInfoResponse = self.call("team.info", &[]).await?;
        Ok(TeamInfo {
            name: info.team.name,
            domain: info.team.domain,
        })
    }
}
