// Slack wire types
//
// Only the fields respite reads are modelled; serde ignores the rest.

use crate::channels::{ChannelKind, Conversation};
use serde::Deserialize;

/// A conversation object from `conversations.list` / `conversations.info`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConversation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_channel: bool,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_member: bool,
}

impl ApiConversation {
    /// Classify the conversation; None for kinds the sidebar doesn't show (mpim)
    pub fn kind(&self) -> Option<ChannelKind> {
        if self.is_im {
            Some(ChannelKind::DirectMessage)
        } else if self.is_private || self.is_group {
            Some(ChannelKind::Private)
        } else if self.is_channel {
            Some(ChannelKind::Public)
        } else {
            None
        }
    }

    pub fn into_conversation(self) -> Option<Conversation> {
        let kind = self.kind()?;
        Some(Conversation {
            id: self.id,
            name: self.name,
            kind,
            is_member: self.is_member,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsPage {
    #[serde(default)]
    pub channels: Vec<ApiConversation>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ConversationInfo {
    pub channel: ApiConversation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UsersPage {
    #[serde(default)]
    pub members: Vec<ApiUser>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiTeam {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamInfoResponse {
    pub team: ApiTeam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSelf {
    #[serde(default)]
    pub name: String,
}

/// Response of `rtm.connect`
#[derive(Debug, Clone, Deserialize)]
pub struct RtmConnect {
    pub url: String,
    #[serde(default)]
    pub team: ApiTeam,
    #[serde(rename = "self")]
    pub me: ApiSelf,
}

/// One frame read from the RTM socket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RtmFrame {
    Hello,
    Message {
        #[serde(default)]
        user: String,
        #[serde(default)]
        channel: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        ts: String,
        #[serde(default)]
        upload: bool,
    },
    Error {
        error: RtmErrorBody,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct RtmErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
