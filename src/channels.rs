// Channel entries and the sidebar buckets
//
// The conversation list comes back from Slack as one flat list. The sidebar
// shows it in three buckets (public, private, direct messages), each sorted on
// its own.

/// What kind of conversation a channel entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Public,
    Private,
    DirectMessage,
}

/// A raw conversation as listed by the messaging source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    pub is_member: bool,
}

/// A conversation the user can see in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
}

impl ChannelEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Label shown in the sidebar; direct messages have no resolved name
    pub fn label(&self) -> &str {
        match self.kind {
            ChannelKind::DirectMessage => &self.id,
            ChannelKind::Public | ChannelKind::Private => &self.name,
        }
    }
}

/// Keep joined public/private channels and every direct message
pub fn joined(conversations: Vec<Conversation>) -> Vec<ChannelEntry> {
    conversations
        .into_iter()
        .filter(|c| c.is_member || c.kind == ChannelKind::DirectMessage)
        .map(|c| ChannelEntry::new(c.id, c.name, c.kind))
        .collect()
}

/// Sidebar labels split by kind, each bucket sorted
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChannelBuckets {
    pub public: Vec<String>,
    pub private: Vec<String>,
    pub direct: Vec<String>,
}

impl ChannelBuckets {
    pub fn partition(channels: &[ChannelEntry]) -> Self {
        let mut buckets = Self::default();
        for channel in channels {
            let label = channel.label().to_string();
            match channel.kind {
                ChannelKind::Public => buckets.public.push(label),
                ChannelKind::Private => buckets.private.push(label),
                ChannelKind::DirectMessage => buckets.direct.push(label),
            }
        }
        buckets.public.sort();
        buckets.private.sort();
        buckets.direct.sort();
        buckets
    }

    /// Buckets in display order
    pub fn in_order(&self) -> [(ChannelKind, &[String]); 3] {
        [
            (ChannelKind::Public, self.public.as_slice()),
            (ChannelKind::Private, self.private.as_slice()),
            (ChannelKind::DirectMessage, self.direct.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: &str, name: &str, kind: ChannelKind, is_member: bool) -> Conversation {
        Conversation {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            is_member,
        }
    }

    #[test]
    fn public_bucket_is_sorted_by_name() {
        let channels = vec![
            ChannelEntry::new("C2", "zebra", ChannelKind::Public),
            ChannelEntry::new("C3", "alpha", ChannelKind::Public),
        ];
        let buckets = ChannelBuckets::partition(&channels);
        assert_eq!(buckets.public, vec!["alpha", "zebra"]);
    }

    #[test]
    fn partition_is_total_and_disjoint() {
        let channels = vec![
            ChannelEntry::new("C1", "general", ChannelKind::Public),
            ChannelEntry::new("G1", "secret", ChannelKind::Private),
            ChannelEntry::new("D2", "", ChannelKind::DirectMessage),
            ChannelEntry::new("D1", "", ChannelKind::DirectMessage),
            ChannelEntry::new("G0", "alpha-team", ChannelKind::Private),
        ];
        let buckets = ChannelBuckets::partition(&channels);

        let placed = buckets.public.len() + buckets.private.len() + buckets.direct.len();
        assert_eq!(placed, channels.len());
        assert_eq!(buckets.public, vec!["general"]);
        assert_eq!(buckets.private, vec!["alpha-team", "secret"]);
        // direct messages sort by id
        assert_eq!(buckets.direct, vec!["D1", "D2"]);
    }

    #[test]
    fn joined_drops_unjoined_channels_but_keeps_dms() {
        let listed = vec![
            conversation("C1", "general", ChannelKind::Public, true),
            conversation("C2", "random", ChannelKind::Public, false),
            conversation("G1", "ops", ChannelKind::Private, false),
            conversation("D1", "", ChannelKind::DirectMessage, false),
        ];
        let ids: Vec<_> = joined(listed).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["C1", "D1"]);
    }
}
