// View router - decides which pane gets what, and keeps focus stable
//
// Every programmatic write uses `Surface::with_focus`, so whatever pane the
// user was on stays focused after a message or log line lands elsewhere.
// Nothing here returns an error to the event loop: focus failures are posted
// to the log pane once, and a failure while doing that goes to tracing.

use super::pane::{Focused, Pane, PaneId, Surface};
use crate::channels::{ChannelBuckets, ChannelEntry, ChannelKind};
use crate::error::FocusSwitchError;
use crate::filter::FilterState;
use crate::identity::IdentityCache;
use ratatui::style::Color;

/// Posted to the log pane when the filter hides a message
pub const FILTERED_NOTICE: &str = "[i] Message filtered";

fn kind_color(kind: ChannelKind) -> Color {
    match kind {
        ChannelKind::Public => Color::Green,
        ChannelKind::Private => Color::Yellow,
        ChannelKind::DirectMessage => Color::Cyan,
    }
}

#[derive(Debug)]
pub struct ViewRouter {
    surface: Surface,
    /// Set while a focus failure is being posted to the log pane
    reporting: bool,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self {
            surface: Surface::new(),
            reporting: false,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Append a rendered message. An empty line under an active filter means
    /// the message was filtered out; say so in the log pane instead.
    pub fn post_to_transcript(&mut self, text: &str, filter: &FilterState) {
        if text.is_empty() && filter.is_active() {
            self.post_to_log(FILTERED_NOTICE);
            return;
        }
        self.post_line(PaneId::Transcript, text, None);
    }

    pub fn post_to_log(&mut self, text: &str) {
        self.post_line(PaneId::Log, text, None);
    }

    /// Fill the sidebar: public, private then direct messages, each sorted.
    ///
    /// Also teaches the identity cache every channel name it didn't know, and
    /// leaves focus on the channel list so the user can start navigating.
    pub fn post_channel_list(&mut self, channels: &[ChannelEntry], identity: &IdentityCache) {
        let added = channels
            .iter()
            .filter(|c| identity.remember_channel(&c.id, c.label()))
            .count();
        tracing::debug!(target: "respite::meta", "Cached {} new channel names", added);

        let buckets = ChannelBuckets::partition(channels);

        if let Err(e) = self.surface.focus(PaneId::ChannelList) {
            self.report(e);
            return;
        }
        let Some(pane) = self.surface.pane_mut(PaneId::ChannelList) else {
            return;
        };

        for (kind, labels) in buckets.in_order() {
            for label in labels {
                pane.write_line(label.as_str(), Some(kind_color(kind)));
            }
        }
        pane.scroll_to_cursor();
    }

    pub fn set_transcript_title(&mut self, title: impl Into<String>) {
        if let Some(pane) = self.surface.pane_mut(PaneId::Transcript) {
            pane.title = title.into();
        }
    }

    /// Move the channel-list cursor
    pub fn move_cursor(&mut self, delta: isize) {
        if let Some(pane) = self.surface.pane_mut(PaneId::ChannelList) {
            pane.move_cursor(delta);
        }
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.surface.pane(id)
    }

    pub fn take_redraw(&mut self) -> bool {
        self.surface.take_redraw()
    }

    fn post_line(&mut self, target: PaneId, text: &str, color: Option<Color>) {
        match self
            .surface
            .with_focus(target, |pane| pane.write_line(text, color))
        {
            Ok(Focused { value: (), restored }) => {
                if let Err(e) = restored {
                    self.report(e);
                }
            }
            Err(e) => self.report(e),
        }
    }

    /// Post a focus failure to the log pane, one level deep
    fn report(&mut self, error: FocusSwitchError) {
        if self.reporting {
            tracing::warn!(target: "respite::meta", "Dropped pane error: {}", error);
            return;
        }
        self.reporting = true;
        self.post_to_log(&error.to_string());
        self.reporting = false;
    }
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}
