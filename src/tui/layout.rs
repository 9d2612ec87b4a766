//! Pane geometry for the three-pane shell.
//!
//! Channel list on the left (a fifth of the width), transcript to its right,
//! and the log pane across the bottom five rows.

use super::pane::{Pane, PaneId, Surface};
use ratatui::layout::Rect;

/// Height of the log pane
pub const FOOTER_ROWS: u16 = 5;

/// Percent of the width given to the channel list
const CHANNEL_LIST_PERCENT: u32 = 20;

pub const CHANNELS_TITLE: &str = "Channels";
pub const LOGS_TITLE: &str = "Logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneGeometry {
    pub channel_list: Rect,
    pub transcript: Rect,
    pub log: Rect,
}

impl PaneGeometry {
    pub fn compute(area: Rect) -> Self {
        let list_width = (area.width as u32 * CHANNEL_LIST_PERCENT / 100) as u16;
        let body_height = area.height.saturating_sub(FOOTER_ROWS);
        let footer_height = area.height - body_height;

        Self {
            channel_list: Rect::new(area.x, area.y, list_width, body_height),
            transcript: Rect::new(
                area.x + list_width,
                area.y,
                area.width - list_width,
                body_height,
            ),
            log: Rect::new(area.x, area.y + body_height, area.width, footer_height),
        }
    }

    pub fn area_of(&self, id: PaneId) -> Rect {
        match id {
            PaneId::ChannelList => self.channel_list,
            PaneId::Transcript => self.transcript,
            PaneId::Log => self.log,
        }
    }
}

/// What a layout pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPass {
    /// Panes were created; the channel list should be seeded
    FirstPass,
    Resized,
    Unchanged,
}

#[derive(Debug, Default)]
pub struct LayoutManager {
    last_area: Option<Rect>,
}

impl LayoutManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the panes on the first call; afterwards only move them
    pub fn apply(&mut self, area: Rect, surface: &mut Surface, transcript_title: &str) -> LayoutPass {
        let geometry = PaneGeometry::compute(area);

        match self.last_area {
            None => {
                // The list scrolls with its cursor, not with new lines
                let mut channel_list =
                    Pane::new(PaneId::ChannelList, CHANNELS_TITLE, geometry.channel_list);
                channel_list.autoscroll = false;
                surface.create(channel_list);
                surface.create(Pane::new(
                    PaneId::Transcript,
                    transcript_title,
                    geometry.transcript,
                ));
                surface.create(Pane::new(PaneId::Log, LOGS_TITLE, geometry.log));
                if let Err(e) = surface.focus(PaneId::ChannelList) {
                    tracing::warn!(target: "respite::meta", "Initial focus failed: {}", e);
                }
                self.last_area = Some(area);
                LayoutPass::FirstPass
            }
            Some(last) if last == area => LayoutPass::Unchanged,
            Some(_) => {
                for id in [PaneId::ChannelList, PaneId::Transcript, PaneId::Log] {
                    if let Some(pane) = surface.pane_mut(id) {
                        pane.set_area(geometry.area_of(id));
                    }
                }
                self.last_area = Some(area);
                LayoutPass::Resized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_for_100_by_30() {
        let g = PaneGeometry::compute(Rect::new(0, 0, 100, 30));
        assert_eq!(g.channel_list, Rect::new(0, 0, 20, 25));
        assert_eq!(g.transcript, Rect::new(20, 0, 80, 25));
        assert_eq!(g.log, Rect::new(0, 25, 100, 5));
    }

    #[test]
    fn list_width_truncates() {
        let g = PaneGeometry::compute(Rect::new(0, 0, 99, 30));
        assert_eq!(g.channel_list.width, 19);
        assert_eq!(g.transcript.width, 80);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let g = PaneGeometry::compute(Rect::new(0, 0, 3, 2));
        assert_eq!(g.channel_list.height, 0);
        assert_eq!(g.log.height, 2);
    }

    #[test]
    fn panes_are_created_on_the_first_pass_only() {
        let mut layout = LayoutManager::new();
        let mut surface = Surface::new();
        let area = Rect::new(0, 0, 100, 30);

        assert_eq!(layout.apply(area, &mut surface, "Respite"), LayoutPass::FirstPass);
        assert_eq!(surface.focused(), Some(PaneId::ChannelList));
        assert_eq!(surface.pane(PaneId::Log).unwrap().title, LOGS_TITLE);

        surface
            .pane_mut(PaneId::Log)
            .unwrap()
            .write_line("kept", None);

        assert_eq!(layout.apply(area, &mut surface, "ignored"), LayoutPass::Unchanged);
        let bigger = Rect::new(0, 0, 120, 40);
        assert_eq!(layout.apply(bigger, &mut surface, "ignored"), LayoutPass::Resized);

        let log = surface.pane(PaneId::Log).unwrap();
        assert_eq!(log.lines().len(), 1);
        assert_eq!(log.area(), Rect::new(0, 35, 120, 5));
        assert_eq!(surface.pane(PaneId::Transcript).unwrap().title, "Respite");
    }
}
