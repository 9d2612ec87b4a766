// Panes and the focus surface
//
// A pane is a titled, append-only line buffer with a cursor and a scroll
// origin. The surface owns the three panes and tracks which one has focus.
// Programmatic writes go through `Surface::with_focus`, which hands the target
// pane to a closure and puts focus back where it was afterwards.

use crate::error::{FocusSwitchError, PaneError};
use ratatui::layout::Rect;
use ratatui::style::Color;
use std::collections::HashMap;
use std::ops::Range;

/// The three panes of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneId {
    ChannelList,
    Transcript,
    Log,
}

impl PaneId {
    pub fn name(&self) -> &'static str {
        match self {
            PaneId::ChannelList => "channel-list",
            PaneId::Transcript => "transcript",
            PaneId::Log => "log",
        }
    }
}

/// One buffered line, optionally coloured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneLine {
    pub text: String,
    pub color: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct Pane {
    pub id: PaneId,
    pub title: String,
    lines: Vec<PaneLine>,
    /// Absolute line index
    cursor: usize,
    /// First visible line
    origin: usize,
    pub autoscroll: bool,
    pub focusable: bool,
    area: Rect,
}

impl Pane {
    pub fn new(id: PaneId, title: impl Into<String>, area: Rect) -> Self {
        Self {
            id,
            title: title.into(),
            lines: Vec::new(),
            cursor: 0,
            origin: 0,
            autoscroll: true,
            focusable: true,
            area,
        }
    }

    pub fn lines(&self) -> &[PaneLine] {
        &self.lines
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Rows available for content inside the border
    pub fn inner_height(&self) -> usize {
        self.area.height.saturating_sub(2) as usize
    }

    /// Resize the pane. A tailing view keeps tailing; a cursor view keeps
    /// its cursor on screen.
    pub fn set_area(&mut self, area: Rect) {
        let at_tail = self.origin + self.inner_height() >= self.lines.len();
        self.area = area;
        if self.autoscroll {
            if at_tail {
                self.follow_tail();
            }
        } else {
            self.scroll_to_cursor();
        }
        self.clamp_origin();
    }

    pub fn write_line(&mut self, text: impl Into<String>, color: Option<Color>) {
        self.lines.push(PaneLine {
            text: text.into(),
            color,
        });
        if self.autoscroll {
            self.follow_tail();
        }
    }

    /// Move the cursor by `delta` lines, clamped to the buffer.
    /// The view scrolls to keep the cursor visible.
    pub fn move_cursor(&mut self, delta: isize) {
        let last = self.lines.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.scroll_to_cursor();
    }

    pub fn scroll_to_cursor(&mut self) {
        let height = self.inner_height().max(1);
        if self.cursor < self.origin {
            self.origin = self.cursor;
        } else if self.cursor >= self.origin + height {
            self.origin = self.cursor + 1 - height;
        }
    }

    /// First whitespace-separated word on the cursor line
    pub fn word_at_cursor(&self) -> Result<String, PaneError> {
        self.lines
            .get(self.cursor)
            .and_then(|line| line.text.split_whitespace().next())
            .map(str::to_string)
            .ok_or(PaneError::NoWord { line: self.cursor })
    }

    /// Buffer indices currently on screen
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.origin.min(self.lines.len());
        let end = (start + self.inner_height()).min(self.lines.len());
        start..end
    }

    fn follow_tail(&mut self) {
        self.origin = self.lines.len().saturating_sub(self.inner_height());
    }

    fn clamp_origin(&mut self) {
        self.origin = self.origin.min(self.lines.len().saturating_sub(1));
    }
}

/// Result of a scoped focus: the closure's value plus how the restore went
#[derive(Debug)]
pub struct Focused<R> {
    pub value: R,
    pub restored: Result<(), FocusSwitchError>,
}

/// All panes plus the focus pointer
#[derive(Debug, Default)]
pub struct Surface {
    panes: HashMap<PaneId, Pane>,
    focused: Option<PaneId>,
    redraw: bool,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pane; false if one with that id already exists
    pub fn create(&mut self, pane: Pane) -> bool {
        if self.panes.contains_key(&pane.id) {
            return false;
        }
        self.panes.insert(pane.id, pane);
        self.redraw = true;
        true
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(&id)
    }

    pub fn focused(&self) -> Option<PaneId> {
        self.focused
    }

    /// Move focus to `id`
    pub fn focus(&mut self, id: PaneId) -> Result<(), FocusSwitchError> {
        let pane = self
            .panes
            .get(&id)
            .ok_or(FocusSwitchError::UnknownPane(id))?;
        if !pane.focusable {
            return Err(FocusSwitchError::NotFocusable(id));
        }
        if self.focused != Some(id) {
            self.focused = Some(id);
            self.redraw = true;
        }
        Ok(())
    }

    /// Focus `target`, run `f` on it, then restore the previous focus.
    ///
    /// Restore runs whatever `f` returned; its outcome is reported in
    /// `Focused::restored` rather than replacing the closure's value.
    pub fn with_focus<R>(
        &mut self,
        target: PaneId,
        f: impl FnOnce(&mut Pane) -> R,
    ) -> Result<Focused<R>, FocusSwitchError> {
        let previous = self.focused;
        self.focus(target)?;

        let pane = self
            .panes
            .get_mut(&target)
            .ok_or(FocusSwitchError::UnknownPane(target))?;
        let value = f(pane);

        let restored = match previous {
            Some(id) => self.focus(id),
            None => {
                self.focused = None;
                Ok(())
            }
        };
        self.redraw = true;

        Ok(Focused { value, restored })
    }

    /// Whether anything changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }
}
