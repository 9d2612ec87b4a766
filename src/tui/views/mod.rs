// Views module - draws the three panes
//
// Pure rendering: reads pane buffers and focus from the App, never mutates
// them. Geometry was already decided by the layout pass.

use super::app::App;
use super::pane::{Pane, PaneId};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let surface = app.router.surface();
    let focused = surface.focused();

    for id in [PaneId::ChannelList, PaneId::Transcript, PaneId::Log] {
        if let Some(pane) = surface.pane(id) {
            render_pane(f, pane, focused == Some(id));
        }
    }
}

fn render_pane(f: &mut Frame, pane: &Pane, focused: bool) {
    let area = pane.area().intersection(f.area());
    if area.is_empty() {
        return;
    }

    let border_style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", pane.title));

    // Cursor highlight only makes sense where the cursor does something
    let show_cursor = focused && pane.id == PaneId::ChannelList;

    let lines: Vec<Line> = pane
        .visible_range()
        .map(|idx| {
            let line = &pane.lines()[idx];
            let mut style = line
                .color
                .map(|c| Style::default().fg(c))
                .unwrap_or_default();
            if show_cursor && idx == pane.cursor() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(line.text.clone(), style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
