// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, UI events from the pump)
// - Seeding the channel list after the first layout pass

pub mod app;
pub mod input;
pub mod layout;
pub mod pane;
pub mod router;
pub mod views;

use crate::events::{ExitReason, UiEvent};
use crate::identity::SharedIdentity;
use crate::slack::MessagingSource;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    style::{Attribute, ResetColor, SetAttribute},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::Keymap;
use layout::LayoutPass;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the user quits or the pump asks for a shutdown
///
/// Sets up the terminal, runs the event loop, and always restores the
/// terminal before returning.
pub async fn run_tui(
    mut ui_rx: mpsc::Receiver<UiEvent>,
    identity: SharedIdentity,
    source: Arc<dyn MessagingSource>,
) -> Result<ExitReason> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(identity, Keymap::default());

    let result = run_event_loop(&mut terminal, &mut app, &mut ui_rx, source.as_ref()).await;

    restore_terminal(&mut terminal)?;
    result
}

/// Undo raw mode and the alternate screen. Every step runs even if an
/// earlier one fails; the first failure is returned.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        ResetColor,
        SetAttribute(Attribute::Reset)
    )
    .context("Failed to restore terminal");
    let cursor = terminal.show_cursor().context("Failed to show cursor");
    first_error([raw, screen, cursor])
}

fn first_error<const N: usize>(steps: [Result<()>; N]) -> Result<()> {
    steps.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_restore_failure_is_reported() {
        let steps = [
            Ok(()),
            Err(anyhow::anyhow!("Failed to restore terminal")),
            Err(anyhow::anyhow!("Failed to show cursor")),
        ];
        let err = first_error(steps).unwrap_err();
        assert_eq!(err.to_string(), "Failed to restore terminal");
        assert!(first_error([Ok(()), Ok(())]).is_ok());
    }
}

/// Main event loop
///
/// Waits on three sources with tokio::select!:
/// 1. Keyboard input
/// 2. A 200ms tick
/// 3. UiEvents from the pump and the logging layer
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ui_rx: &mut mpsc::Receiver<UiEvent>,
    source: &dyn MessagingSource,
) -> Result<ExitReason> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));
    let mut dirty = true;

    loop {
        // Layout before anything is posted, so the panes exist
        let size = terminal.size().context("Failed to read terminal size")?;
        let pass = app.layout(Rect::new(0, 0, size.width, size.height));

        if app.take_seed_request() {
            let listing = source.list_conversations().await;
            app.seed_channels(listing);
        }

        if dirty || pass != LayoutPass::Unchanged || app.router.take_redraw() {
            terminal
                .draw(|f| views::draw(f, app))
                .context("Failed to draw terminal")?;
            dirty = false;
        }

        tokio::select! {
            // Keyboard input
            handled = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        app.handle_key(&key_event);
                        return true;
                    }
                }
                false
            } => dirty |= handled,

            // Periodic tick so resizes get picked up
            _ = tick_interval.tick() => {}

            // Lines and messages from the pump
            event = ui_rx.recv() => match event {
                Some(event) => app.handle_ui_event(event),
                // Every producer is gone; nothing more will arrive
                None => {
                    tracing::debug!(target: "respite::meta", "UI channel closed");
                    app.exit = Some(ExitReason::Quit);
                }
            }
        }

        if let Some(reason) = app.exit {
            // Show the final log line before leaving
            terminal
                .draw(|f| views::draw(f, app))
                .context("Failed to draw terminal")?;
            return Ok(reason);
        }
    }
}
