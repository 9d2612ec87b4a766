// TUI application state
//
// The App is the single owner of everything on screen: panes and focus (via
// the router), the channel filter, and the keymap. All mutations arrive here
// from the event loop, one at a time.

use super::input::{Action, Keymap};
use super::layout::{LayoutManager, LayoutPass};
use super::pane::PaneId;
use super::router::ViewRouter;
use crate::channels::{self, ChannelEntry, Conversation};
use crate::error::SourceError;
use crate::events::{ExitReason, UiEvent};
use crate::filter::FilterState;
use crate::identity::SharedIdentity;
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::layout::Rect;

pub const APP_TITLE: &str = "Respite v1.0 - Blacksun Research Labs 2019";

pub struct App {
    pub router: ViewRouter,

    /// Active channel filter; only `apply` writes it
    pub filter: FilterState,

    identity: SharedIdentity,

    keymap: Keymap,

    layout: LayoutManager,

    /// Set once the loop should stop
    pub exit: Option<ExitReason>,

    /// Raised by the first layout pass, cleared by `take_seed_request`
    seed_requested: bool,
}

impl App {
    pub fn new(identity: SharedIdentity, keymap: Keymap) -> Self {
        Self {
            router: ViewRouter::new(),
            filter: FilterState::default(),
            identity,
            keymap,
            layout: LayoutManager::new(),
            exit: None,
            seed_requested: false,
        }
    }

    /// Transcript title for the current filter
    pub fn transcript_title(&self) -> String {
        match self.filter.active() {
            Some(channel) => format!("{} ({})", APP_TITLE, channel),
            None => APP_TITLE.to_string(),
        }
    }

    /// Fit the panes to the terminal; the first pass creates them
    pub fn layout(&mut self, area: Rect) -> LayoutPass {
        let title = self.transcript_title();
        let pass = self.layout.apply(area, self.router.surface_mut(), &title);
        if pass == LayoutPass::FirstPass {
            self.seed_requested = true;
        }
        pass
    }

    /// True exactly once, after the panes exist
    pub fn take_seed_request(&mut self) -> bool {
        std::mem::take(&mut self.seed_requested)
    }

    /// Fill the channel list from a conversation listing
    pub fn seed_channels(&mut self, listing: Result<Vec<Conversation>, SourceError>) {
        let entries: Vec<ChannelEntry> = match listing {
            Ok(conversations) => channels::joined(conversations),
            Err(e) => {
                self.router
                    .post_to_log(&format!("failed to list conversations: {}", e));
                Vec::new()
            }
        };
        tracing::debug!(target: "respite::meta", "Seeding {} channels", entries.len());
        self.router.post_channel_list(&entries, &self.identity);
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(line) => self.router.post_to_log(&line),
            UiEvent::Message(message) => {
                let line = message.render(&self.filter);
                self.router.post_to_transcript(&line, &self.filter);
            }
            UiEvent::Shutdown(reason) => self.exit = Some(reason),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        // Some terminals report releases too
        if key.kind != KeyEventKind::Press {
            return;
        }
        let focused = self.router.surface().focused();
        if let Some(action) = self.keymap.resolve(focused, key) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.router.post_to_log("Quitting ...");
                self.exit = Some(ExitReason::Quit);
            }
            Action::ClearFilter => {
                self.filter.clear();
                let title = self.transcript_title();
                self.router.set_transcript_title(title);
                self.router.post_to_log("Disabling channel filter");
            }
            Action::CursorDown => self.router.move_cursor(1),
            Action::CursorUp => self.router.move_cursor(-1),
            Action::SelectChannel => self.select_channel(),
        }
    }

    fn select_channel(&mut self) {
        let word = match self.router.pane(PaneId::ChannelList) {
            Some(pane) => pane.word_at_cursor(),
            None => return,
        };

        match word {
            Ok(channel) => {
                self.filter.set(channel.as_str());
                let title = self.transcript_title();
                self.router.set_transcript_title(title);
                self.router
                    .post_to_log(&format!("Enabling channel filter on {}", channel));
            }
            Err(e) => self.router.post_to_log(&e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelKind;
    use crate::identity::IdentityCache;
    use crate::normalizer::{parse_timestamp, MessageTime, Normalized};
    use crate::tui::router::FILTERED_NOTICE;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::Arc;

    fn app() -> App {
        let mut app = App::new(Arc::new(IdentityCache::new()), Keymap::default());
        assert_eq!(app.layout(Rect::new(0, 0, 100, 30)), LayoutPass::FirstPass);
        app
    }

    fn conversation(id: &str, name: &str, kind: ChannelKind) -> Conversation {
        Conversation {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            is_member: true,
        }
    }

    fn message(channel: &str) -> Normalized {
        Normalized {
            time: MessageTime::At(parse_timestamp("1560000000.000100").unwrap()),
            channel: channel.to_string(),
            user: "alice".to_string(),
            text: "hi".to_string(),
        }
    }

    fn lines(app: &App, id: PaneId) -> Vec<String> {
        app.router
            .pane(id)
            .unwrap()
            .lines()
            .iter()
            .map(|l| l.text.clone())
            .collect()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(&KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn seed_is_requested_once() {
        let mut app = app();
        assert!(app.take_seed_request());
        assert!(!app.take_seed_request());

        app.layout(Rect::new(0, 0, 80, 24));
        assert!(!app.take_seed_request());
    }

    #[test]
    fn failed_listing_logs_and_posts_empty_list() {
        let mut app = app();
        app.seed_channels(Err(SourceError::from_api("conversations.list", "ratelimited")));

        assert!(lines(&app, PaneId::ChannelList).is_empty());
        assert_eq!(
            lines(&app, PaneId::Log),
            vec!["failed to list conversations: conversations.list failed: ratelimited"]
        );
    }

    #[test]
    fn select_and_clear_filter() {
        let mut app = app();
        app.seed_channels(Ok(vec![
            conversation("C2", "random", ChannelKind::Public),
            conversation("C1", "general", ChannelKind::Public),
        ]));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filter.active(), Some("random"));
        assert_eq!(
            app.router.pane(PaneId::Transcript).unwrap().title,
            format!("{} (random)", APP_TITLE)
        );

        // A message for another channel is hidden and noted in the log
        app.handle_ui_event(UiEvent::Message(message("general")));
        assert!(lines(&app, PaneId::Transcript).is_empty());

        press(&mut app, KeyCode::Tab);
        assert!(!app.filter.is_active());
        assert_eq!(app.router.pane(PaneId::Transcript).unwrap().title, APP_TITLE);
        assert_eq!(
            lines(&app, PaneId::Log),
            vec![
                "Enabling channel filter on random",
                FILTERED_NOTICE,
                "Disabling channel filter"
            ]
        );
    }

    #[test]
    fn matching_filter_elides_channel_name() {
        let mut app = app();
        app.filter.set("general");
        app.handle_ui_event(UiEvent::Message(message("general")));

        let transcript = lines(&app, PaneId::Transcript);
        assert_eq!(transcript.len(), 1);
        assert!(transcript[0].ends_with("] [alice]> hi"));
        assert!(!transcript[0].contains("#general"));
    }

    #[test]
    fn select_on_empty_list_keeps_filter() {
        let mut app = app();
        app.seed_channels(Ok(Vec::new()));
        press(&mut app, KeyCode::Enter);

        assert!(!app.filter.is_active());
        assert_eq!(lines(&app, PaneId::Log), vec!["no word under the cursor at line 0"]);
    }

    #[test]
    fn arrows_ignored_outside_the_channel_list() {
        let mut app = app();
        app.seed_channels(Ok(vec![
            conversation("C1", "alpha", ChannelKind::Public),
            conversation("C2", "beta", ChannelKind::Public),
        ]));
        app.router.surface_mut().focus(PaneId::Transcript).unwrap();

        press(&mut app, KeyCode::Down);
        assert_eq!(app.router.pane(PaneId::ChannelList).unwrap().cursor(), 0);
    }

    #[test]
    fn resize_keeps_the_selected_channel_on_screen() {
        let mut app = app();
        let listing = (0..50)
            .map(|i| {
                let name = format!("chan{:02}", i);
                conversation(&format!("C{}", i), &name, ChannelKind::Public)
            })
            .collect();
        app.seed_channels(Ok(listing));

        let list = |app: &App| app.router.pane(PaneId::ChannelList).unwrap().clone();
        assert!(list(&app).visible_range().contains(&0));

        app.layout(Rect::new(0, 0, 100, 29));
        let pane = list(&app);
        assert!(pane.visible_range().contains(&pane.cursor()));

        for _ in 0..30 {
            press(&mut app, KeyCode::Down);
        }
        app.layout(Rect::new(0, 0, 100, 20));
        let pane = list(&app);
        assert_eq!(pane.cursor(), 30);
        assert!(pane.visible_range().contains(&30));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filter.active(), Some("chan30"));
    }

    #[test]
    fn ctrl_c_quits_cleanly() {
        let mut app = app();
        app.handle_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(app.exit, Some(ExitReason::Quit));
        assert_eq!(lines(&app, PaneId::Log), vec!["Quitting ..."]);
    }

    #[test]
    fn shutdown_event_sets_exit_reason() {
        let mut app = app();
        app.handle_ui_event(UiEvent::Shutdown(ExitReason::InvalidCredentials));
        assert_eq!(app.exit, Some(ExitReason::InvalidCredentials));
    }

    #[test]
    fn writes_keep_focus_on_the_channel_list() {
        let mut app = app();
        app.handle_ui_event(UiEvent::Log("one".to_string()));
        app.handle_ui_event(UiEvent::Message(message("general")));
        assert_eq!(app.router.surface().focused(), Some(PaneId::ChannelList));
    }
}
