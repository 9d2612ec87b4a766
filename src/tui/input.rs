// Input dispatcher - key bindings scoped to panes
//
// Bindings map (scope, key code, modifiers) to an action. A key is looked up
// in the focused pane's scope first, then in the global scope, so arrow keys
// only move the sidebar cursor while the sidebar has focus.

use super::pane::PaneId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Where a binding applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Pane(PaneId),
}

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ClearFilter,
    CursorDown,
    CursorUp,
    /// Filter the transcript on the channel under the cursor
    SelectChannel,
}

type Binding = (Scope, KeyCode, KeyModifiers);

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<Binding, Action>,
}

impl Keymap {
    /// An empty keymap
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a key; a later binding for the same key and scope replaces it
    pub fn bind(&mut self, scope: Scope, code: KeyCode, modifiers: KeyModifiers, action: Action) {
        self.bindings.insert((scope, code, modifiers), action);
    }

    /// Find the action for a key event given the focused pane
    pub fn resolve(&self, focused: Option<PaneId>, key: &KeyEvent) -> Option<Action> {
        let scoped = focused.and_then(|pane| {
            self.bindings
                .get(&(Scope::Pane(pane), key.code, key.modifiers))
                .copied()
        });

        scoped.or_else(|| {
            self.bindings
                .get(&(Scope::Global, key.code, key.modifiers))
                .copied()
        })
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::new();
        let list = Scope::Pane(PaneId::ChannelList);

        keymap.bind(Scope::Global, KeyCode::Char('c'), KeyModifiers::CONTROL, Action::Quit);
        keymap.bind(Scope::Global, KeyCode::Tab, KeyModifiers::NONE, Action::ClearFilter);
        keymap.bind(list, KeyCode::Down, KeyModifiers::NONE, Action::CursorDown);
        keymap.bind(list, KeyCode::Up, KeyModifiers::NONE, Action::CursorUp);
        keymap.bind(list, KeyCode::Enter, KeyModifiers::NONE, Action::SelectChannel);
        keymap
    }
}
