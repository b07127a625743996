//! Keyboard decoding and the main screen's key map.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::types::{Intent, Key};

/// Decodes a terminal event into a [`Key`].
///
/// Releases, mouse and resize events, and keys without a binding anywhere
/// decode to `None`.
pub fn decode_event(event: &Event) -> Option<Key> {
    match event {
        Event::Key(key_event) => decode_key(key_event),
        _ => None,
    }
}

pub fn decode_key(key_event: &KeyEvent) -> Option<Key> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match key_event.code {
        KeyCode::Char(c) if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) if c.is_control() => return None,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };

    Some(key)
}

impl Intent {
    /// Maps a key on the main screen. `q` only quits while the query is empty;
    /// otherwise it is typed like any other character.
    pub fn from_key(key: Key, query_is_empty: bool) -> Self {
        match key {
            Key::Ctrl('q' | 'c') => Intent::Quit,
            Key::Char('q') if query_is_empty => Intent::Quit,
            Key::Ctrl('o') => Intent::CopyResolved,
            Key::Ctrl('y') => Intent::CopyRaw,
            Key::Ctrl('v') => Intent::ToggleView,
            Key::Ctrl('p') => Intent::SwitchVault,
            Key::Ctrl('g') => Intent::EditGlobals,
            Key::Ctrl('a') => Intent::AddCheat,
            Key::Ctrl('d') | Key::PageDown => Intent::PageDown,
            Key::Ctrl('u') | Key::PageUp => Intent::PageUp,
            Key::Ctrl(_) => Intent::Ignore,
            Key::Char(c) => Intent::Type(c),
            Key::Enter => Intent::Activate,
            Key::Esc => Intent::Clear,
            Key::Backspace => Intent::Backspace,
            Key::Tab => Intent::ToggleFocus,
            Key::Up => Intent::Up,
            Key::Down => Intent::Down,
            Key::Left => Intent::PreviousTag,
            Key::Right => Intent::NextTag,
        }
    }
}
