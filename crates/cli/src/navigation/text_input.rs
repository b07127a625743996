//! Single-field text entry used by the editors.

use super::types::{Key, Step};

/// An edit buffer. In multi-line mode Enter inserts a newline and Ctrl+D
/// finishes; otherwise Enter finishes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInput {
    buffer: String,
    multiline: bool,
}

impl TextInput {
    pub fn new(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
            multiline: false,
        }
    }

    pub fn multiline(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
            multiline: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Feeds one key. `Done` carries the finished text; `Cancelled` means the
    /// edit was abandoned and the original value stands.
    pub fn handle(&mut self, key: Key) -> Step<String> {
        match key {
            Key::Enter if self.multiline => self.buffer.push('\n'),
            Key::Enter => return Step::Done(self.buffer.clone()),
            Key::Ctrl('d') if self.multiline => return Step::Done(self.buffer.clone()),
            Key::Esc => return Step::Cancelled,
            Key::Backspace => {
                self.buffer.pop();
            }
            Key::Char(c) => self.buffer.push(c),
            _ => {}
        }
        Step::Continue
    }
}
