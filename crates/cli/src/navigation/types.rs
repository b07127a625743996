//! Type definitions for the navigation screen and its sub-flows.

use std::fmt::{Display, Formatter};

use arsenal_core::store::CheatId;

/// Which half of the main screen receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    List,
}

/// How the filtered cheats are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Flat,
    Tree,
}

impl ViewMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Flat => ViewMode::Tree,
            ViewMode::Tree => ViewMode::Flat,
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Flat => f.write_str("flat"),
            ViewMode::Tree => f.write_str("tree"),
        }
    }
}

/// One selectable row of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEntry {
    /// A tool header in tree view.
    Tool {
        name: String,
        count: usize,
        expanded: bool,
    },
    /// A cheat; `nested` when it sits under an expanded tool header.
    Cheat { id: CheatId, nested: bool },
}

impl DisplayEntry {
    pub fn cheat_id(&self) -> Option<CheatId> {
        match self {
            DisplayEntry::Cheat { id, .. } => Some(*id),
            DisplayEntry::Tool { .. } => None,
        }
    }
}

/// A decoded key press.
///
/// `Ctrl` carries the lowercase letter pressed together with Control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
}

/// What the main screen does with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Type(char),
    Backspace,
    Clear,
    ToggleFocus,
    PreviousTag,
    NextTag,
    Up,
    Down,
    PageUp,
    PageDown,
    Activate,
    CopyResolved,
    CopyRaw,
    ToggleView,
    SwitchVault,
    EditGlobals,
    AddCheat,
    Quit,
    Ignore,
}

/// Work the main screen hands back to the application loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Resolve parameters, then deliver to tmux or the clipboard.
    Run(CheatId),
    /// Resolve parameters, then always copy.
    CopyResolved(CheatId),
    /// Copy the command verbatim.
    CopyRaw(CheatId),
    SwitchVault,
    EditGlobals,
    AddCheat,
}

/// Result of feeding one key to a sub-flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    Continue,
    Done(T),
    Cancelled,
}
