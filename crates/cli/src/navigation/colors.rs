use crossterm::style::Color;

/// What a piece of screen text is, which decides its colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Titles, labels, tool headers.
    Label,
    /// Commands and values.
    Value,
    /// The active text entry.
    Input,
    /// Header and status bars.
    Bar,
    /// Terminal defaults.
    Plain,
}

/// Conversion of a screen role to terminal colours.
pub trait AsTermColors {
    /// Foreground and background; `None` leaves the terminal default.
    fn as_crossterm_colors(&self) -> (Option<Color>, Option<Color>);
}

impl AsTermColors for Role {
    fn as_crossterm_colors(&self) -> (Option<Color>, Option<Color>) {
        match self {
            Role::Label | Role::Input => (Some(Color::Red), None),
            Role::Value => (Some(Color::White), None),
            Role::Bar => (Some(Color::White), Some(Color::Red)),
            Role::Plain => (None, None),
        }
    }
}
