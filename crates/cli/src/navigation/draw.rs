//! Drawing primitives shared by every screen.
//!
//! All output is queued; [`Canvas::finish`] flushes a whole frame at once.

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};

use arsenal_core::error::Result;

use super::colors::{AsTermColors, Role};

/// How a row is emphasised when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Reverse,
    Underline,
}

/// Role plus emphasis for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub role: Role,
    pub bold: bool,
    pub highlight: Highlight,
}

impl Paint {
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            bold: false,
            highlight: Highlight::None,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn highlighted(mut self, highlight: Highlight) -> Self {
        self.highlight = highlight;
        self
    }

    /// Reverse video when `selected`, otherwise unchanged.
    #[must_use]
    pub const fn selected_if(self, selected: bool) -> Self {
        if selected {
            self.highlighted(Highlight::Reverse)
        } else {
            self
        }
    }
}

/// One frame being drawn onto a terminal of a fixed size.
pub struct Canvas<'a, W: Write> {
    out: &'a mut W,
    width: u16,
    height: u16,
}

impl<'a, W: Write> Canvas<'a, W> {
    /// Starts a frame by clearing the screen.
    pub fn new(out: &'a mut W, (width, height): (u16, u16)) -> Result<Self> {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(Self { out, width, height })
    }

    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Writes `text` at column `x` of row `y`, cut to stay clear of the last
    /// column. Text starting outside the screen is dropped.
    pub fn text(&mut self, x: usize, y: usize, text: &str, paint: Paint) -> Result<()> {
        if y >= self.height() || x >= self.width() {
            return Ok(());
        }

        let visible = truncate(text, self.width() - x - 1);
        if visible.is_empty() {
            return Ok(());
        }

        let (foreground, background) = paint.role.as_crossterm_colors();
        // Coordinates are bounded by the u16 terminal size above
        queue!(self.out, MoveTo(x as u16, y as u16))?;
        if let Some(color) = foreground {
            queue!(self.out, SetForegroundColor(color))?;
        }
        if let Some(color) = background {
            queue!(self.out, SetBackgroundColor(color))?;
        }
        if paint.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        match paint.highlight {
            Highlight::Reverse => queue!(self.out, SetAttribute(Attribute::Reverse))?,
            Highlight::Underline => queue!(self.out, SetAttribute(Attribute::Underlined))?,
            Highlight::None => {}
        }

        queue!(
            self.out,
            Print(visible),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        Ok(())
    }

    /// A full-width bar with `text` centred, as used for headers and status.
    pub fn bar(&mut self, y: usize, text: &str) -> Result<()> {
        let line = center(text, self.width());
        self.text(0, y, &line, Paint::new(Role::Bar).bold())
    }

    /// A horizontal rule across the screen.
    pub fn divider(&mut self, y: usize) -> Result<()> {
        let rule = "─".repeat(self.width());
        self.text(0, y, &rule, Paint::new(Role::Label))
    }

    /// Flushes everything queued for this frame.
    pub fn finish(self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// The first `max_chars` characters of `text`.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// `text` padded with spaces to `width` characters, or cut to it.
pub fn fit(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width))
}

/// `text` padded on the left to `width` characters.
pub fn right_align(text: &str, width: usize) -> String {
    format!("{text:>width$}")
}

/// `text` centred in `width` columns.
pub fn center(text: &str, width: usize) -> String {
    format!("{text:^width$}")
}

/// Wraps each line of `text` to `width` characters, breaking at the last
/// space before the limit when there is one.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut wrapped = Vec::new();

    for line in text.split('\n') {
        let mut rest: Vec<char> = line.chars().collect();
        if rest.len() <= width {
            wrapped.push(line.to_string());
            continue;
        }

        while rest.len() > width {
            let break_at = rest[..width]
                .iter()
                .rposition(|&c| c == ' ')
                .filter(|&i| i > 0)
                .unwrap_or(width);
            wrapped.push(rest[..break_at].iter().collect());

            let remainder: String = rest[break_at..].iter().collect();
            rest = remainder.trim_start().chars().collect();
        }
        if !rest.is_empty() {
            wrapped.push(rest.into_iter().collect());
        }
    }

    wrapped
}

/// Last `/` segment of a tag, for compact display.
pub fn short_tag(tag: &str) -> &str {
    tag.rsplit('/').next().unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_breaks_at_spaces() {
        assert_eq!(
            wrap_text("nmap -sV -p- 10.0.0.1", 10),
            vec!["nmap -sV", "-p-", "10.0.0.1"]
        );
    }

    #[test]
    fn test_wrap_hard_breaks_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_existing_lines() {
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("▶ nmap", 3), "▶ n");
        assert_eq!(truncate("ab", 5), "ab");
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(right_align("ip: ", 6), "  ip: ");
    }

    #[test]
    fn test_short_tag() {
        assert_eq!(short_tag("cat/recon"), "recon");
        assert_eq!(short_tag("all"), "all");
    }

    #[test]
    fn test_canvas_drops_offscreen_text() {
        let mut out = Vec::new();
        let mut canvas = Canvas::new(&mut out, (10, 2)).unwrap();
        canvas.text(0, 5, "hidden", Paint::new(Role::Plain)).unwrap();
        canvas.text(0, 1, "visible text", Paint::new(Role::Plain)).unwrap();
        canvas.finish().unwrap();

        let printed = String::from_utf8_lossy(&out);
        assert!(!printed.contains("hidden"));
        assert!(printed.contains("visible t"));
        assert!(!printed.contains("visible te"));
    }
}
