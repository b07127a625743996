//! Rendering of the main browsing screen.

use std::io::Write;

use arsenal_core::error::Result;
use arsenal_core::parameters::{fill, ParameterLookup};
use arsenal_core::store::CheatStore;
use itertools::Itertools;

use super::colors::Role;
use super::controller::{Frame, Navigation};
use super::draw::{fit, short_tag, truncate, wrap_text, Canvas, Highlight, Paint};
use super::types::{DisplayEntry, Focus, ViewMode};

const TAG_ROW: usize = 1;
const SEARCH_ROW: usize = 2;
const FIRST_LIST_ROW: usize = 4;
const MAX_VISIBLE_TAGS: usize = 12;

const KEY_HINTS: &str = "Enter:run  ^O:copy  ^V:view  ^P:vault  ^G:globals  q:quit";

/// Draws the whole main screen for `frame`.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn render_main<W: Write, L: ParameterLookup + ?Sized>(
    canvas: &mut Canvas<'_, W>,
    navigation: &Navigation,
    frame: &Frame,
    store: &CheatStore,
    globals: &L,
) -> Result<()> {
    canvas.bar(0, &header(navigation, frame))?;
    canvas.text(0, TAG_ROW, &tag_bar(frame, &navigation.active_tag), Paint::new(Role::Label))?;

    let search = match navigation.focus {
        Focus::Search => (format!("> {}█", navigation.query), Role::Input),
        Focus::List => (format!("> {}", navigation.query), Role::Value),
    };
    canvas.text(0, SEARCH_ROW, &search.0, Paint::new(search.1))?;

    draw_list(canvas, navigation, frame, store)?;

    let preview_row = FIRST_LIST_ROW + navigation.window_height;
    canvas.divider(preview_row)?;
    draw_preview(canvas, navigation, frame, store, globals, preview_row)?;

    let status = fit(
        &format!(" {} | {KEY_HINTS} ", navigation.status),
        canvas.width(),
    );
    canvas.text(0, canvas.height().saturating_sub(1), &status, Paint::new(Role::Bar))
}

fn header(navigation: &Navigation, frame: &Frame) -> String {
    let mode = match navigation.view_mode {
        ViewMode::Flat => "FLAT",
        ViewMode::Tree => "TREE",
    };
    let tag = short_tag(&navigation.active_tag);
    let counts = format!("[{}/{}]", frame.filtered_len, frame.pool_len);

    if !navigation.query.is_empty() && frame.tags.len() < frame.total_tags {
        format!(" ARSENAL [{tag}] {counts} ({} tags) [{mode}] ", frame.tags.len())
    } else {
        format!(" ARSENAL [{tag}] {counts} [{mode}] ")
    }
}

/// A window of at most [`MAX_VISIBLE_TAGS`] tags around the active one, with
/// arrows where tags are cut off.
pub fn tag_bar(frame: &Frame, active_tag: &str) -> String {
    let count = frame.tags.len();
    let position = frame.tag_position(active_tag).unwrap_or(0);

    let mut start = position.saturating_sub(MAX_VISIBLE_TAGS / 2);
    let end = (start + MAX_VISIBLE_TAGS).min(count);
    if end - start < MAX_VISIBLE_TAGS {
        start = end.saturating_sub(MAX_VISIBLE_TAGS);
    }

    let shown = frame.tags[start..end]
        .iter()
        .map(|tag| {
            if tag == active_tag {
                format!("[{}] ", short_tag(tag))
            } else {
                format!(" {}  ", short_tag(tag))
            }
        })
        .join("");

    let before = if start > 0 { "◀ " } else { "  " };
    let after = if end < count { "▶" } else { "" };
    format!("{before}{shown}{after}")
}

fn draw_list<W: Write>(
    canvas: &mut Canvas<'_, W>,
    navigation: &Navigation,
    frame: &Frame,
    store: &CheatStore,
) -> Result<()> {
    if store.is_empty() {
        return canvas.text(
            0,
            FIRST_LIST_ROW,
            "No cheats found! Check the cheat paths of this vault",
            Paint::new(Role::Label),
        );
    }

    let width = canvas.width();
    let title_width = width / 3;
    let highlight = match navigation.focus {
        Focus::List => Highlight::Reverse,
        Focus::Search => Highlight::Underline,
    };

    let visible = navigation
        .cursor
        .visible(frame.entries.len(), navigation.window_height);

    for (row, index) in visible.enumerate() {
        let y = FIRST_LIST_ROW + row;
        let emphasis = if index == navigation.cursor.selection {
            highlight
        } else {
            Highlight::None
        };

        match &frame.entries[index] {
            DisplayEntry::Tool {
                name,
                count,
                expanded,
            } => {
                let marker = if *expanded { "▼" } else { "▶" };
                canvas.text(
                    0,
                    y,
                    &fit(&format!("{marker} {name} ({count})"), width.saturating_sub(1)),
                    Paint::new(Role::Label).bold().highlighted(emphasis),
                )?;
            }
            DisplayEntry::Cheat { id, nested } => {
                let Some(cheat) = store.get(*id) else {
                    continue;
                };
                let title = if *nested {
                    format!("  {}", truncate(&cheat.title, title_width.saturating_sub(3)))
                } else {
                    truncate(&cheat.title, title_width.saturating_sub(1)).to_string()
                };
                let command = cheat.one_line_command();

                canvas.text(
                    0,
                    y,
                    &fit(&title, title_width),
                    Paint::new(Role::Label).highlighted(emphasis),
                )?;
                canvas.text(
                    title_width,
                    y,
                    &fit(
                        truncate(&command, (width * 2 / 3).saturating_sub(2)),
                        width.saturating_sub(title_width + 1),
                    ),
                    Paint::new(Role::Value).highlighted(emphasis),
                )?;
            }
        }
    }

    Ok(())
}

fn draw_preview<W: Write, L: ParameterLookup + ?Sized>(
    canvas: &mut Canvas<'_, W>,
    navigation: &Navigation,
    frame: &Frame,
    store: &CheatStore,
    globals: &L,
    preview_row: usize,
) -> Result<()> {
    let available = canvas.height().saturating_sub(preview_row + 3).max(1);

    match frame.selected(&navigation.cursor) {
        Some(DisplayEntry::Tool { name, count, .. }) => {
            canvas.text(
                0,
                preview_row + 1,
                &format!("{name} - {count} commands"),
                Paint::new(Role::Label).bold(),
            )?;
            canvas.text(
                0,
                preview_row + 2,
                "Press Enter to expand/collapse",
                Paint::new(Role::Value),
            )?;
        }
        Some(DisplayEntry::Cheat { id, .. }) => {
            let Some(cheat) = store.get(*id) else {
                return Ok(());
            };
            canvas.text(0, preview_row + 1, &cheat.title, Paint::new(Role::Label).bold())?;

            let wrapped = wrap_text(
                &fill(&cheat.command, globals),
                canvas.width().saturating_sub(1),
            );
            for (i, line) in wrapped.iter().take(available).enumerate() {
                canvas.text(0, preview_row + 2 + i, line, Paint::new(Role::Value))?;
            }
            if wrapped.len() > available {
                canvas.text(
                    0,
                    preview_row + 2 + available,
                    &format!("... ({} more lines)", wrapped.len() - available),
                    Paint::new(Role::Label),
                )?;
            }
        }
        None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_tags(count: usize) -> Frame {
        let mut tags = vec!["all".to_string()];
        tags.extend((1..count).map(|i| format!("cat/t{i:02}")));
        Frame {
            total_tags: tags.len(),
            tags,
            ..Frame::default()
        }
    }

    #[test]
    fn test_tag_bar_short_list() {
        let frame = frame_with_tags(3);
        assert_eq!(tag_bar(&frame, "cat/t01"), "   all  [t01]  t02  ");
    }

    #[test]
    fn test_tag_bar_window_slides_with_markers() {
        let frame = frame_with_tags(30);

        let at_start = tag_bar(&frame, "all");
        assert!(at_start.starts_with("  [all]"));
        assert!(at_start.ends_with('▶'));

        let middle = tag_bar(&frame, "cat/t15");
        assert!(middle.starts_with("◀ "));
        assert!(middle.contains("[t15]"));
        assert!(middle.contains(" t09 "));
        assert!(!middle.contains(" t08 "));
        assert!(middle.ends_with('▶'));

        let at_end = tag_bar(&frame, "cat/t29");
        assert!(at_end.starts_with("◀ "));
        assert!(at_end.contains(" t18 "));
        assert!(!at_end.ends_with('▶'));
    }

    #[test]
    fn test_header_shows_tag_count_only_when_narrowed() {
        let mut navigation = Navigation::new("default");
        let mut frame = frame_with_tags(5);
        frame.filtered_len = 2;
        frame.pool_len = 9;

        assert_eq!(header(&navigation, &frame), " ARSENAL [all] [2/9] [FLAT] ");

        navigation.query = "t0".to_string();
        frame.tags.truncate(3);
        navigation.view_mode = ViewMode::Tree;
        assert_eq!(
            header(&navigation, &frame),
            " ARSENAL [all] [2/9] (3 tags) [TREE] "
        );
    }
}
