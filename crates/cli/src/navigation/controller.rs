//! The main screen's state machine.
//!
//! [`Navigation::refresh`] derives everything the screen shows from the
//! current state and the loaded cheats; [`Navigation::handle`] applies one
//! intent to the state and reports the work the application loop has to do.
//! Neither touches the terminal.

use std::collections::HashSet;

use arsenal_core::store::{CheatId, CheatStore, ALL_TAG};
use arsenal_core::tool_tree::ToolTree;
use log::debug;

use super::cursor::ListCursor;
use super::types::{Action, DisplayEntry, Focus, Intent, ViewMode};

/// Rows taken by everything other than the list on the main screen.
pub const CHROME_ROWS: u16 = 10;

/// List height for a terminal `height` rows tall.
pub fn list_height(height: u16) -> usize {
    usize::from(height.saturating_sub(CHROME_ROWS).max(1))
}

/// Everything derived from [`Navigation`] and the store for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Tags offered for browsing under the current query.
    pub tags: Vec<String>,
    /// Total number of tags in the store.
    pub total_tags: usize,
    /// Size of the active tag's bucket.
    pub pool_len: usize,
    /// Cheats in the bucket that match the query.
    pub filtered_len: usize,
    pub entries: Vec<DisplayEntry>,
}

impl Frame {
    pub fn selected(&self, cursor: &ListCursor) -> Option<&DisplayEntry> {
        self.entries.get(cursor.selection)
    }

    /// Position of `tag` among the browsable tags.
    pub fn tag_position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }
}

/// Navigation state of the main screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub query: String,
    pub active_vault: String,
    pub active_tag: String,
    pub view_mode: ViewMode,
    pub focus: Focus,
    pub cursor: ListCursor,
    pub expanded_tools: HashSet<String>,
    pub window_height: usize,
    pub status: String,
}

impl Navigation {
    pub fn new(active_vault: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            active_vault: active_vault.into(),
            active_tag: ALL_TAG.to_string(),
            view_mode: ViewMode::Flat,
            focus: Focus::Search,
            cursor: ListCursor::default(),
            expanded_tools: HashSet::new(),
            window_height: 1,
            status: String::new(),
        }
    }

    /// Returns to the initial browsing position after the store was replaced.
    pub fn reset_for_reload(&mut self) {
        self.active_tag = ALL_TAG.to_string();
        self.query.clear();
        self.cursor.reset();
        self.expanded_tools.clear();
    }

    /// Recomputes the displayed entries, fixing up the active tag, the
    /// selection and the scroll offset along the way.
    pub fn refresh(&mut self, store: &CheatStore) -> Frame {
        let index = store.tag_index();
        let lowercase_query = self.query.to_lowercase();

        let mut tags: Vec<String> = index
            .tags()
            .filter(|tag| {
                lowercase_query.is_empty()
                    || *tag == ALL_TAG
                    || tag.to_lowercase().contains(&lowercase_query)
            })
            .map(ToString::to_string)
            .collect();
        if tags.is_empty() {
            tags.push(ALL_TAG.to_string());
        }

        if !tags.contains(&self.active_tag) {
            debug!("Tag `{}` filtered out, switching to `{}`", self.active_tag, tags[0]);
            self.active_tag = tags[0].clone();
        }

        let pool = index.bucket(&self.active_tag).unwrap_or_default();
        let filtered: Vec<CheatId> = pool
            .iter()
            .copied()
            .filter(|&id| {
                lowercase_query.is_empty()
                    || store.get(id).is_some_and(|cheat| cheat.matches(&lowercase_query))
            })
            .collect();

        let entries = match self.view_mode {
            ViewMode::Flat => filtered
                .iter()
                .map(|&id| DisplayEntry::Cheat { id, nested: false })
                .collect(),
            ViewMode::Tree => self.tree_entries(store, &filtered),
        };

        self.cursor.clamp(entries.len(), self.window_height);

        Frame {
            tags,
            total_tags: index.len(),
            pool_len: pool.len(),
            filtered_len: filtered.len(),
            entries,
        }
    }

    fn tree_entries(&self, store: &CheatStore, filtered: &[CheatId]) -> Vec<DisplayEntry> {
        let tree = ToolTree::build(store, filtered);
        let mut entries = Vec::new();

        for (tool, members) in tree.groups() {
            let expanded = self.expanded_tools.contains(tool);
            entries.push(DisplayEntry::Tool {
                name: tool.to_string(),
                count: members.len(),
                expanded,
            });
            if expanded {
                entries.extend(
                    members
                        .iter()
                        .map(|&id| DisplayEntry::Cheat { id, nested: true }),
                );
            }
        }

        entries
    }

    /// Applies `intent` against the entries of the last refreshed `frame`.
    pub fn handle(&mut self, intent: Intent, frame: &Frame) -> Action {
        let len = frame.entries.len();

        match intent {
            Intent::Type(c) => {
                self.query.push(c);
                self.after_query_change();
            }
            Intent::Backspace => {
                self.query.pop();
                self.after_query_change();
            }
            Intent::Clear => {
                if self.query.is_empty() {
                    self.focus = Focus::Search;
                } else {
                    self.query.clear();
                    self.cursor.reset();
                }
            }
            Intent::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Search => Focus::List,
                    Focus::List => Focus::Search,
                };
            }
            Intent::PreviousTag => self.cycle_tag(frame, false),
            Intent::NextTag => self.cycle_tag(frame, true),
            Intent::Down => match self.focus {
                Focus::Search => self.focus = Focus::List,
                Focus::List => self.cursor.down(len),
            },
            Intent::Up => {
                if self.focus == Focus::List && self.cursor.selection > 0 {
                    self.cursor.up();
                } else {
                    self.focus = Focus::Search;
                }
            }
            Intent::PageDown => {
                self.focus = Focus::List;
                self.cursor.page_down(len, self.window_height);
            }
            Intent::PageUp => self.cursor.page_up(self.window_height),
            Intent::Activate => match frame.selected(&self.cursor) {
                Some(DisplayEntry::Tool { name, .. }) => {
                    if !self.expanded_tools.remove(name) {
                        self.expanded_tools.insert(name.clone());
                    }
                }
                Some(DisplayEntry::Cheat { id, .. }) => return Action::Run(*id),
                None => {}
            },
            Intent::CopyResolved => {
                if let Some(id) = self.selected_cheat(frame) {
                    return Action::CopyResolved(id);
                }
            }
            Intent::CopyRaw => {
                if let Some(id) = self.selected_cheat(frame) {
                    return Action::CopyRaw(id);
                }
            }
            Intent::ToggleView => {
                self.view_mode = self.view_mode.toggled();
                self.cursor.reset();
                self.expanded_tools.clear();
                self.status = format!("View: {}", self.view_mode);
            }
            Intent::SwitchVault => return Action::SwitchVault,
            Intent::EditGlobals => return Action::EditGlobals,
            Intent::AddCheat => return Action::AddCheat,
            Intent::Quit => return Action::Quit,
            Intent::Ignore => {}
        }

        Action::None
    }

    fn selected_cheat(&self, frame: &Frame) -> Option<CheatId> {
        frame
            .selected(&self.cursor)
            .and_then(DisplayEntry::cheat_id)
    }

    fn after_query_change(&mut self) {
        self.cursor.reset();
        self.focus = Focus::Search;
    }

    fn cycle_tag(&mut self, frame: &Frame, forward: bool) {
        if let Some(position) = frame.tag_position(&self.active_tag) {
            let count = frame.tags.len();
            let next = if forward {
                (position + 1) % count
            } else {
                (position + count - 1) % count
            };
            self.active_tag = frame.tags[next].clone();
        }
        self.cursor.reset();
    }
}
