//! Browsing and editing the global parameter defaults.

use std::io::Write;

use arsenal_core::error::Result;
use arsenal_core::globals::GlobalParameters;

use super::colors::Role;
use super::cursor::ListCursor;
use super::draw::{right_align, Canvas, Paint};
use super::flow::Flow;
use super::text_input::TextInput;
use super::types::{Key, Step};

const LABEL_WIDTH: usize = 22;
const FIRST_ROW: usize = 3;
const CHROME_ROWS: u16 = 5;

/// How the operator left the editor. Edits are applied in place either way;
/// only `Save` asks for them to be written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorExit {
    Save,
    Close,
}

/// Edits `globals` in place.
pub struct GlobalsEditor<'a> {
    globals: &'a mut GlobalParameters,
    query: String,
    cursor: ListCursor,
    list_height: usize,
    editing: Option<TextInput>,
}

impl<'a> GlobalsEditor<'a> {
    pub fn new(globals: &'a mut GlobalParameters) -> Self {
        Self {
            globals,
            query: String::new(),
            cursor: ListCursor::default(),
            list_height: 1,
            editing: None,
        }
    }

    /// Names whose name or value contains the query, case-insensitively.
    pub fn filtered(&self) -> Vec<String> {
        let query = self.query.to_lowercase();
        self.globals
            .iter()
            .filter(|(name, value)| {
                name.to_lowercase().contains(&query) || value.to_lowercase().contains(&query)
            })
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn selected_name(&self) -> Option<String> {
        self.filtered().into_iter().nth(self.cursor.selection)
    }

    fn handle_edit(&mut self, key: Key) {
        let Some(input) = self.editing.as_mut() else {
            return;
        };

        match input.handle(key) {
            Step::Continue => {}
            Step::Done(value) => {
                if let Some(name) = self.selected_name() {
                    self.globals.set(name, value);
                }
                self.editing = None;
            }
            Step::Cancelled => self.editing = None,
        }
    }
}

impl Flow for GlobalsEditor<'_> {
    type Output = EditorExit;

    fn set_size(&mut self, (_, height): (u16, u16)) {
        self.list_height = usize::from(height.saturating_sub(CHROME_ROWS).max(1));
        let len = self.filtered().len();
        self.cursor.clamp(len, self.list_height);
    }

    fn handle(&mut self, key: Key) -> Step<EditorExit> {
        if self.editing.is_some() {
            self.handle_edit(key);
            return Step::Continue;
        }

        let len = self.filtered().len();
        match key {
            Key::Esc | Key::Ctrl('q') => return Step::Done(EditorExit::Close),
            Key::Ctrl('s') => return Step::Done(EditorExit::Save),
            Key::Down => self.cursor.down(len),
            Key::Up => self.cursor.up(),
            Key::PageDown | Key::Ctrl('d') => self.cursor.page_down(len, self.list_height),
            Key::PageUp | Key::Ctrl('u') => self.cursor.page_up(self.list_height),
            Key::Enter => {
                if let Some(name) = self.selected_name() {
                    let value = self.globals.get(&name).unwrap_or_default();
                    self.editing = Some(TextInput::new(value));
                }
            }
            Key::Backspace => {
                self.query.pop();
                self.cursor.reset();
            }
            Key::Char(c) => {
                self.query.push(c);
                self.cursor.reset();
            }
            _ => {}
        }

        let len = self.filtered().len();
        self.cursor.clamp(len, self.list_height);
        Step::Continue
    }

    fn render<W: Write>(&self, canvas: &mut Canvas<'_, W>) -> Result<()> {
        let filtered = self.filtered();
        canvas.bar(
            0,
            &format!(" GLOBALS [{}/{}] ", filtered.len(), self.globals.len()),
        )?;

        match (&self.editing, filtered.get(self.cursor.selection)) {
            (Some(_), Some(name)) => {
                canvas.text(0, 1, &format!("  (editing {name})"), Paint::new(Role::Label))?;
            }
            _ => canvas.text(0, 1, &format!("> {}█", self.query), Paint::new(Role::Input))?,
        }

        for (row, index) in self.cursor.visible(filtered.len(), self.list_height).enumerate() {
            let name = &filtered[index];
            let value = self.globals.get(name).unwrap_or_default();
            let label = right_align(&format!("{name}: "), LABEL_WIDTH);
            let selected = index == self.cursor.selection;
            let y = FIRST_ROW + row;

            match &self.editing {
                Some(input) if selected => {
                    canvas.text(0, y, &label, Paint::new(Role::Label))?;
                    canvas.text(LABEL_WIDTH, y, &format!("{}█", input.text()), Paint::new(Role::Input))?;
                }
                _ => {
                    let (shown, role) = if value.is_empty() {
                        ("<empty>", Role::Plain)
                    } else {
                        (value, Role::Value)
                    };
                    canvas.text(0, y, &label, Paint::new(Role::Label).selected_if(selected))?;
                    canvas.text(LABEL_WIDTH, y, shown, Paint::new(role).selected_if(selected))?;
                }
            }
        }

        let status = if self.editing.is_some() {
            " typing... Enter:done  Esc:cancel "
        } else {
            " type:search  Enter:edit  ^S:save  Esc:back "
        };
        canvas.bar(canvas.height().saturating_sub(1), status)
    }
}
