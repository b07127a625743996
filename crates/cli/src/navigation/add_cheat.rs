//! Form for typing in a new cheat.

use std::io::Write;

use arsenal_core::cheat::NewCheat;
use arsenal_core::error::Result;

use super::colors::Role;
use super::draw::{right_align, truncate, Canvas, Paint};
use super::flow::Flow;
use super::text_input::TextInput;
use super::types::{Key, Step};

const LABEL_WIDTH: usize = 12;
const FIRST_FIELD_ROW: usize = 8;
const PREVIEW_ROW: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Command,
    Tags,
}

const FIELDS: [Field; 3] = [Field::Title, Field::Command, Field::Tags];

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Command => "command",
            Field::Tags => "tags",
        }
    }
}

/// Collects a title, a possibly multi-line command and space-separated tags.
///
/// Finishes with the completed cheat once both title and command are set.
#[derive(Debug, Default)]
pub struct AddCheatForm {
    draft: NewCheat,
    selected: usize,
    editing: Option<TextInput>,
}

impl AddCheatForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &NewCheat {
        &self.draft
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.draft.title,
            Field::Command => &self.draft.command,
            Field::Tags => &self.draft.tags,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.draft.title,
            Field::Command => &mut self.draft.command,
            Field::Tags => &mut self.draft.tags,
        }
    }

    fn selected_field(&self) -> Field {
        FIELDS[self.selected]
    }

    fn start_edit(&mut self) {
        let field = self.selected_field();
        let value = self.value(field);
        self.editing = Some(if field == Field::Command {
            TextInput::multiline(value)
        } else {
            TextInput::new(value)
        });
    }

    fn handle_edit(&mut self, key: Key) {
        let Some(input) = self.editing.as_mut() else {
            return;
        };

        match input.handle(key) {
            Step::Continue => {}
            Step::Done(value) => {
                *self.value_mut(self.selected_field()) = value;
                self.editing = None;
            }
            Step::Cancelled => self.editing = None,
        }
    }
}

/// Field values on one line, newlines shown as `\n`.
fn one_line(value: &str) -> String {
    if value.is_empty() {
        "<empty>".to_string()
    } else {
        value.replace('\n', "\\n")
    }
}

impl Flow for AddCheatForm {
    type Output = NewCheat;

    fn handle(&mut self, key: Key) -> Step<NewCheat> {
        if self.editing.is_some() {
            self.handle_edit(key);
            return Step::Continue;
        }

        match key {
            Key::Esc => return Step::Cancelled,
            Key::Enter if self.draft.is_complete() => return Step::Done(self.draft.clone()),
            Key::Down => self.selected = (self.selected + 1).min(FIELDS.len() - 1),
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Char('e') => self.start_edit(),
            _ => {}
        }
        Step::Continue
    }

    fn render<W: Write>(&self, canvas: &mut Canvas<'_, W>) -> Result<()> {
        canvas.bar(0, " ADD NEW CHEAT (e:edit, Enter:save, Esc:cancel) ")?;

        let hint = Paint::new(Role::Label);
        canvas.text(2, 2, "Title: Name for the command", hint)?;
        canvas.text(2, 3, "Command: Use <param> for variables (e.g., nmap <ip>)", hint)?;
        canvas.text(2, 4, "Tags: Space-separated (e.g., cat/recon cat/nmap)", hint)?;
        canvas.divider(6)?;

        let width = canvas.width();
        let last_row = canvas.height().saturating_sub(2);

        for (i, field) in FIELDS.iter().copied().enumerate() {
            let y = FIRST_FIELD_ROW + i * 2;
            let label = right_align(&format!("{}: ", field.label()), LABEL_WIDTH);
            let selected = i == self.selected;

            match &self.editing {
                Some(input) if selected => {
                    canvas.text(0, y, &label, Paint::new(Role::Label))?;
                    let mut lines = input.text().split('\n');
                    let first = lines.next().unwrap_or_default();
                    canvas.text(LABEL_WIDTH, y, &format!("{first}█"), Paint::new(Role::Input))?;
                    for (j, line) in lines.enumerate() {
                        if y + j + 1 < last_row {
                            canvas.text(LABEL_WIDTH, y + j + 1, line, Paint::new(Role::Input))?;
                        }
                    }
                }
                _ => {
                    let value = self.value(field);
                    let role = if value.is_empty() { Role::Plain } else { Role::Value };
                    let shown = one_line(value);
                    canvas.text(0, y, &label, Paint::new(Role::Label).selected_if(selected))?;
                    canvas.text(
                        LABEL_WIDTH,
                        y,
                        truncate(&shown, width.saturating_sub(LABEL_WIDTH + 2)),
                        Paint::new(role).selected_if(selected),
                    )?;
                }
            }
        }

        if self.draft.is_complete() {
            canvas.divider(PREVIEW_ROW)?;
            canvas.text(2, PREVIEW_ROW + 1, "Preview:", Paint::new(Role::Label).bold())?;
            canvas.text(
                2,
                PREVIEW_ROW + 2,
                &format!("## {}", self.draft.title),
                Paint::new(Role::Value),
            )?;
            for (i, line) in self.draft.command.split('\n').take(3).enumerate() {
                canvas.text(2, PREVIEW_ROW + 3 + i, line, Paint::new(Role::Value))?;
            }
        }

        let status = match &self.editing {
            Some(input) if input.is_multiline() => " Enter:newline  ^D:done  Esc:cancel ",
            Some(_) => " Enter:done  Esc:cancel ",
            None => " ↑↓:nav  e:edit  Enter:save  Esc:cancel ",
        };
        canvas.bar(canvas.height().saturating_sub(1), status)
    }
}
