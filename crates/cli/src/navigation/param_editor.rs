//! Per-invocation parameter editing before a cheat is run or copied.

use std::io::Write;

use arsenal_core::error::Result;
use arsenal_core::parameters::{ParameterLookup, Resolution};

use super::colors::Role;
use super::draw::{right_align, wrap_text, Canvas, Paint};
use super::flow::Flow;
use super::text_input::TextInput;
use super::types::{Key, Step};

const LABEL_WIDTH: usize = 20;
const PREVIEW_LINES: usize = 4;
const FIRST_PARAMETER_ROW: usize = 7;

/// Edits the values of one command's parameters, layered over the globals.
///
/// Finishes with the filled command, or cancels.
pub struct ParameterEditor<'a, L: ParameterLookup + ?Sized> {
    resolution: Resolution,
    globals: &'a L,
    selected: usize,
    editing: Option<TextInput>,
}

impl<'a, L: ParameterLookup + ?Sized> ParameterEditor<'a, L> {
    pub fn new(command: &str, globals: &'a L) -> Self {
        Self {
            resolution: Resolution::new(command, globals),
            globals,
            selected: 0,
            editing: None,
        }
    }

    /// The filled command when there is nothing to edit.
    pub fn immediate(&self) -> Option<String> {
        self.resolution
            .is_empty()
            .then(|| self.resolution.resolve(self.globals))
    }

    /// The command as it would be delivered right now.
    pub fn preview(&self) -> String {
        self.resolution.resolve(self.globals)
    }

    fn handle_edit(&mut self, key: Key) {
        let Some(input) = self.editing.as_mut() else {
            return;
        };

        match input.handle(key) {
            Step::Continue => {}
            Step::Done(value) => {
                self.resolution.set_at(self.selected, value);
                self.editing = None;
            }
            Step::Cancelled => self.editing = None,
        }
    }
}

impl<L: ParameterLookup + ?Sized> Flow for ParameterEditor<'_, L> {
    type Output = String;

    fn handle(&mut self, key: Key) -> Step<String> {
        if self.editing.is_some() {
            self.handle_edit(key);
            return Step::Continue;
        }

        match key {
            Key::Esc => return Step::Cancelled,
            Key::Enter => return Step::Done(self.preview()),
            Key::Down => {
                self.selected = (self.selected + 1).min(self.resolution.len().saturating_sub(1));
            }
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Char('e') => {
                if let Some(value) = self.resolution.value_at(self.selected) {
                    self.editing = Some(TextInput::new(value));
                }
            }
            _ => {}
        }
        Step::Continue
    }

    fn render<W: Write>(&self, canvas: &mut Canvas<'_, W>) -> Result<()> {
        canvas.bar(0, " PARAMETERS (e:edit, Enter:run, Esc:cancel) ")?;

        let width = canvas.width();
        for (i, line) in wrap_text(&self.preview(), width.saturating_sub(2))
            .iter()
            .take(PREVIEW_LINES)
            .enumerate()
        {
            canvas.text(1, 2 + i, line, Paint::new(Role::Value))?;
        }
        canvas.divider(FIRST_PARAMETER_ROW - 1)?;

        let last_row = canvas.height().saturating_sub(2);
        for (i, (name, value)) in self.resolution.entries().enumerate() {
            let y = FIRST_PARAMETER_ROW + i;
            if y >= last_row {
                break;
            }

            let label = right_align(&format!("{name}: "), LABEL_WIDTH);
            let is_selected = i == self.selected;

            match &self.editing {
                Some(input) if is_selected => {
                    canvas.text(0, y, &label, Paint::new(Role::Label))?;
                    canvas.text(LABEL_WIDTH, y, &format!("{}█", input.text()), Paint::new(Role::Input))?;
                }
                _ => {
                    let shown = if value.is_empty() { "<empty>" } else { value };
                    let value_role = if value.is_empty() { Role::Plain } else { Role::Value };
                    canvas.text(0, y, &label, Paint::new(Role::Label).selected_if(is_selected))?;
                    canvas.text(LABEL_WIDTH, y, shown, Paint::new(value_role).selected_if(is_selected))?;
                }
            }
        }

        let status = if self.editing.is_some() {
            " Enter:done  Esc:cancel "
        } else {
            " ↑↓:nav  e:edit  Enter:run  Esc:cancel "
        };
        canvas.bar(canvas.height().saturating_sub(1), status)
    }
}
