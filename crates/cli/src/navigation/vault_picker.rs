//! Choosing which vault to browse.

use std::io::Write;

use arsenal_core::error::Result;
use arsenal_core::vault::Vaults;

use super::colors::Role;
use super::cursor::ListCursor;
use super::draw::{fit, Canvas, Paint};
use super::flow::Flow;
use super::types::{Key, Step};

const FIRST_ROW: usize = 4;
const CHROME_ROWS: u16 = 6;

/// Filterable list of vault names, the current vault first and the rest
/// sorted. Finishes with the chosen name.
pub struct VaultPicker<'a> {
    vaults: &'a Vaults,
    current: String,
    names: Vec<String>,
    query: String,
    cursor: ListCursor,
    list_height: usize,
}

impl<'a> VaultPicker<'a> {
    pub fn new(vaults: &'a Vaults, current: &str) -> Self {
        let mut names: Vec<String> = vaults
            .keys()
            .filter(|name| name.as_str() != current)
            .cloned()
            .collect();
        names.sort();
        if vaults.contains_key(current) {
            names.insert(0, current.to_string());
        }

        Self {
            vaults,
            current: current.to_string(),
            names,
            query: String::new(),
            cursor: ListCursor::default(),
            list_height: 1,
        }
    }

    /// Names matching the query, case-insensitively.
    pub fn filtered(&self) -> Vec<&str> {
        let query = self.query.to_lowercase();
        self.names
            .iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    fn query_changed(&mut self) {
        self.cursor.reset();
    }
}

impl Flow for VaultPicker<'_> {
    type Output = String;

    fn set_size(&mut self, (_, height): (u16, u16)) {
        self.list_height = usize::from(height.saturating_sub(CHROME_ROWS).max(1));
        let len = self.filtered().len();
        self.cursor.clamp(len, self.list_height);
    }

    fn handle(&mut self, key: Key) -> Step<String> {
        let len = self.filtered().len();

        match key {
            Key::Esc => return Step::Cancelled,
            Key::Enter => {
                return match self.filtered().get(self.cursor.selection) {
                    Some(name) => Step::Done((*name).to_string()),
                    None => Step::Cancelled,
                };
            }
            Key::Down => self.cursor.down(len),
            Key::Up => self.cursor.up(),
            Key::Backspace => {
                self.query.pop();
                self.query_changed();
            }
            Key::Char(c) => {
                self.query.push(c);
                self.query_changed();
            }
            _ => {}
        }

        let len = self.filtered().len();
        self.cursor.clamp(len, self.list_height);
        Step::Continue
    }

    fn render<W: Write>(&self, canvas: &mut Canvas<'_, W>) -> Result<()> {
        canvas.bar(0, " SELECT VAULT/PLAYBOOK ")?;
        canvas.text(0, 2, &format!("> {}█", self.query), Paint::new(Role::Input))?;

        let width = canvas.width();
        let name_width = width / 3;
        let filtered = self.filtered();

        for (row, index) in self.cursor.visible(filtered.len(), self.list_height).enumerate() {
            let name = filtered[index];
            let path = self
                .vaults
                .get(name)
                .and_then(|vault| vault.source_paths.first())
                .map_or_else(|| "?".to_string(), |path| path.display().to_string());

            let marker = if name == self.current { "● " } else { "  " };
            let selected = index == self.cursor.selection;
            let y = FIRST_ROW + row;

            canvas.text(
                0,
                y,
                &fit(&format!("{marker}{name}"), name_width),
                Paint::new(Role::Label).bold().selected_if(selected),
            )?;
            canvas.text(
                name_width,
                y,
                &path,
                Paint::new(Role::Value).selected_if(selected),
            )?;
        }

        canvas.bar(canvas.height().saturating_sub(1), " Enter:select  Esc:cancel ")
    }
}
