//! Persisted default values for placeholder parameters.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::cheat::Cheat;
use crate::error::Result;
use crate::parameters::{parameter_candidates, ParameterLookup};
use crate::persistence::{read_state, write_state, Persisted};

const FILE_DESCRIPTION: &str = "globals";

/// Parameter name to default value, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalParameters {
    path: PathBuf,
    values: IndexMap<String, String>,
}

impl GlobalParameters {
    /// Reads the globals file without looking at any cheats.
    pub fn load(path: &Path) -> Self {
        let state: Persisted<IndexMap<String, String>> = read_state(path, FILE_DESCRIPTION);
        debug!(
            "Loaded {} globals from `{}` ({:?})",
            state.value.len(),
            path.display(),
            state.origin
        );

        Self {
            path: path.to_path_buf(),
            values: state.value,
        }
    }

    /// Reads the globals file and registers every parameter used by `cheats`.
    pub fn load_for<'a>(path: &Path, cheats: impl IntoIterator<Item = &'a Cheat>) -> Self {
        let mut globals = Self::load(path);
        let added = globals.register(parameter_candidates(cheats));
        debug!("Registered {added} new globals from cheats");
        globals
    }

    /// Adds each unknown name with an empty value. Existing values are kept.
    ///
    /// Returns how many names were added.
    pub fn register<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.values.len();
        for name in names {
            self.values.entry(name.into()).or_default();
        }
        self.values.len() - before
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Names and values in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every value back to the globals file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        write_state(&self.path, &self.values, FILE_DESCRIPTION)
    }
}

impl ParameterLookup for GlobalParameters {
    fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}
