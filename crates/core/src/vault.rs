//! Named collections of cheat source locations.
//!
//! The registry merges three sources on every load:
//!
//! 1. user-defined vaults from the vaults file,
//! 2. the built-in `default` vault, which always replaces a user entry of the
//!    same name,
//! 3. one vault per non-hidden subdirectory of each playbook root, named after
//!    the subdirectory.
//!
//! Only user-defined vaults are ever written back.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::config::{expand_path, Settings};
use crate::error::Result;
use crate::persistence::{read_state, write_state, Persisted};

/// Name of the built-in vault.
pub const DEFAULT_VAULT: &str = "default";

const FILE_DESCRIPTION: &str = "vaults";

/// How a vault entered the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Default,
    User,
    Discovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    pub name: String,
    pub source_paths: Vec<PathBuf>,
    pub provenance: Provenance,
}

impl Display for Vault {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self.source_paths.first() {
            Some(path) => write!(formatter, "{} ({})", self.name, path.display()),
            None => formatter.write_str(&self.name),
        }
    }
}

/// Vault name to vault, in merge order.
pub type Vaults = IndexMap<String, Vault>;

/// Loads and saves vaults according to [`Settings`].
#[derive(Debug, Clone)]
pub struct VaultRegistry {
    default_paths: Vec<PathBuf>,
    playbook_roots: Vec<PathBuf>,
    vaults_file: PathBuf,
}

impl VaultRegistry {
    pub fn new(settings: &Settings) -> Self {
        Self {
            default_paths: settings.cheat_paths.clone(),
            playbook_roots: settings.playbook_roots.clone(),
            vaults_file: settings.vaults_file.clone(),
        }
    }

    /// Builds the merged vault mapping.
    pub fn load(&self) -> Vaults {
        let mut vaults = Vaults::new();

        let user: Persisted<IndexMap<String, Vec<String>>> =
            read_state(&self.vaults_file, FILE_DESCRIPTION);
        for (name, paths) in user.value {
            vaults.insert(
                name.clone(),
                Vault {
                    name,
                    source_paths: paths.iter().map(|p| expand_path(p)).collect(),
                    provenance: Provenance::User,
                },
            );
        }

        vaults.insert(
            DEFAULT_VAULT.to_string(),
            Vault {
                name: DEFAULT_VAULT.to_string(),
                source_paths: self.default_paths.clone(),
                provenance: Provenance::Default,
            },
        );

        for (name, path) in self.discover() {
            vaults.insert(
                name.clone(),
                Vault {
                    name,
                    source_paths: vec![path],
                    provenance: Provenance::Discovered,
                },
            );
        }

        debug!("Loaded {} vaults", vaults.len());
        vaults
    }

    /// Persists the user-defined part of `vaults`.
    ///
    /// Entries named `default` or matching a currently discovered playbook are
    /// left out regardless of their provenance.
    ///
    /// # Errors
    ///
    /// Returns an error if the vaults file cannot be written.
    pub fn save(&self, vaults: &Vaults) -> Result<()> {
        let discovered: HashSet<String> = self.discover().into_iter().map(|(name, _)| name).collect();

        let custom: IndexMap<&str, Vec<String>> = vaults
            .iter()
            .filter(|(name, _)| name.as_str() != DEFAULT_VAULT && !discovered.contains(*name))
            .map(|(name, vault)| {
                let paths = vault
                    .source_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                (name.as_str(), paths)
            })
            .collect();

        write_state(&self.vaults_file, &custom, FILE_DESCRIPTION)
    }

    /// Source paths for `name`, falling back to the default vault's.
    pub fn source_paths(&self, vaults: &Vaults, name: &str) -> Vec<PathBuf> {
        vaults
            .get(name)
            .map_or_else(|| self.default_paths.clone(), |v| v.source_paths.clone())
    }

    /// Playbook subdirectories, sorted by name within each root.
    fn discover(&self) -> Vec<(String, PathBuf)> {
        let mut found = Vec::new();
        for root in &self.playbook_roots {
            found.extend(discover_in(root));
        }
        found
    }
}

fn discover_in(root: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut found: Vec<(String, PathBuf)> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            (!name.starts_with('.')).then(|| (name, entry.path()))
        })
        .collect();
    found.sort();
    found
}
