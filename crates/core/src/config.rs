//! Settings and path utilities for arsenal.
//!
//! All file locations the launcher touches live in one [`Settings`] value that
//! is built once at startup and handed to the store, the vault registry, the
//! global parameters and the cheat writer. Nothing reads paths from globals.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default path for the optional settings file
const DEFAULT_SETTINGS_PATH: &str = "~/.arsenal/config.yml";

/// Locations combined into the built-in `default` vault
const DEFAULT_CHEAT_PATHS: [&str; 3] = [
    "~/.cheats",
    "~/.local/share/uv/tools/aliasr/lib/python3.14/site-packages/aliasr/data/cheats",
    "/opt/my-resources/setup/arsenal-cheats",
];

/// Roots whose immediate subdirectories become auto-discovered vaults
const DEFAULT_PLAYBOOK_ROOTS: [&str; 2] = ["~/.arsenal-playbooks", "/opt/playbooks"];

const DEFAULT_GLOBALS_PATH: &str = "~/.arsenal.json";
const DEFAULT_VAULTS_PATH: &str = "~/.arsenal-vaults.json";
const DEFAULT_CUSTOM_CHEATS_PATH: &str = "~/.cheats/custom.md";

/// Resolved file locations used by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Source paths of the built-in `default` vault.
    pub cheat_paths: Vec<PathBuf>,
    /// Directories scanned for playbook vaults.
    pub playbook_roots: Vec<PathBuf>,
    /// JSON file holding global parameter values.
    pub globals_file: PathBuf,
    /// JSON file holding user-defined vaults.
    pub vaults_file: PathBuf,
    /// Markdown file new cheats are appended to.
    pub custom_cheats_file: PathBuf,
}

/// On-disk shape of the settings file. Every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    cheat_paths: Option<Vec<String>>,
    playbook_roots: Option<Vec<String>>,
    globals_file: Option<String>,
    vaults_file: Option<String>,
    custom_cheats_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cheat_paths: DEFAULT_CHEAT_PATHS.iter().map(|p| expand_path(p)).collect(),
            playbook_roots: DEFAULT_PLAYBOOK_ROOTS
                .iter()
                .map(|p| expand_path(p))
                .collect(),
            globals_file: expand_path(DEFAULT_GLOBALS_PATH),
            vaults_file: expand_path(DEFAULT_VAULTS_PATH),
            custom_cheats_file: expand_path(DEFAULT_CUSTOM_CHEATS_PATH),
        }
    }
}

impl Settings {
    /// Loads settings from the given file, or from the default location.
    ///
    /// A missing file yields [`Settings::default`]. Keys present in the file
    /// replace the matching default; absent keys keep it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// valid settings document.
    pub fn load(settings_path_arg: &Option<String>) -> Result<Self> {
        let settings_path = get_settings_path(settings_path_arg);
        let mut settings = Self::default();

        if !Path::new(&settings_path).exists() {
            debug!("No settings file at `{settings_path}`, using defaults");
            return Ok(settings);
        }

        let contents = fs::read_to_string(&settings_path)
            .map_err(|e| Error::io_error("settings", &settings_path, e))?;

        if contents.trim().is_empty() {
            return Ok(settings);
        }

        let parsed: SettingsFile = serde_yaml::from_str(&contents)
            .map_err(|e| Error::yaml_error("reading", "settings", &settings_path, e))?;

        if let Some(paths) = parsed.cheat_paths {
            settings.cheat_paths = paths.iter().map(|p| expand_path(p)).collect();
        }
        if let Some(roots) = parsed.playbook_roots {
            settings.playbook_roots = roots.iter().map(|p| expand_path(p)).collect();
        }
        if let Some(path) = parsed.globals_file {
            settings.globals_file = expand_path(&path);
        }
        if let Some(path) = parsed.vaults_file {
            settings.vaults_file = expand_path(&path);
        }
        if let Some(path) = parsed.custom_cheats_file {
            settings.custom_cheats_file = expand_path(&path);
        }

        debug!("Loaded settings from `{settings_path}`: {settings:?}");
        Ok(settings)
    }

    /// Settings rooted entirely inside `base`. Used by tests and sandboxes.
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            cheat_paths: vec![base.join("cheats")],
            playbook_roots: vec![base.join("playbooks")],
            globals_file: base.join("globals.json"),
            vaults_file: base.join("vaults.json"),
            custom_cheats_file: base.join("cheats").join("custom.md"),
        }
    }
}

/// Resolves the settings file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// settings path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use arsenal_core::config::get_settings_path;
///
/// let default_path = get_settings_path(&None);
/// assert!(default_path.ends_with("config.yml"));
/// ```
pub fn get_settings_path(settings_path_arg: &Option<String>) -> String {
    let settings_path = match settings_path_arg {
        Some(settings_path) => settings_path,
        None => DEFAULT_SETTINGS_PATH,
    };

    shellexpand::tilde(settings_path).to_string()
}

/// Expands `~` and returns the result as a path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
