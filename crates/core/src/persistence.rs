//! Reading and writing the JSON state files.
//!
//! State files are optional. A missing or malformed file reads as the empty
//! default and the reason is kept in [`Origin`] so callers can decide whether
//! to mention it.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Where a persisted value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File,
    Absent,
    Malformed(String),
}

/// A value read from a state file, plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub value: T,
    pub origin: Origin,
}

/// Reads a JSON state file, falling back to `T::default()`.
pub fn read_state<T: DeserializeOwned + Default>(
    path: &Path,
    file_description: &str,
) -> Persisted<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Persisted {
                value: T::default(),
                origin: Origin::Absent,
            };
        }
        Err(e) => {
            warn!(
                "Could not read {file_description} file `{}`: {e}",
                path.display()
            );
            return Persisted {
                value: T::default(),
                origin: Origin::Malformed(e.to_string()),
            };
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Persisted {
            value,
            origin: Origin::File,
        },
        Err(e) => {
            warn!(
                "Ignoring malformed {file_description} file `{}`: {e}",
                path.display()
            );
            Persisted {
                value: T::default(),
                origin: Origin::Malformed(e.to_string()),
            }
        }
    }
}

/// Writes `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_state<T: Serialize>(path: &Path, value: &T, file_description: &str) -> Result<()> {
    let path_string = path.display().to_string();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::json_error("writing", file_description, &path_string, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io_error(file_description, &path_string, e))?;
    }

    fs::write(path, json).map_err(|e| Error::io_error(file_description, &path_string, e))?;
    info!("Saved {file_description} file `{path_string}`");
    Ok(())
}
