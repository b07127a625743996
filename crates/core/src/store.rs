//! The in-memory cheat repository.
//!
//! [`CheatStore::load`] walks a vault's source paths, parses every markdown
//! file it finds and builds the tag index. A file that fails to read or parse
//! is skipped and reported in [`LoadReport::skipped`]; it never aborts the load.
//!
//! Cheats are owned by the store and referenced everywhere else by [`CheatId`],
//! their position in load order.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::cheat::{parse_markdown, Cheat, NewCheat};
use crate::error::{Error, Result};

/// Reserved tag whose bucket holds every cheat.
pub const ALL_TAG: &str = "all";

/// Index of a cheat in [`CheatStore::cheats`].
pub type CheatId = usize;

/// A markdown file that could not be loaded.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of a store load: the store plus every file that was skipped.
#[derive(Debug)]
pub struct LoadReport {
    pub store: CheatStore,
    pub skipped: Vec<SkippedFile>,
}

/// Tag name to cheats carrying it. `all` is always the first key; the
/// remaining keys are sorted alphabetically.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagIndex {
    buckets: IndexMap<String, Vec<CheatId>>,
}

impl TagIndex {
    pub fn build(cheats: &[Cheat]) -> Self {
        let mut tagged: IndexMap<String, Vec<CheatId>> = IndexMap::new();
        for (id, cheat) in cheats.iter().enumerate() {
            for tag in cheat.tags.iter().filter(|tag| tag.as_str() != ALL_TAG) {
                tagged.entry(tag.clone()).or_default().push(id);
            }
        }

        let mut buckets = IndexMap::with_capacity(tagged.len() + 1);
        buckets.insert(ALL_TAG.to_string(), (0..cheats.len()).collect());
        for (tag, ids) in tagged.into_iter().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
            buckets.insert(tag, ids);
        }

        Self { buckets }
    }

    /// Tag names, `all` first.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn bucket(&self, tag: &str) -> Option<&[CheatId]> {
        self.buckets.get(tag).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Parsed cheats and their tag index. Rebuilt wholesale, never patched.
#[derive(Debug, Default, Clone)]
pub struct CheatStore {
    cheats: Vec<Cheat>,
    tag_index: TagIndex,
}

impl CheatStore {
    pub fn from_cheats(cheats: Vec<Cheat>) -> Self {
        let tag_index = TagIndex::build(&cheats);
        Self { cheats, tag_index }
    }

    /// Loads every cheat found under `source_paths`.
    ///
    /// Paths that do not exist are ignored. Files named `README.md` (any case)
    /// are not read.
    pub fn load(source_paths: &[PathBuf]) -> LoadReport {
        let mut cheats = Vec::new();
        let mut skipped = Vec::new();

        for base in source_paths.iter().filter(|p| p.exists()) {
            debug!("Scanning `{}` for cheats", base.display());

            for entry in WalkDir::new(base).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e.path().map_or_else(|| base.clone(), Path::to_path_buf);
                        warn!("Skipping unreadable entry under `{}`: {e}", base.display());
                        skipped.push(SkippedFile {
                            error: Error::Walk {
                                path: path.display().to_string(),
                                original: e,
                            },
                            path,
                        });
                        continue;
                    }
                };

                if !entry.file_type().is_file() || !is_cheat_file(entry.path()) {
                    continue;
                }

                match load_file(entry.path()) {
                    Ok(mut parsed) => cheats.append(&mut parsed),
                    Err(error) => {
                        warn!("Skipping cheat file `{}`: {error}", entry.path().display());
                        skipped.push(SkippedFile {
                            path: entry.path().to_path_buf(),
                            error,
                        });
                    }
                }
            }
        }

        debug!(
            "Loaded {} cheats, skipped {} files",
            cheats.len(),
            skipped.len()
        );

        LoadReport {
            store: Self::from_cheats(cheats),
            skipped,
        }
    }

    pub fn cheats(&self) -> &[Cheat] {
        &self.cheats
    }

    pub fn get(&self, id: CheatId) -> Option<&Cheat> {
        self.cheats.get(id)
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.tag_index
    }

    pub fn len(&self) -> usize {
        self.cheats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cheats.is_empty()
    }
}

fn is_cheat_file(path: &Path) -> bool {
    let has_md_extension = path.extension().is_some_and(|ext| ext == "md");
    let is_readme = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().eq_ignore_ascii_case("readme.md"));

    has_md_extension && !is_readme
}

fn load_file(path: &Path) -> Result<Vec<Cheat>> {
    let path_string = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| Error::io_error("cheat", &path_string, e))?;
    let text = String::from_utf8_lossy(&bytes);

    parse_markdown(&text, &path_string)
}

/// Appends a new cheat to `path`, creating the file and its parent
/// directories when needed.
///
/// # Errors
///
/// Returns an error if the cheat is incomplete or the file cannot be written.
pub fn append_cheat(path: &Path, new_cheat: &NewCheat) -> Result<()> {
    let entry = new_cheat.to_markdown()?;
    let path_string = path.display().to_string();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io_error("custom cheats directory", &path_string, e))?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io_error("custom cheats", &path_string, e))?;
    file.write_all(entry.as_bytes())
        .map_err(|e| Error::io_error("custom cheats", &path_string, e))?;

    info!("Appended cheat `{}` to `{path_string}`", new_cheat.title);
    Ok(())
}
