//! Arsenal Core Library
//!
//! This crate holds everything the arsenal cheat launcher knows about cheats,
//! independent of any terminal: parsing markdown cheat files, indexing them by
//! tag, grouping them by tool, resolving `<placeholder>` parameters, and
//! managing vaults and persisted global parameter values.
//!
//! # Key Features
//!
//! - **Cheat Store**: Parse markdown cheat files into records with a tag index
//! - **Tool Tree**: Group cheats by the command-line tool they run
//! - **Parameters**: Extract, fill and interactively resolve placeholders
//! - **Vaults**: Built-in, user-defined and auto-discovered cheat collections
//! - **Global Parameters**: Persisted defaults for placeholder values
//! - **Sinks**: Clipboard and tmux delivery of resolved commands
//!
//! # Examples
//!
//! Loading the cheats of the default vault:
//!
//! ```no_run
//! use arsenal_core::config::Settings;
//! use arsenal_core::store::CheatStore;
//! use arsenal_core::vault::{VaultRegistry, DEFAULT_VAULT};
//!
//! let settings = Settings::load(&None)?;
//! let registry = VaultRegistry::new(&settings);
//! let vaults = registry.load();
//! let report = CheatStore::load(&registry.source_paths(&vaults, DEFAULT_VAULT));
//! for cheat in report.store.cheats() {
//!     println!("{cheat}");
//! }
//! # Ok::<(), arsenal_core::error::Error>(())
//! ```

pub mod cheat;
pub mod config;
pub mod error;
pub mod globals;
pub mod parameters;
pub mod persistence;
pub mod sinks;
pub mod store;
pub mod tool_tree;
pub mod vault;
