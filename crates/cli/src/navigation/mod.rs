//! Interactive navigation over the loaded cheats.
//!
//! The main screen is driven by [`controller::Navigation`]; nested screens
//! (parameter editor, vault picker, globals editor, add-cheat form) implement
//! [`flow::Flow`] and run until they finish or are cancelled. Transitions are
//! plain functions of state and key, so everything here can be exercised
//! without a terminal.

pub mod add_cheat;
pub mod colors;
pub mod controller;
pub mod cursor;
pub mod draw;
pub mod flow;
pub mod globals_editor;
pub mod input;
pub mod param_editor;
pub mod text_input;
pub mod types;
pub mod ui;
pub mod vault_picker;

pub use types::{Action, DisplayEntry, Focus, Intent, Key, Step, ViewMode};
