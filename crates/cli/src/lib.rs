//! Arsenal CLI Library
//!
//! The terminal front end of the arsenal cheat launcher: argument parsing,
//! the terminal session, and the interactive navigation over the cheats loaded
//! by `arsenal-core`.
//!
//! # Modules
//!
//! - [`cli_args`]: Command-line argument definitions
//! - [`app`]: The application loop tying navigation, sub-flows and sinks
//! - [`navigation`]: Main-screen state machine, nested editors and rendering
//! - [`terminal`]: Raw-mode session guard and key sources

pub mod app;
pub mod cli_args;
pub mod navigation;
pub mod terminal;
