//! Command-line argument parsing.
//!
//! The launcher is forgiving about its arguments: anything `clap` cannot make
//! sense of launches the interactive UI instead of failing. Only help and
//! version requests end the process early.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use log::debug;

/// Command-line arguments for the `arsenal` binary.
///
/// # Examples
///
/// ```rust
/// use arsenal_cli::cli_args::{Args, Invocation};
///
/// let invocation = Args::interpret(["arsenal", "scan", "10.0.0.5"]);
/// assert!(matches!(invocation, Invocation::Run(_)));
/// ```
#[derive(Parser, Debug, Default)]
#[command(
    name = "arsenal",
    about = "Native terminal cheat launcher",
    term_width = 0,
    after_help = KEY_HELP
)]
pub struct Args {
    /// Path to the settings YAML file.
    ///
    /// If not provided, defaults to `~/.arsenal/config.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Set the `ip` global parameter and exit.
    Scan {
        /// Target address stored as the `ip` global.
        value: String,
    },
}

/// What the process should do after looking at its arguments.
#[derive(Debug)]
pub enum Invocation {
    /// Parsed arguments; launch the UI or run the subcommand.
    Run(Args),
    /// Help or version text to print before exiting successfully.
    Print(String),
}

/// Key bindings, shown below the usage text.
pub const KEY_HELP: &str = "\
Keys:
  ←/→         Switch category
  ↑/↓         Navigate commands
  Enter       Run command (tmux or copy)
  Ctrl+O      Copy to clipboard (always, even in tmux)
  Ctrl+V      Toggle flat/tree view
  Ctrl+P      Switch vault/playbook
  Ctrl+Y      Yank raw command (no param editing)
  Ctrl+A      Add new cheat command
  Ctrl+G      Edit global variables
  Ctrl+D/U    Page down/up
  Tab         Switch focus between search and list
  Esc         Clear search
  q/Ctrl+C    Quit";

impl Args {
    /// Parses `arguments`, falling back to a plain UI launch on any parse
    /// error other than a help or version request.
    pub fn interpret<I, T>(arguments: I) -> Invocation
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(arguments) {
            Ok(args) => Invocation::Run(args),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Invocation::Print(e.render().to_string())
            }
            Err(e) => {
                debug!("Unrecognised arguments, launching UI: {}", e.kind());
                Invocation::Run(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(arguments: &[&str]) -> Args {
        match Args::interpret(arguments.iter().copied()) {
            Invocation::Run(args) => args,
            Invocation::Print(text) => panic!("Expected Run, got Print({text})"),
        }
    }

    #[test]
    fn test_no_arguments_launches_ui() {
        let args = run(&["arsenal"]);
        assert!(args.command.is_none());
        assert!(args.config_path.is_none());
    }

    #[test]
    fn test_scan_with_value() {
        let args = run(&["arsenal", "scan", "10.10.10.10"]);
        assert_eq!(
            args.command,
            Some(Commands::Scan {
                value: "10.10.10.10".to_string()
            })
        );
    }

    #[test]
    fn test_scan_without_value_falls_through_to_ui() {
        let args = run(&["arsenal", "scan"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_unknown_arguments_fall_through_to_ui() {
        let args = run(&["arsenal", "frobnicate", "--loud"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_config_path_flag() {
        let args = run(&["arsenal", "-c", "/tmp/arsenal.yml"]);
        assert_eq!(args.config_path, Some("/tmp/arsenal.yml".to_string()));

        let args = run(&["arsenal", "--config-path", "/tmp/a.yml", "scan", "1.2.3.4"]);
        assert_eq!(args.config_path, Some("/tmp/a.yml".to_string()));
        assert!(args.command.is_some());
    }

    #[test]
    fn test_help_prints_usage_and_keys() {
        for flag in ["-h", "--help"] {
            match Args::interpret(["arsenal", flag]) {
                Invocation::Print(text) => {
                    assert!(text.contains("scan"));
                    assert!(text.contains("Ctrl+P"));
                }
                Invocation::Run(_) => panic!("Expected help text for {flag}"),
            }
        }
    }
}
