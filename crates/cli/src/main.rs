use std::env;
use std::process::ExitCode;

use log::{debug, info};

use arsenal_cli::app::App;
use arsenal_cli::cli_args::{Args, Commands, Invocation};
use arsenal_cli::terminal::{install_interrupt_cleanup, CrosstermConsole, TerminalSession};
use arsenal_core::config::Settings;
use arsenal_core::error::Result;
use arsenal_core::globals::GlobalParameters;
use arsenal_core::sinks::{SystemClipboard, Tmux};

/// Global parameter set by `arsenal scan`.
const SCAN_PARAMETER: &str = "ip";

fn scan(settings: &Settings, value: &str) -> Result<()> {
    let mut globals = GlobalParameters::load(&settings.globals_file);
    globals.set(SCAN_PARAMETER, value);
    globals.save()?;

    println!("Set {SCAN_PARAMETER}={value}");
    Ok(())
}

fn run_ui(settings: Settings) -> Result<()> {
    let mut app = App::new(settings, SystemClipboard, Tmux);
    debug!("Loaded {} cheats", app.store().len());

    install_interrupt_cleanup()?;
    let mut session = TerminalSession::start()?;
    let mut console = CrosstermConsole;
    app.run(&mut console, session.out())
}

fn execute() -> Result<()> {
    let args = match Args::interpret(env::args_os()) {
        Invocation::Run(args) => args,
        Invocation::Print(text) => {
            print!("{text}");
            return Ok(());
        }
    };

    let settings = Settings::load(&args.config_path)?;

    match args.command {
        Some(Commands::Scan { value }) => scan(&settings, &value),
        None => {
            info!("Launching UI");
            run_ui(settings)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
