//! Terminal session handling and key input.

use std::io::{stdout, Stdout, Write};
use std::process;

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{event, execute};
use log::{debug, warn};

use arsenal_core::error::{Error, Result};

use crate::navigation::input::decode_event;
use crate::navigation::Key;

/// Source of key presses plus the size of the screen they are drawn on.
pub trait Console {
    fn size(&self) -> Result<(u16, u16)>;

    /// Blocks for the next event. `Ok(None)` for events that only need a
    /// redraw, such as a resize.
    fn next_key(&mut self) -> Result<Option<Key>>;
}

/// Raw mode, alternate screen and hidden cursor for as long as it lives.
///
/// Dropping it restores the terminal, including while unwinding from a panic.
pub struct TerminalSession {
    out: Stdout,
}

impl TerminalSession {
    /// Switches the terminal into full-screen raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses any of the mode changes; any
    /// change already made is undone.
    pub fn start() -> Result<Self> {
        let mut session = Self { out: stdout() };
        execute!(session.out, EnterAlternateScreen)?;
        enable_raw_mode()?;
        execute!(session.out, Hide)?;
        debug!("Terminal session started");
        Ok(session)
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore(&mut self.out);
    }
}

/// Exit status after an external interrupt or termination request.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Leaves raw mode and the alternate screen and shows the cursor again.
///
/// Safe to call when the terminal was never switched.
pub fn restore<W: Write>(out: &mut W) {
    let _ = disable_raw_mode();
    let _ = execute!(out, Show, LeaveAlternateScreen);
    let _ = out.flush();
}

/// Restores the terminal and exits with [`INTERRUPTED_EXIT_CODE`] when the
/// process receives SIGINT, SIGTERM or SIGHUP.
///
/// # Errors
///
/// Returns an error if a handler is already installed or the signals cannot
/// be hooked.
pub fn install_interrupt_cleanup() -> Result<()> {
    ctrlc::set_handler(|| {
        restore(&mut stdout());
        warn!("Interrupted, terminal restored");
        process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(|e| Error::Misc(format!("Could not install signal handler: {e}")))
}

/// Keys read from the real terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermConsole;

impl Console for CrosstermConsole {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn next_key(&mut self) -> Result<Option<Key>> {
        Ok(decode_event(&event::read()?))
    }
}
