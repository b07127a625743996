//! Destinations for a resolved command: the system clipboard and a tmux pane.
//!
//! Both sinks report success as a `bool` and never return errors; failures are
//! logged and turned into a status message by the caller.

use std::env;
use std::io::{Read, Write};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

/// Upper bound for tmux probe commands.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Receives text for the operator to paste.
pub trait Clipboard {
    fn copy(&self, text: &str) -> bool;
}

/// A terminal multiplexer that can type text into another pane.
pub trait Multiplexer {
    /// Whether a multiplexer session is reachable right now.
    fn is_active(&self) -> bool;

    /// Types `text` into the target pane, pressing Enter afterwards when
    /// `execute` is set.
    fn send(&self, text: &str, execute: bool) -> bool;
}

/// Clipboard backed by `pbcopy` on macOS and `xclip` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn command() -> Command {
        if cfg!(target_os = "macos") {
            Command::new("pbcopy")
        } else {
            let mut command = Command::new("xclip");
            command.args(["-sel", "clip"]);
            command
        }
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> bool {
        let spawned = Self::command()
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!("Could not start clipboard command: {e}");
                return false;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                warn!("Could not write to clipboard command: {e}");
                let _ = child.kill();
                let _ = child.wait();
                return false;
            }
        }

        match child.wait() {
            Ok(status) if status.success() => {
                info!("Copied {} bytes to the clipboard", text.len());
                true
            }
            Ok(status) => {
                warn!("Clipboard command exited with {status}");
                false
            }
            Err(e) => {
                warn!("Clipboard command failed: {e}");
                false
            }
        }
    }
}

/// tmux, driven through its command line client.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tmux;

impl Tmux {
    /// Picks the pane to type into: the next pane of this window when it has
    /// several, otherwise the previously active pane.
    fn target(&self) -> &'static str {
        let mut list_panes = Command::new("tmux");
        list_panes.arg("list-panes");

        let pane_count = run_bounded(list_panes, PROBE_TIMEOUT)
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().lines().count())
            .unwrap_or(0);

        if pane_count > 1 {
            ":.+"
        } else {
            "{last}"
        }
    }

    fn send_keys(target: &str, keys: &[&str]) -> bool {
        let status = Command::new("tmux")
            .args(["send-keys", "-t", target])
            .args(keys)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        matches!(status, Ok(status) if status.success())
    }
}

impl Multiplexer for Tmux {
    fn is_active(&self) -> bool {
        if env::var_os("TMUX").is_some_and(|v| !v.is_empty()) {
            return true;
        }

        let term = env::var("TERM").unwrap_or_default();
        if term.contains("tmux") || term.contains("screen") {
            return true;
        }

        let mut probe = Command::new("tmux");
        probe.args(["display-message", "-p", "#{pane_id}"]);

        run_bounded(probe, PROBE_TIMEOUT).is_some_and(|output| {
            output.status.success() && !String::from_utf8_lossy(&output.stdout).trim().is_empty()
        })
    }

    fn send(&self, text: &str, execute: bool) -> bool {
        if !self.is_active() {
            return false;
        }

        let target = self.target();
        debug!("Sending command to tmux pane `{target}`");

        let lines: Vec<&str> = text.split('\n').collect();
        for (i, line) in lines.iter().enumerate() {
            if !Self::send_keys(target, &["-l", line]) {
                warn!("tmux send-keys failed for target `{target}`");
                return false;
            }
            if i + 1 < lines.len() && !Self::send_keys(target, &["Enter"]) {
                return false;
            }
        }

        if execute && !Self::send_keys(target, &["Enter"]) {
            return false;
        }

        info!("Sent {} lines to tmux", lines.len());
        true
    }
}

/// Runs `command` and waits at most `timeout` for it to finish.
///
/// Returns `None` if it cannot be started, fails while waiting, or runs out
/// of time; a command that runs out of time is killed.
pub fn run_bounded(mut command: Command, timeout: Duration) -> Option<Output> {
    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            debug!("Could not start {:?}: {e}", command.get_program());
            return None;
        }
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(collect_output(&mut child, status)),
            Ok(None) if Instant::now() >= deadline => {
                debug!("{:?} timed out after {timeout:?}", command.get_program());
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                debug!("Waiting for {:?} failed: {e}", command.get_program());
                let _ = child.kill();
                return None;
            }
        }
    }
}

fn collect_output(child: &mut Child, status: std::process::ExitStatus) -> Output {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    if let Some(mut pipe) = child.stdout.take() {
        let _ = pipe.read_to_end(&mut stdout);
    }
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_end(&mut stderr);
    }

    Output {
        status,
        stdout,
        stderr,
    }
}
