//! The interactive application: loaded data, navigation state and sinks.

use std::io::Write;

use log::{debug, error, info, warn};

use arsenal_core::cheat::NewCheat;
use arsenal_core::config::Settings;
use arsenal_core::error::Result;
use arsenal_core::globals::GlobalParameters;
use arsenal_core::parameters::parameter_names;
use arsenal_core::sinks::{Clipboard, Multiplexer};
use arsenal_core::store::{append_cheat, CheatId, CheatStore};
use arsenal_core::vault::{VaultRegistry, Vaults, DEFAULT_VAULT};

use crate::navigation::add_cheat::AddCheatForm;
use crate::navigation::controller::{list_height, Navigation};
use crate::navigation::draw::Canvas;
use crate::navigation::flow::run_flow;
use crate::navigation::globals_editor::{EditorExit, GlobalsEditor};
use crate::navigation::param_editor::ParameterEditor;
use crate::navigation::ui::render_main;
use crate::navigation::vault_picker::VaultPicker;
use crate::navigation::{Action, Intent};
use crate::terminal::Console;

/// Where a resolved command goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    /// The multiplexer when one accepts it, else the clipboard.
    Auto,
    Clipboard,
}

pub struct App<C: Clipboard, M: Multiplexer> {
    settings: Settings,
    registry: VaultRegistry,
    vaults: Vaults,
    store: CheatStore,
    globals: GlobalParameters,
    navigation: Navigation,
    clipboard: C,
    multiplexer: M,
}

impl<C: Clipboard, M: Multiplexer> App<C, M> {
    /// Loads the vaults and the `default` vault's cheats.
    pub fn new(settings: Settings, clipboard: C, multiplexer: M) -> Self {
        let registry = VaultRegistry::new(&settings);
        let vaults = registry.load();
        let loaded = load_vault(&settings, &registry, &vaults, DEFAULT_VAULT);

        let mut navigation = Navigation::new(DEFAULT_VAULT);
        navigation.status = loaded.status(DEFAULT_VAULT);
        info!("{}", navigation.status);

        Self {
            settings,
            registry,
            vaults,
            store: loaded.store,
            globals: loaded.globals,
            navigation,
            clipboard,
            multiplexer,
        }
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn store(&self) -> &CheatStore {
        &self.store
    }

    pub fn globals(&self) -> &GlobalParameters {
        &self.globals
    }

    pub fn vaults(&self) -> &Vaults {
        &self.vaults
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn multiplexer(&self) -> &M {
        &self.multiplexer
    }

    /// Runs the main screen until the operator quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the console fails to deliver input or the screen
    /// cannot be drawn.
    pub fn run<K: Console, W: Write>(&mut self, console: &mut K, out: &mut W) -> Result<()> {
        loop {
            let size = console.size()?;
            self.navigation.window_height = list_height(size.1);
            let frame = self.navigation.refresh(&self.store);

            let mut canvas = Canvas::new(out, size)?;
            render_main(
                &mut canvas,
                &self.navigation,
                &frame,
                &self.store,
                &self.globals,
            )?;
            canvas.finish()?;

            let Some(key) = console.next_key()? else {
                continue;
            };

            let intent = Intent::from_key(key, self.navigation.query.is_empty());
            match self.navigation.handle(intent, &frame) {
                Action::Quit => {
                    info!("Quit requested");
                    return Ok(());
                }
                action => self.perform(action, console, out)?,
            }
        }
    }

    fn perform<K: Console, W: Write>(
        &mut self,
        action: Action,
        console: &mut K,
        out: &mut W,
    ) -> Result<()> {
        match action {
            Action::None | Action::Quit => {}
            Action::Run(id) => {
                let resolved = self.resolve(id, console, out)?;
                self.deliver(resolved, Delivery::Auto);
            }
            Action::CopyResolved(id) => {
                let resolved = self.resolve(id, console, out)?;
                self.deliver(resolved, Delivery::Clipboard);
            }
            Action::CopyRaw(id) => {
                if let Some(cheat) = self.store.get(id) {
                    self.navigation.status = if self.clipboard.copy(&cheat.command) {
                        "Copied raw!".to_string()
                    } else {
                        "Copy failed".to_string()
                    };
                }
            }
            Action::SwitchVault => {
                self.vaults = self.registry.load();
                let mut picker = VaultPicker::new(&self.vaults, &self.navigation.active_vault);
                match run_flow(&mut picker, console, out)? {
                    Some(name) if name != self.navigation.active_vault => self.switch_vault(&name),
                    Some(_) => {}
                    None => self.navigation.status = "Cancelled".to_string(),
                }
            }
            Action::EditGlobals => {
                let mut editor = GlobalsEditor::new(&mut self.globals);
                let exit = run_flow(&mut editor, console, out)?;
                self.navigation.status = match exit {
                    Some(EditorExit::Save) => match self.globals.save() {
                        Ok(()) => "Globals saved".to_string(),
                        Err(e) => {
                            error!(
                                "Could not save globals to `{}`: {e}",
                                self.globals.path().display()
                            );
                            "Save failed".to_string()
                        }
                    },
                    Some(EditorExit::Close) | None => "Globals updated".to_string(),
                };
            }
            Action::AddCheat => {
                let mut form = AddCheatForm::new();
                match run_flow(&mut form, console, out)? {
                    Some(new_cheat) => {
                        self.navigation.status = match self.add_cheat(&new_cheat) {
                            Ok(()) => "Cheat added!".to_string(),
                            Err(e) => {
                                error!("Could not add cheat: {e}");
                                "Add failed".to_string()
                            }
                        };
                    }
                    None => self.navigation.status = "Cancelled".to_string(),
                }
            }
        }

        Ok(())
    }

    /// Lets the operator fill in the cheat's parameters. `None` when they
    /// cancel or the cheat no longer exists.
    fn resolve<K: Console, W: Write>(
        &self,
        id: CheatId,
        console: &mut K,
        out: &mut W,
    ) -> Result<Option<String>> {
        let Some(cheat) = self.store.get(id) else {
            return Ok(None);
        };

        let mut editor = ParameterEditor::new(&cheat.command, &self.globals);
        if let Some(filled) = editor.immediate() {
            return Ok(Some(filled));
        }
        run_flow(&mut editor, console, out)
    }

    fn deliver(&mut self, resolved: Option<String>, delivery: Delivery) {
        let Some(command) = resolved else {
            self.navigation.status = "Cancelled".to_string();
            return;
        };

        let status = match delivery {
            Delivery::Auto if self.multiplexer.send(&command, true) => "Sent to tmux!",
            Delivery::Auto if self.clipboard.copy(&command) => "Copied!",
            Delivery::Auto => "Failed",
            Delivery::Clipboard if self.clipboard.copy(&command) => "Copied!",
            Delivery::Clipboard => "Copy failed",
        };
        debug!("Delivery {delivery:?}: {status}");
        self.navigation.status = status.to_string();
    }

    /// Makes `name` the active vault and loads its cheats.
    pub fn switch_vault(&mut self, name: &str) {
        info!("Switching to vault `{name}`");
        self.navigation.active_vault = name.to_string();
        self.navigation.reset_for_reload();
        self.reload();
    }

    /// Appends `new_cheat` to the custom cheats file, records its parameters
    /// as globals and reloads the active vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the cheat is incomplete or cannot be written.
    pub fn add_cheat(&mut self, new_cheat: &NewCheat) -> Result<()> {
        append_cheat(&self.settings.custom_cheats_file, new_cheat)?;

        let added = self.globals.register(parameter_names(&new_cheat.command));
        debug!("Cheat `{}` introduced {added} new globals", new_cheat.title);
        if let Err(e) = self.globals.save() {
            warn!(
                "Could not save globals to `{}` after adding a cheat: {e}",
                self.globals.path().display()
            );
        }

        self.navigation.reset_for_reload();
        self.reload();
        Ok(())
    }

    /// Replaces the store with the active vault's cheats and reloads the
    /// globals they use.
    fn reload(&mut self) {
        let vault = &self.navigation.active_vault;
        let loaded = load_vault(&self.settings, &self.registry, &self.vaults, vault);

        self.navigation.status = loaded.status(vault);
        info!("{}", self.navigation.status);
        self.store = loaded.store;
        self.globals = loaded.globals;
    }
}

/// A vault's cheats with the globals they use.
struct LoadedVault {
    store: CheatStore,
    globals: GlobalParameters,
    skipped: usize,
}

impl LoadedVault {
    fn status(&self, vault: &str) -> String {
        match self.skipped {
            0 => format!("[{vault}] {} cheats", self.store.len()),
            skipped => format!("[{vault}] {} cheats ({skipped} skipped)", self.store.len()),
        }
    }
}

fn load_vault(
    settings: &Settings,
    registry: &VaultRegistry,
    vaults: &Vaults,
    vault: &str,
) -> LoadedVault {
    let report = CheatStore::load(&registry.source_paths(vaults, vault));
    let globals = GlobalParameters::load_for(&settings.globals_file, report.store.cheats());

    LoadedVault {
        skipped: report.skipped.len(),
        store: report.store,
        globals,
    }
}
