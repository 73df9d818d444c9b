//! Config command implementation.
//!
//! The `fp config` command reads and writes values in the config file.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{ConfigStore, FileConfigStore};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    path: PathBuf,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command operating on the file at `path`.
    pub fn new(path: &Path, args: ConfigArgs) -> Self {
        Self {
            path: path.to_path_buf(),
            args,
        }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigCommand {
    fn run(&self, ui: &mut dyn UserInterface) -> anyhow::Result<CommandResult> {
        let mut store = FileConfigStore::open(&self.path)
            .with_context(|| format!("Failed to open config {}", self.path.display()))?;

        match &self.args.action {
            ConfigAction::Get { key } => match store.get(key) {
                Some(value) => ui.message(&value),
                None => {
                    ui.error(&format!("No value set for '{}'", key));
                    return Ok(CommandResult::failure(1));
                }
            },
            ConfigAction::Set { key, value } => {
                store
                    .set(key, value)
                    .with_context(|| format!("Failed to save '{}'", key))?;
                ui.success(&format!("Set {} = {}", key, value));
            }
            ConfigAction::List => {
                ui.message(&format!("# {}", store.path().display()));
                for (key, value) in store.entries() {
                    ui.message(&format!("{}: {}", key, value));
                }
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        Ok(self.run(ui)?)
    }
}
