//! Version command implementation.

use std::path::{Path, PathBuf};

use crate::config::{keys, ConfigStore, FileConfigStore};
use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::{clean, VERSION};

use super::dispatcher::{Command, CommandResult};

/// The version command implementation.
pub struct VersionCommand {
    config_path: PathBuf,
}

impl VersionCommand {
    /// Create a new version command reading the cached check from `config_path`.
    pub fn new(config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
        }
    }
}

impl Command for VersionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(&format!("fp {}", VERSION));

        // The cached check is informational; an unreadable file is not an error here.
        let latest = FileConfigStore::open(&self.config_path)
            .ok()
            .and_then(|store| store.get(keys::LATEST_VERSION))
            .filter(|latest| !latest.is_empty());

        if let Some(latest) = latest {
            if latest != clean(VERSION) {
                ui.message(&format!("Latest release: {}", latest));
            }
        }

        Ok(CommandResult::success())
    }
}
