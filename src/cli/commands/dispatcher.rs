//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigStore, FileConfigStore, UpdateSettings};
use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::{check_and_notify, notice_enabled, ReleaseResolver, SystemClock, VERSION};

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: PathBuf,
    settings: UpdateSettings,
}

impl CommandDispatcher {
    /// Create a dispatcher using the config file at `config_path`.
    pub fn new(config_path: PathBuf, settings: UpdateSettings) -> Self {
        Self {
            config_path,
            settings,
        }
    }

    /// Dispatcher for the default config file and environment settings.
    pub fn from_env() -> Self {
        Self::new(FileConfigStore::default_path(), UpdateSettings::from_env())
    }

    /// Path of the config file commands read and write.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Dispatch and execute a command.
    ///
    /// Prints the update notice first (unless the command suppresses it),
    /// then routes the CLI subcommand to its implementation.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.notify_if_outdated(cli.command.name(), ui);

        match &cli.command {
            Commands::Update(args) => {
                let cmd = super::update::UpdateCommand::new(args.clone(), self.settings.clone());
                cmd.execute(ui)
            }
            Commands::Config(args) => {
                let cmd = super::config::ConfigCommand::new(&self.config_path, args.clone());
                cmd.execute(ui)
            }
            Commands::Version => {
                let cmd = super::version::VersionCommand::new(&self.config_path);
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }

    /// Run the cached update check and print a notice. Never fails.
    fn notify_if_outdated(&self, command: &str, ui: &mut dyn UserInterface) {
        let mut store = match FileConfigStore::open(&self.config_path) {
            Ok(store) => store,
            Err(e) => {
                tracing::debug!("Skipping update check, config unreadable: {}", e);
                return;
            }
        };

        let Some(releases) = self.notice_resolver(command, &store) else {
            return;
        };

        check_and_notify(
            ui,
            command,
            VERSION,
            &self.settings,
            &mut store,
            &releases,
            &SystemClock,
        );
    }

    /// Release client for the notice check, or `None` when `command` must
    /// not show the notice. Suppressed commands never build an HTTP client.
    fn notice_resolver(&self, command: &str, store: &dyn ConfigStore) -> Option<ReleaseResolver> {
        if !notice_enabled(command, &self.settings, store) {
            tracing::debug!("Update notice suppressed for `{}`", command);
            return None;
        }

        match ReleaseResolver::new(&self.settings.releases_api, self.settings.check_timeout) {
            Ok(releases) => Some(releases),
            Err(e) => {
                tracing::debug!("Skipping update check: {}", e);
                None
            }
        }
    }
}
