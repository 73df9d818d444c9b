//! Update command implementation.
//!
//! The `fp update` command replaces the running binary with a release build,
//! or builds a tagged version from source.

use crate::cli::args::UpdateArgs;
use crate::config::UpdateSettings;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::updates::{
    clean, ensure_prefix, BinaryInstaller, ReleaseResolver, ReleaseSource, SourceBuilder,
    UpdateOutcome, UpdatePlan, Updater, VERSION,
};

use super::dispatcher::{Command, CommandResult};

/// The update command implementation.
pub struct UpdateCommand {
    args: UpdateArgs,
    settings: UpdateSettings,
    current_version: String,
}

impl UpdateCommand {
    /// Create a new update command for the running version.
    pub fn new(args: UpdateArgs, settings: UpdateSettings) -> Self {
        Self {
            args,
            settings,
            current_version: VERSION.to_string(),
        }
    }

    /// Pretend to be running `version`.
    pub fn with_current_version(mut self, version: &str) -> Self {
        self.current_version = version.to_string();
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &UpdateArgs {
        &self.args
    }

    fn updater(&self) -> Result<Updater> {
        let timeout = self.settings.download_timeout;
        let releases = ReleaseResolver::new(&self.settings.releases_api, timeout)?;
        let installer = BinaryInstaller::new(&self.settings.executable_name(), timeout)?;
        let builder = SourceBuilder::new(&self.settings.repository, &self.settings.package);

        Ok(Updater::new(
            Box::new(releases),
            Box::new(installer),
            Box::new(builder),
            &self.settings.binary_name,
            &self.current_version,
        ))
    }

    /// `fp update --check`: query the latest release, ignoring the cache.
    fn check(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let releases =
            ReleaseResolver::new(&self.settings.releases_api, self.settings.download_timeout)?;
        let latest = releases.fetch("")?.tag;
        let current = clean(&self.current_version);

        if latest == current {
            ui.success(&format!("fp {} is up to date", current));
        } else {
            ui.message(&format!(
                "A new version of fp is available: {} -> {}",
                current, latest
            ));
            ui.message("Run `fp update` to upgrade.");
        }

        Ok(CommandResult::success())
    }
}

impl Command for UpdateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.check {
            return self.check(ui);
        }

        let updater = self.updater()?;
        run_update(&updater, &self.args, ui)
    }
}

/// Run `updater` for `args`, showing progress on `ui`.
///
/// The spinner is gone before a source build starts, since cargo writes
/// its own progress to the same terminal.
pub fn run_update(
    updater: &Updater,
    args: &UpdateArgs,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let message = match &args.version {
        Some(version) => format!("Resolving {}...", version),
        None => "Checking for updates...".to_string(),
    };

    let mut spinner = ui.start_spinner(&message);
    let plan = match updater.plan(args.version.as_deref(), args.tag) {
        Ok(plan) => plan,
        Err(e) => {
            spinner.finish_error("Update failed");
            return Err(e.into());
        }
    };

    let downloading = matches!(plan, UpdatePlan::Install { .. });
    match &plan {
        UpdatePlan::AlreadyLatest { .. } => spinner.finish_and_clear(),
        UpdatePlan::Install { tag, .. } => {
            spinner.set_message(&format!("Downloading {}...", tag));
        }
        UpdatePlan::BuildFromSource { version } => {
            spinner.finish_and_clear();
            ui.message(&format!(
                "Building {} from source with cargo...",
                ensure_prefix(version)
            ));
        }
    }

    let result = updater.apply(plan);
    if downloading {
        match &result {
            Ok(_) => spinner.finish_and_clear(),
            Err(_) => spinner.finish_error("Update failed"),
        }
    }

    let outcome = result?;
    report(&outcome, ui);
    Ok(CommandResult::success())
}

/// Print the result of an update.
pub fn report(outcome: &UpdateOutcome, ui: &mut dyn UserInterface) {
    match outcome {
        UpdateOutcome::AlreadyLatest { .. } => ui.message(&outcome.to_string()),
        UpdateOutcome::Installed { path, .. } => {
            ui.success(&outcome.to_string());
            tracing::debug!("Replaced {}", path.display());
        }
        UpdateOutcome::BuiltFromSource { location, .. } => {
            ui.success(&outcome.to_string());
            ui.message(&format!("Installed to {}", location.display()));
        }
    }
}
