//! "New version available" notice shown before ordinary commands.

use crate::config::{ConfigStore, UpdateSettings};
use crate::ui::UserInterface;

use super::checker::{Clock, UpdateChecker, UpdateStatus};
use super::release::ReleaseSource;

/// Commands that never print the notice.
///
/// `record` is invoked by git hooks on every commit, `completions` output is
/// sourced by shells, and `update` reports versions itself.
pub const QUIET_COMMANDS: &[&str] = &["record", "completions", "update"];

/// Whether the notice may be shown before `command`.
pub fn notice_enabled(command: &str, settings: &UpdateSettings, store: &dyn ConfigStore) -> bool {
    if QUIET_COMMANDS.contains(&command) {
        return false;
    }
    if settings.notifier_disabled {
        return false;
    }
    !UpdateSettings::notice_disabled_in(store)
}

/// Print the notice when `status` reports an available update.
pub fn show_update_notice(ui: &mut dyn UserInterface, status: &UpdateStatus) {
    if !status.available {
        return;
    }

    ui.notice(&format!(
        "A new version of fp is available: {} -> {} (run `fp update` to upgrade)",
        status.current, status.latest
    ));
}

/// Run the background check for `command` and print the notice if needed.
///
/// Never fails: the check swallows its own errors.
pub fn check_and_notify(
    ui: &mut dyn UserInterface,
    command: &str,
    current: &str,
    settings: &UpdateSettings,
    store: &mut dyn ConfigStore,
    releases: &dyn ReleaseSource,
    clock: &dyn Clock,
) {
    if !notice_enabled(command, settings, store) {
        tracing::debug!("Update notice suppressed for `{}`", command);
        return;
    }

    let status = UpdateChecker::new(store, releases, clock).check(current);
    show_update_notice(ui, &status);
}
