//! Update-related settings.
//!
//! Defaults point at the public release repository; environment variables
//! override them for mirrors, forks and tests.

use std::time::Duration;

use super::store::ConfigStore;

/// Release API of the upstream repository.
pub const DEFAULT_RELEASES_API: &str = "https://api.github.com/repos/footprint-dev/footprint";

/// Git repository used for source builds.
pub const DEFAULT_REPOSITORY: &str = "https://github.com/footprint-dev/footprint";

/// Cargo package installed by source builds.
pub const PACKAGE_NAME: &str = "footprint";

/// Short name of the installed binary.
pub const BINARY_NAME: &str = "fp";

/// Overrides [`DEFAULT_RELEASES_API`].
pub const RELEASES_API_ENV: &str = "FOOTPRINT_RELEASES_API";

/// Overrides [`DEFAULT_REPOSITORY`].
pub const REPOSITORY_ENV: &str = "FOOTPRINT_REPOSITORY";

/// Disables the update notice when set.
pub const NO_UPDATE_NOTIFIER_ENV: &str = "FOOTPRINT_NO_UPDATE_NOTIFIER";

/// Config keys used by the update subsystem.
pub mod keys {
    /// RFC3339 timestamp of the last successful update check.
    pub const LAST_CHECK: &str = "update.last_check";
    /// Latest release tag seen by the last successful check.
    pub const LATEST_VERSION: &str = "update.latest_version";
    /// `false` disables the update notice.
    pub const NOTIFY: &str = "update.notify";
}

/// Settings for checking, downloading and building updates.
#[derive(Debug, Clone)]
pub struct UpdateSettings {
    /// Base URL of the release API.
    pub releases_api: String,
    /// Git repository for source builds.
    pub repository: String,
    /// Cargo package name for source builds.
    pub package: String,
    /// Short binary name, used for asset names.
    pub binary_name: String,
    /// Timeout for the background update check.
    pub check_timeout: Duration,
    /// Timeout for release resolution and downloads during `fp update`.
    pub download_timeout: Duration,
    /// Whether the update notice is disabled via the environment.
    pub notifier_disabled: bool,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            releases_api: DEFAULT_RELEASES_API.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            package: PACKAGE_NAME.to_string(),
            binary_name: BINARY_NAME.to_string(),
            check_timeout: Duration::from_secs(3),
            download_timeout: Duration::from_secs(300),
            notifier_disabled: false,
        }
    }
}

impl UpdateSettings {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(api) = non_empty_env(RELEASES_API_ENV) {
            settings.releases_api = api;
        }
        if let Some(repo) = non_empty_env(REPOSITORY_ENV) {
            settings.repository = repo;
        }
        settings.notifier_disabled = std::env::var_os(NO_UPDATE_NOTIFIER_ENV).is_some();

        settings
    }

    /// File name of the executable inside release archives.
    pub fn executable_name(&self) -> String {
        format!("{}{}", self.binary_name, std::env::consts::EXE_SUFFIX)
    }

    /// Whether the store has the notice switched off.
    pub fn notice_disabled_in(store: &dyn ConfigStore) -> bool {
        store
            .get(keys::NOTIFY)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "off" | "no"))
            .unwrap_or(false)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
