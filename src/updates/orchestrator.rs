//! The `fp update` pipeline.
//!
//! Resolves a release, picks the asset for this platform and installs it,
//! falling back to a source build when no binary is available.

use std::fmt;
use std::path::PathBuf;

use super::error::{UpdateError, UpdateResult};
use super::install::BinaryInstall;
use super::platform::{select_asset, Platform};
use super::release::ReleaseSource;
use super::source::SourceInstall;
use super::version::{clean, ensure_prefix};

/// What an update run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The resolved release is the running version.
    AlreadyLatest { version: String },
    /// A release binary replaced the executable at `path`.
    Installed { tag: String, path: PathBuf },
    /// The release was built and installed with the toolchain.
    BuiltFromSource { tag: String, location: PathBuf },
}

impl UpdateOutcome {
    /// Tag or version the outcome refers to.
    pub fn version(&self) -> &str {
        match self {
            UpdateOutcome::AlreadyLatest { version } => version,
            UpdateOutcome::Installed { tag, .. } => tag,
            UpdateOutcome::BuiltFromSource { tag, .. } => tag,
        }
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::AlreadyLatest { version } => {
                write!(f, "Already at latest version {}", version)
            }
            UpdateOutcome::Installed { tag, .. } => write!(f, "Updated to {}", tag),
            UpdateOutcome::BuiltFromSource { tag, .. } => {
                write!(f, "Built and installed {} from source", tag)
            }
        }
    }
}

/// What an update run is about to do, decided before any download or build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    /// Nothing to do.
    AlreadyLatest { version: String },
    /// Download the archive at `url` and install release `tag`.
    Install { tag: String, url: String },
    /// Build and install `version` with the toolchain.
    BuildFromSource { version: String },
}

/// Sequences release resolution, asset selection and installation.
pub struct Updater {
    releases: Box<dyn ReleaseSource>,
    installer: Box<dyn BinaryInstall>,
    builder: Box<dyn SourceInstall>,
    platform: Platform,
    binary_name: String,
    current_version: String,
}

impl Updater {
    /// Create an updater for the running platform.
    pub fn new(
        releases: Box<dyn ReleaseSource>,
        installer: Box<dyn BinaryInstall>,
        builder: Box<dyn SourceInstall>,
        binary_name: &str,
        current_version: &str,
    ) -> Self {
        Self {
            releases,
            installer,
            builder,
            platform: Platform::current(),
            binary_name: binary_name.to_string(),
            current_version: current_version.to_string(),
        }
    }

    /// Select assets for `platform` instead of the running one.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Update to `explicit` (or the latest release when `None`).
    ///
    /// With `from_source` the release API is not consulted at all and the
    /// given version is built with the toolchain.
    pub fn update(&self, explicit: Option<&str>, from_source: bool) -> UpdateResult<UpdateOutcome> {
        let plan = self.plan(explicit, from_source)?;
        self.apply(plan)
    }

    /// Resolve the release and decide how to install it.
    pub fn plan(&self, explicit: Option<&str>, from_source: bool) -> UpdateResult<UpdatePlan> {
        let explicit = explicit.map(str::trim).filter(|v| !v.is_empty());

        if from_source {
            let version = explicit.ok_or(UpdateError::MissingVersion)?;
            return Ok(UpdatePlan::BuildFromSource {
                version: version.to_string(),
            });
        }

        let release = match self.releases.fetch(explicit.unwrap_or_default()) {
            Ok(release) => release,
            Err(e) => match explicit {
                Some(version) => {
                    tracing::warn!(
                        "Could not resolve release {}: {}; building from source",
                        version,
                        e
                    );
                    return Ok(UpdatePlan::BuildFromSource {
                        version: version.to_string(),
                    });
                }
                None => return Err(e),
            },
        };

        if release.tag == clean(&self.current_version) {
            tracing::debug!("Running version {} is current", self.current_version);
            return Ok(UpdatePlan::AlreadyLatest {
                version: release.tag,
            });
        }

        let Some(asset) = select_asset(&release.assets, &self.binary_name, &self.platform) else {
            tracing::warn!(
                "Release {} has no binary for {}; building from source",
                release.tag,
                self.platform
            );
            return Ok(UpdatePlan::BuildFromSource {
                version: release.tag,
            });
        };

        Ok(UpdatePlan::Install {
            url: asset.download_url.clone(),
            tag: release.tag,
        })
    }

    /// Carry out `plan`.
    pub fn apply(&self, plan: UpdatePlan) -> UpdateResult<UpdateOutcome> {
        match plan {
            UpdatePlan::AlreadyLatest { version } => Ok(UpdateOutcome::AlreadyLatest { version }),
            UpdatePlan::Install { tag, url } => {
                tracing::info!("Installing {} from {}", tag, url);
                let path = self.installer.install(&url)?;
                Ok(UpdateOutcome::Installed { tag, path })
            }
            UpdatePlan::BuildFromSource { version } => {
                let location = self.builder.build_from_source(&version)?;
                Ok(UpdateOutcome::BuiltFromSource {
                    tag: ensure_prefix(&version),
                    location,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updates::platform::asset_name;
    use crate::updates::release::{Asset, ReleaseMetadata};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Calls recorded by the stubs, shared between them and the test.
    #[derive(Default)]
    struct Calls {
        fetched: Vec<String>,
        installed: Vec<String>,
        built: Vec<String>,
    }

    type Shared = Rc<RefCell<Calls>>;

    struct StubReleases {
        calls: Shared,
        release: Option<ReleaseMetadata>,
    }

    impl ReleaseSource for StubReleases {
        fn fetch(&self, version: &str) -> UpdateResult<ReleaseMetadata> {
            self.calls.borrow_mut().fetched.push(version.to_string());
            self.release
                .clone()
                .ok_or_else(|| UpdateError::ReleaseNotFound {
                    version: if version.is_empty() {
                        "latest".into()
                    } else {
                        version.into()
                    },
                    status: 404,
                })
        }
    }

    struct StubInstaller {
        calls: Shared,
        fail: bool,
    }

    impl BinaryInstall for StubInstaller {
        fn install(&self, url: &str) -> UpdateResult<PathBuf> {
            self.calls.borrow_mut().installed.push(url.to_string());
            if self.fail {
                return Err(UpdateError::DownloadFailed {
                    message: "HTTP 500".into(),
                });
            }
            Ok(PathBuf::from("/usr/local/bin/fp"))
        }
    }

    struct StubBuilder {
        calls: Shared,
    }

    impl SourceInstall for StubBuilder {
        fn build_from_source(&self, version: &str) -> UpdateResult<PathBuf> {
            self.calls.borrow_mut().built.push(version.to_string());
            Ok(PathBuf::from("/home/me/.cargo/bin"))
        }
    }

    fn linux() -> Platform {
        Platform::new("linux", "x86_64")
    }

    fn release(tag: &str, with_linux_asset: bool) -> ReleaseMetadata {
        let mut assets = vec![Asset {
            name: asset_name("fp", &Platform::new("macos", "aarch64")),
            download_url: "https://example.test/fp_macos_aarch64.tar.gz".into(),
        }];
        if with_linux_asset {
            assets.push(Asset {
                name: asset_name("fp", &linux()),
                download_url: "https://example.test/fp_linux_x86_64.tar.gz".into(),
            });
        }
        ReleaseMetadata {
            tag: tag.into(),
            assets,
        }
    }

    fn updater(
        current: &str,
        release: Option<ReleaseMetadata>,
        install_fails: bool,
    ) -> (Updater, Shared) {
        let calls = Shared::default();
        let updater = Updater::new(
            Box::new(StubReleases {
                calls: calls.clone(),
                release,
            }),
            Box::new(StubInstaller {
                calls: calls.clone(),
                fail: install_fails,
            }),
            Box::new(StubBuilder {
                calls: calls.clone(),
            }),
            "fp",
            current,
        )
        .with_platform(linux());
        (updater, calls)
    }

    #[test]
    fn installs_newer_release_with_matching_asset() {
        let (updater, calls) = updater("v1.0.0", Some(release("v1.2.0", true)), false);

        let outcome = updater.update(None, false).unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Installed {
                tag: "v1.2.0".into(),
                path: PathBuf::from("/usr/local/bin/fp"),
            }
        );
        let calls = calls.borrow();
        assert_eq!(calls.fetched, vec![""]);
        assert_eq!(
            calls.installed,
            vec!["https://example.test/fp_linux_x86_64.tar.gz"]
        );
        assert!(calls.built.is_empty());
    }

    #[test]
    fn same_version_is_already_latest_without_download() {
        let (updater, calls) = updater("v1.0.0", Some(release("v1.0.0", true)), false);

        let outcome = updater.update(None, false).unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::AlreadyLatest {
                version: "v1.0.0".into()
            }
        );
        assert!(calls.borrow().installed.is_empty());
        assert!(calls.borrow().built.is_empty());
    }

    #[test]
    fn decorated_running_version_compares_normalized() {
        let (updater, calls) =
            updater("v1.0.0-4-g1a2b3c4-dirty", Some(release("v1.0.0", true)), false);

        let outcome = updater.update(None, false).unwrap();

        assert!(matches!(outcome, UpdateOutcome::AlreadyLatest { .. }));
        assert!(calls.borrow().installed.is_empty());
    }

    #[test]
    fn missing_asset_builds_resolved_tag() {
        let (updater, calls) = updater("v1.0.0", Some(release("v1.2.0", false)), false);

        let outcome = updater.update(None, false).unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::BuiltFromSource {
                tag: "v1.2.0".into(),
                location: PathBuf::from("/home/me/.cargo/bin"),
            }
        );
        let calls = calls.borrow();
        assert_eq!(calls.built, vec!["v1.2.0"]);
        assert!(calls.installed.is_empty());
    }

    #[test]
    fn resolution_failure_without_version_is_fatal() {
        let (updater, calls) = updater("v1.0.0", None, false);

        let err = updater.update(None, false).unwrap_err();

        assert!(matches!(err, UpdateError::ReleaseNotFound { .. }));
        assert!(calls.borrow().built.is_empty());
    }

    #[test]
    fn resolution_failure_with_version_builds_that_version() {
        let (updater, calls) = updater("v1.0.0", None, false);

        let outcome = updater.update(Some("1.3.0"), false).unwrap();

        assert_eq!(outcome.version(), "v1.3.0");
        let calls = calls.borrow();
        assert_eq!(calls.fetched, vec!["1.3.0"]);
        assert_eq!(calls.built, vec!["1.3.0"]);
    }

    #[test]
    fn from_source_requires_version() {
        let (updater, calls) = updater("v1.0.0", Some(release("v1.2.0", true)), false);

        for explicit in [None, Some(""), Some("  ")] {
            let err = updater.update(explicit, true).unwrap_err();
            assert!(matches!(err, UpdateError::MissingVersion));
        }
        assert!(calls.borrow().fetched.is_empty());
    }

    #[test]
    fn from_source_skips_resolution() {
        let (updater, calls) = updater("v1.0.0", Some(release("v1.2.0", true)), false);

        let outcome = updater.update(Some("v1.1.0"), true).unwrap();

        assert!(matches!(outcome, UpdateOutcome::BuiltFromSource { .. }));
        let calls = calls.borrow();
        assert!(calls.fetched.is_empty());
        assert!(calls.installed.is_empty());
        assert_eq!(calls.built, vec!["v1.1.0"]);
    }

    #[test]
    fn install_failure_is_not_reported_as_success() {
        let (updater, calls) = updater("v1.0.0", Some(release("v1.2.0", true)), true);

        let err = updater.update(None, false).unwrap_err();

        assert!(matches!(err, UpdateError::DownloadFailed { .. }));
        assert!(calls.borrow().built.is_empty());
    }

    #[test]
    fn plan_does_not_download_or_build() {
        let (updater, calls) = updater("v1.0.0", Some(release("v1.2.0", false)), false);

        let plan = updater.plan(None, false).unwrap();

        assert_eq!(
            plan,
            UpdatePlan::BuildFromSource {
                version: "v1.2.0".into()
            }
        );
        let calls = calls.borrow();
        assert_eq!(calls.fetched.len(), 1);
        assert!(calls.installed.is_empty());
        assert!(calls.built.is_empty());
    }

    #[test]
    fn plan_picks_platform_asset_url() {
        let (updater, _calls) = updater("v1.0.0", Some(release("v1.2.0", true)), false);

        assert_eq!(
            updater.plan(None, false).unwrap(),
            UpdatePlan::Install {
                tag: "v1.2.0".into(),
                url: "https://example.test/fp_linux_x86_64.tar.gz".into(),
            }
        );
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(
            UpdateOutcome::AlreadyLatest {
                version: "v1.0.0".into()
            }
            .to_string(),
            "Already at latest version v1.0.0"
        );
        assert_eq!(
            UpdateOutcome::Installed {
                tag: "v1.2.0".into(),
                path: PathBuf::from("/usr/local/bin/fp"),
            }
            .to_string(),
            "Updated to v1.2.0"
        );
    }
}
