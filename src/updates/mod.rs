//! Self-update: release checks, binary installs and source builds.
//!
//! - [`checker`] answers "is there a newer release" with a day-long cache
//! - [`notice`] prints that answer before ordinary commands
//! - [`orchestrator`] runs `fp update`, built from [`release`],
//!   [`platform`], [`install`] and [`source`]

pub mod checker;
pub mod error;
pub mod install;
pub mod notice;
pub mod orchestrator;
pub mod platform;
pub mod release;
pub mod source;
pub mod version;

pub use checker::{Clock, SystemClock, UpdateChecker, UpdateStatus, CHECK_INTERVAL};
pub use error::{UpdateError, UpdateResult};
pub use install::{BinaryInstall, BinaryInstaller};
pub use notice::{check_and_notify, notice_enabled, show_update_notice, QUIET_COMMANDS};
pub use orchestrator::{UpdateOutcome, UpdatePlan, Updater};
pub use platform::{asset_name, select_asset, Platform};
pub use release::{Asset, ReleaseMetadata, ReleaseResolver, ReleaseSource};
pub use source::{cargo_bin_dir, SourceBuilder, SourceInstall};
pub use version::{clean, ensure_prefix, is_dev_version, DEV_VERSION, VERSION};
