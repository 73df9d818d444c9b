//! Version strings and their normalization.
//!
//! Builds made from a git checkout carry `git describe` decoration, e.g.
//! `v0.0.10-1-ge69cbeb-dirty`. Release tags never do, so comparisons against
//! the release server always go through [`clean`] first.

use regex::Regex;
use std::sync::LazyLock;

/// Version of the running build.
///
/// Release builds set `FOOTPRINT_BUILD_VERSION` to the output of
/// `git describe --tags --dirty`; everything else reports the crate version.
pub const VERSION: &str = match option_env!("FOOTPRINT_BUILD_VERSION") {
    Some(version) => version,
    None => concat!("v", env!("CARGO_PKG_VERSION")),
};

/// Version reported by local development builds. Never checked for updates.
pub const DEV_VERSION: &str = "dev";

const DIRTY_SUFFIX: &str = "-dirty";

/// `-{commits}-g{hash}` at the end of the string. The leading `-` forces the
/// commit count to be its own all-digit segment.
static DESCRIBE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-[0-9]+-g[0-9a-fA-F]+$").expect("describe suffix pattern is valid")
});

/// Strip VCS-describe decoration from a version string.
///
/// Removes a trailing `-dirty` marker and a trailing `-{digits}-g{hex}`
/// suffix. Pre-release tags that merely look similar (`-alpha-gabc123`)
/// are left alone. Repeats until nothing changes, so the result is stable
/// under a second application.
pub fn clean(version: &str) -> String {
    let mut current = version;
    loop {
        let before = current.len();

        if let Some(stripped) = current.strip_suffix(DIRTY_SUFFIX) {
            current = stripped;
        }
        if let Some(found) = DESCRIBE_SUFFIX.find(current) {
            current = &current[..found.start()];
        }

        if current.len() == before {
            return current.to_string();
        }
    }
}

/// Ensure a version carries the leading `v` used by release tags.
pub fn ensure_prefix(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}

/// Whether the version is a development build that should never be checked.
pub fn is_dev_version(version: &str) -> bool {
    version.is_empty() || version == DEV_VERSION
}
