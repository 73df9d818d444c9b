//! Platform detection and release asset selection.

use std::fmt;

use super::release::Asset;

/// Operating system and CPU architecture a binary is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS identifier, e.g. `linux`, `macos`, `windows`.
    pub os: String,
    /// Architecture identifier, e.g. `x86_64`, `aarch64`.
    pub arch: String,
}

impl Platform {
    /// Create a platform from explicit identifiers.
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// The platform this binary is running on.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Name of the release asset for `binary_name` on `platform`.
pub fn asset_name(binary_name: &str, platform: &Platform) -> String {
    format!("{}_{}_{}.tar.gz", binary_name, platform.os, platform.arch)
}

/// Pick the asset built for `platform`.
///
/// Only an exact file name match counts. `None` is not an error; callers
/// decide whether to fall back to a source build.
pub fn select_asset<'a>(
    assets: &'a [Asset],
    binary_name: &str,
    platform: &Platform,
) -> Option<&'a Asset> {
    let wanted = asset_name(binary_name, platform);
    assets.iter().find(|asset| asset.name == wanted)
}
