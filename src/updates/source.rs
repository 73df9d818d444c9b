//! Source builds through cargo.
//!
//! Used when a release has no binary for this platform, or when the user
//! asks for one explicitly with `fp update <version> --tag`.

use std::env;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::error::{UpdateError, UpdateResult};
use super::version::ensure_prefix;

/// Builds and installs a given version from source.
pub trait SourceInstall {
    /// Build and install `version`, returning the install directory.
    fn build_from_source(&self, version: &str) -> UpdateResult<PathBuf>;
}

/// Installs a tagged version with `cargo install --git`.
#[derive(Debug, Clone)]
pub struct SourceBuilder {
    toolchain: String,
    repository: String,
    package: String,
}

impl SourceBuilder {
    /// Create a builder installing `package` from `repository` with cargo.
    pub fn new(repository: &str, package: &str) -> Self {
        Self {
            toolchain: "cargo".to_string(),
            repository: repository.to_string(),
            package: package.to_string(),
        }
    }

    /// Use a different toolchain executable.
    pub fn with_toolchain(mut self, toolchain: &str) -> Self {
        self.toolchain = toolchain.to_string();
        self
    }

    /// Arguments passed to the toolchain to install `tag`.
    pub fn install_args(&self, tag: &str) -> Vec<String> {
        vec![
            "install".to_string(),
            "--git".to_string(),
            self.repository.clone(),
            "--tag".to_string(),
            tag.to_string(),
            "--locked".to_string(),
            "--force".to_string(),
            self.package.clone(),
        ]
    }

    fn ensure_toolchain(&self) -> UpdateResult<()> {
        let available = Command::new(&self.toolchain)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        if available {
            Ok(())
        } else {
            Err(UpdateError::ToolchainMissing {
                toolchain: self.toolchain.clone(),
            })
        }
    }
}

impl SourceInstall for SourceBuilder {
    fn build_from_source(&self, version: &str) -> UpdateResult<PathBuf> {
        self.ensure_toolchain()?;

        let tag = ensure_prefix(version);
        let args = self.install_args(&tag);
        tracing::info!("Running: {} {}", self.toolchain, args.join(" "));

        let status = Command::new(&self.toolchain)
            .args(&args)
            .status()
            .map_err(|e| UpdateError::SourceBuildFailed {
                version: tag.clone(),
                message: format!("failed to run {}: {}", self.toolchain, e),
            })?;

        if !status.success() {
            return Err(UpdateError::SourceBuildFailed {
                version: tag,
                message: match status.code() {
                    Some(code) => format!("{} install exited with code {}", self.toolchain, code),
                    None => format!("{} install was terminated by a signal", self.toolchain),
                },
            });
        }

        Ok(cargo_bin_dir())
    }
}

/// Directory where `cargo install` puts binaries.
///
/// `$CARGO_HOME/bin` when set, otherwise `~/.cargo/bin`.
pub fn cargo_bin_dir() -> PathBuf {
    if let Ok(cargo_home) = env::var("CARGO_HOME") {
        if !cargo_home.is_empty() {
            return PathBuf::from(cargo_home).join("bin");
        }
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".cargo")
        .join("bin")
}
