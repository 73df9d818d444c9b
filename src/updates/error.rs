//! Error types for the self-update subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for update operations.
pub type UpdateResult<T> = std::result::Result<T, UpdateError>;

/// Errors that can occur while checking for, resolving or installing updates.
#[derive(Debug, Error)]
pub enum UpdateError {
    // Release API errors
    #[error("Failed to reach the release server: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Release not found: {version} (HTTP {status})")]
    ReleaseNotFound { version: String, status: u16 },

    #[error("Malformed release metadata: {message}")]
    MalformedRelease { message: String },

    // Installation errors
    #[error("Could not resolve the running executable: {source}")]
    ExecutableNotResolved {
        #[source]
        source: std::io::Error,
    },

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Failed to read release archive: {source}")]
    Archive {
        #[source]
        source: std::io::Error,
    },

    #[error("Binary '{name}' not found in archive")]
    BinaryNotInArchive { name: String },

    #[error(
        "Cannot replace {path}: {source}. Try again with elevated privileges (e.g. `sudo fp update`)"
    )]
    ReplaceDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write new binary to {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to make {path} executable: {source}")]
    PermissionsFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Source build errors
    #[error("{toolchain} is not installed; install the Rust toolchain from https://rustup.rs")]
    ToolchainMissing { toolchain: String },

    #[error("Source install of {version} failed: {message}")]
    SourceBuildFailed { version: String, message: String },

    // Usage errors
    #[error("A version is required when building from source (e.g. `fp update v1.2.0 --tag`)")]
    MissingVersion,

    // File system errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UpdateError {
    /// Check if this error came from talking to the release server.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::ReleaseNotFound { .. } | Self::MalformedRelease { .. }
        )
    }
}
