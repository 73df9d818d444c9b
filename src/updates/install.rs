//! Binary download and installation.
//!
//! Replaces the running executable with the binary from a release archive.
//! The new binary is staged next to the target and renamed over it, so the
//! target path always holds either the old or the new binary. When staging
//! is impossible the installer falls back to remove-then-copy, which is safe
//! for a running process on Unix (the old inode stays alive until exit) but
//! leaves no binary behind if interrupted between the two steps.

use flate2::read::GzDecoder;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use super::error::{UpdateError, UpdateResult};

/// Installs a binary from a release asset URL.
pub trait BinaryInstall {
    /// Download the archive at `url` and install its binary.
    ///
    /// Returns the path that was replaced.
    fn install(&self, url: &str) -> UpdateResult<PathBuf>;
}

/// Downloads release archives and swaps the executable in place.
pub struct BinaryInstaller {
    client: reqwest::blocking::Client,
    executable_name: String,
    target: Option<PathBuf>,
}

impl BinaryInstaller {
    /// Create an installer looking for `executable_name` inside archives.
    pub fn new(executable_name: &str, timeout: Duration) -> UpdateResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("footprint/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            executable_name: executable_name.to_string(),
            target: None,
        })
    }

    /// Replace `target` instead of the running executable.
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Resolve the file to replace, following symlinks to the real file.
    pub fn resolve_target(&self) -> UpdateResult<PathBuf> {
        let path = match &self.target {
            Some(path) => path.clone(),
            None => std::env::current_exe()
                .map_err(|source| UpdateError::ExecutableNotResolved { source })?,
        };

        fs::canonicalize(&path).map_err(|source| UpdateError::ExecutableNotResolved { source })
    }

    /// Stream the asset at `url` into a private temp file.
    fn download(&self, url: &str) -> UpdateResult<NamedTempFile> {
        tracing::debug!("Downloading {}", url);

        let mut response =
            self.client
                .get(url)
                .send()
                .map_err(|e| UpdateError::DownloadFailed {
                    message: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::DownloadFailed {
                message: format!("HTTP {} fetching {}", status, url),
            });
        }

        let mut file = NamedTempFile::new()?;
        response
            .copy_to(file.as_file_mut())
            .map_err(|e| UpdateError::DownloadFailed {
                message: e.to_string(),
            })?;
        file.as_file_mut().flush()?;

        Ok(file)
    }
}

impl BinaryInstall for BinaryInstaller {
    fn install(&self, url: &str) -> UpdateResult<PathBuf> {
        let target = self.resolve_target()?;
        tracing::info!("Installing update to {}", target.display());

        // Both temp files are deleted when they drop, on every return path.
        let archive = self.download(url)?;
        let archive_file = fs::File::open(archive.path())?;
        let binary = extract_binary(archive_file, &self.executable_name)?;

        replace_binary(binary.path(), &target)?;
        Ok(target)
    }
}

/// Extract the first regular file named `executable_name` from a `.tar.gz`.
///
/// Entries are scanned in order; any directory prefix is accepted, so both
/// `fp` and `project/fp` match. The bytes land in a private temp file.
pub fn extract_binary<R: Read>(archive: R, executable_name: &str) -> UpdateResult<NamedTempFile> {
    let mut archive = tar::Archive::new(GzDecoder::new(archive));
    let entries = archive
        .entries()
        .map_err(|source| UpdateError::Archive { source })?;

    for entry in entries {
        let mut entry = entry.map_err(|source| UpdateError::Archive { source })?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry
            .path()
            .map_err(|source| UpdateError::Archive { source })?
            .into_owned();
        if !is_binary_entry(&path, executable_name) {
            continue;
        }

        tracing::debug!("Found {} in archive", path.display());
        let mut out = NamedTempFile::new()?;
        io::copy(&mut entry, out.as_file_mut())
            .map_err(|source| UpdateError::Archive { source })?;
        out.as_file_mut().flush()?;
        return Ok(out);
    }

    Err(UpdateError::BinaryNotInArchive {
        name: executable_name.to_string(),
    })
}

/// Whether an archive path names the binary, with or without a directory prefix.
fn is_binary_entry(path: &Path, executable_name: &str) -> bool {
    path.file_name()
        .map(|name| name == executable_name)
        .unwrap_or(false)
}

/// Put the binary at `new_binary` in place of `target`.
pub fn replace_binary(new_binary: &Path, target: &Path) -> UpdateResult<()> {
    match stage_beside(new_binary, target) {
        Ok(staged) => match staged.persist(target) {
            Ok(_) => return Ok(()),
            Err(e) => {
                tracing::warn!(
                    "Atomic rename onto {} failed ({}); replacing in place",
                    target.display(),
                    e.error
                );
            }
        },
        Err(e) => {
            tracing::warn!(
                "Cannot stage update next to {} ({}); replacing in place",
                target.display(),
                e
            );
        }
    }

    replace_in_place(new_binary, target)
}

/// Copy the new binary into a temp file in the target's directory.
///
/// Sharing a directory keeps the temp file on the target's filesystem, which
/// is what makes the following rename atomic.
fn stage_beside(new_binary: &Path, target: &Path) -> UpdateResult<NamedTempFile> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::Builder::new()
        .prefix(".fp-update-")
        .tempfile_in(dir)?;

    let mut source = fs::File::open(new_binary)?;
    io::copy(&mut source, staged.as_file_mut())?;
    staged.as_file_mut().sync_all()?;
    make_executable(staged.path())?;

    Ok(staged)
}

/// Remove the target, then copy the new binary to its path.
fn replace_in_place(new_binary: &Path, target: &Path) -> UpdateResult<()> {
    match fs::remove_file(target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(UpdateError::ReplaceDenied {
                path: target.to_path_buf(),
                source,
            })
        }
    }

    fs::copy(new_binary, target).map_err(|source| UpdateError::CopyFailed {
        path: target.to_path_buf(),
        source,
    })?;

    make_executable(target)
}

/// Make `path` readable and executable by everyone, writable by the owner.
#[cfg(unix)]
fn make_executable(path: &Path) -> UpdateResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let set = || -> io::Result<()> {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        fs::set_permissions(path, perms)
    };

    set().map_err(|source| UpdateError::PermissionsFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> UpdateResult<()> {
    Ok(())
}
