//! Idempotent Chromium provisioning.
//!
//! The provisioning sequence for a platform is: download the archive,
//! extract it next to the archive (archives carry a top-level
//! `<platform>/` directory), fix executable bits, write the `finished`
//! marker, delete the archive. The marker's existence is the sole
//! completion signal: once present, later calls return the executable
//! path without touching the network.
//!
//! # Concurrency
//!
//! There is no lock around the marker check-then-act sequence. Two
//! concurrent invocations over the same cache may both observe a missing
//! marker and provision twice, with undefined interleaving of writes.
//! Callers that need concurrent safety must serialize externally.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{info, warn};

use super::download::download_file;
use super::error::{ChromiumError, ChromiumResult};
use super::extract::{ArchiveExtractor, ZipExtractor, select_extractor};
use super::platform::Platform;
use super::progress::{NoopProgress, ProgressReporter};
use crate::paths::{chromium_cache_root, ensure_directory};

/// Default host for the published per-platform Chromium archives.
pub const DEFAULT_ARCHIVE_BASE_URL: &str =
    "https://github.com/zackees/open-webdriver/raw/main/chromium";

/// Environment variable overriding the archive base URL.
pub const ARCHIVE_BASE_URL_ENV: &str = "OPEN_WEBDRIVER_CHROMIUM_BASE_URL";

/// Marker file written as the final provisioning step.
const MARKER_FILE: &str = "finished";

/// Downloads and unpacks the Chromium binary for a platform, exactly once.
pub struct ChromiumProvisioner {
    cache_root: PathBuf,
    base_url: String,
    client: Client,
    overwrite: bool,
    progress: Box<dyn ProgressReporter>,
}

impl ChromiumProvisioner {
    /// Create a provisioner over the default cache root.
    ///
    /// Only resolves paths; nothing is written to disk until
    /// provisioning actually runs.
    pub fn new() -> ChromiumResult<Self> {
        Ok(Self::with_cache_root(chromium_cache_root()?))
    }

    /// Create a provisioner over an explicit cache root.
    ///
    /// The base URL still honors `OPEN_WEBDRIVER_CHROMIUM_BASE_URL`.
    pub fn with_cache_root(cache_root: impl Into<PathBuf>) -> Self {
        let base_url = env::var(ARCHIVE_BASE_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_ARCHIVE_BASE_URL.to_string());

        Self {
            cache_root: cache_root.into(),
            base_url,
            client: Client::new(),
            overwrite: false,
            progress: Box::new(NoopProgress),
        }
    }

    /// Override the archive base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Re-download the archive even when a previous download left one behind.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Attach a progress reporter for the download step.
    pub fn progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Directory holding the extracted install for `platform`.
    pub fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.cache_root.join(platform.identifier())
    }

    /// Path of the completion marker for `platform`.
    pub fn marker_path(&self, platform: Platform) -> PathBuf {
        self.platform_dir(platform).join(MARKER_FILE)
    }

    /// Path the downloaded archive is written to.
    pub fn archive_path(&self, platform: Platform) -> PathBuf {
        self.cache_root
            .join(format!("{}.zip", platform.identifier()))
    }

    /// Expected path of the browser executable for `platform`.
    pub fn executable_path(&self, platform: Platform) -> PathBuf {
        self.platform_dir(platform).join(platform.executable_name())
    }

    /// URL of the archive for `platform`.
    pub fn archive_url(&self, platform: Platform) -> String {
        format!(
            "{}/{}.zip",
            self.base_url.trim_end_matches('/'),
            platform.identifier()
        )
    }

    /// Whether provisioning has already completed for `platform`.
    pub fn is_provisioned(&self, platform: Platform) -> bool {
        self.marker_path(platform).exists()
    }

    /// Ensure the Chromium executable for the running platform is present.
    ///
    /// Returns the absolute executable path. Fails with
    /// `UnsupportedPlatform` before any I/O on platforms without a
    /// published archive.
    pub async fn acquire(&self) -> ChromiumResult<PathBuf> {
        self.acquire_for(Platform::current()?).await
    }

    /// Ensure the Chromium executable for `platform` is present.
    pub async fn acquire_for(&self, platform: Platform) -> ChromiumResult<PathBuf> {
        if !self.is_provisioned(platform) {
            self.provision(platform).await?;
        }

        let exe = self.executable_path(platform);
        if !exe.exists() {
            return Err(ChromiumError::ExecutableMissing { path: exe });
        }
        Ok(exe)
    }

    /// Run the full download-extract-chmod-mark sequence for `platform`.
    async fn provision(&self, platform: Platform) -> ChromiumResult<()> {
        ensure_directory(&self.cache_root)?;

        let archive = self.archive_path(platform);
        let url = self.archive_url(platform);

        info!(%platform, url, "provisioning chromium");
        download_file(
            &self.client,
            &url,
            &archive,
            self.overwrite,
            self.progress.as_ref(),
        )
        .await?;

        ensure_archive_present(&archive)?;

        info!(archive = %archive.display(), "unpacking archive");
        self.extract_archive(platform, &archive)?;

        if platform.needs_permission_fix() {
            info!(dir = %self.platform_dir(platform).display(), "fixing executable permissions");
            set_exe_permissions(&self.platform_dir(platform))?;
        }

        fs::write(self.marker_path(platform), b"")?;
        fs::remove_file(&archive)?;

        info!(%platform, "chromium provisioned");
        Ok(())
    }

    /// Extract `archive` into the cache root with the selected strategy,
    /// falling back to the in-process extractor when an external tool
    /// fails.
    fn extract_archive(&self, platform: Platform, archive: &Path) -> ChromiumResult<()> {
        let extractor = select_extractor(platform);
        match extractor.extract(archive, &self.cache_root) {
            Ok(()) => Ok(()),
            Err(err) if extractor.name() != ZipExtractor.name() => {
                warn!(
                    tool = extractor.name(),
                    error = %err,
                    "external extraction failed, falling back to in-process unzip"
                );
                ZipExtractor.extract(archive, &self.cache_root)
            }
            Err(err) => Err(err),
        }
    }
}

/// Fail fast when the archive is absent after the download step returned.
fn ensure_archive_present(archive: &Path) -> ChromiumResult<()> {
    if archive.exists() {
        Ok(())
    } else {
        Err(ChromiumError::ArchiveMissing {
            path: archive.to_path_buf(),
        })
    }
}

/// Ensure the Chromium executable for the running platform is present,
/// using the default cache root, and return its path.
///
/// The platform is resolved before anything else, so on unsupported
/// platforms this fails without touching the filesystem or the network.
pub async fn acquire_chromium_exe() -> ChromiumResult<PathBuf> {
    let platform = Platform::current()?;
    ChromiumProvisioner::new()?.acquire_for(platform).await
}

/// Check whether Chromium is already provisioned for the running platform.
///
/// Returns `false` on unsupported platforms and on any resolution error.
pub fn check_chromium_installed() -> bool {
    let Ok(platform) = Platform::current() else {
        return false;
    };
    let Ok(provisioner) = ChromiumProvisioner::new() else {
        return false;
    };
    provisioner.is_provisioned(platform) && provisioner.executable_path(platform).exists()
}

/// Recursively set mode 0755 on every regular file under `dir`.
///
/// A missing directory is treated as empty, matching the directory-walk
/// semantics the archives were originally unpacked with.
#[cfg(unix)]
fn set_exe_permissions(dir: &Path) -> ChromiumResult<()> {
    use std::os::unix::fs::PermissionsExt;

    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            set_exe_permissions(&entry.path())?;
        } else if file_type.is_file() {
            fs::set_permissions(&entry.path(), fs::Permissions::from_mode(0o755))?;
        }
    }

    Ok(())
}

#[cfg(not(unix))]
fn set_exe_permissions(_dir: &Path) -> ChromiumResult<()> {
    Ok(())
}
