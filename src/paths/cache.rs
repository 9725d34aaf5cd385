//! Cache root resolution for downloaded browser binaries.
//!
//! Resolution order:
//! 1. `OPEN_WEBDRIVER_CACHE_DIR` environment variable (highest priority)
//! 2. System cache directory (e.g. `~/.cache/open-webdriver`)
//!
//! Resolution only computes paths. Nothing is created here; the
//! provisioner creates the cache root when it actually runs, so that
//! resolving paths (or failing early on an unsupported platform) leaves
//! the filesystem untouched.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "OPEN_WEBDRIVER_CACHE_DIR";

/// Get the root directory for all open-webdriver cached data.
pub fn cache_root() -> Result<PathBuf, PathError> {
    // 1. Runtime override (highest priority)
    if let Ok(path) = env::var(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    // 2. Default to system cache directory
    let cache_dir = dirs::cache_dir().ok_or(PathError::NoCacheDir)?;
    Ok(cache_dir.join("open-webdriver"))
}

/// Get the directory holding per-platform Chromium installs.
///
/// Layout beneath this root:
///
/// ```text
/// <chromium-root>/<platform>/finished          (empty marker file)
/// <chromium-root>/<platform>/<executable-name> (+ supporting files)
/// <chromium-root>/<platform>.zip               (transient, deleted after use)
/// ```
pub fn chromium_cache_root() -> Result<PathBuf, PathError> {
    Ok(cache_root()?.join("chromium"))
}
