//! Supported platform enumeration.
//!
//! The published Chromium archives are keyed by the identifiers below;
//! each variant carries its executable name and whether extracted files
//! need their mode fixed after unpacking.

use std::fmt;

use super::error::ChromiumResult;

/// A platform with a published Chromium archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows x64 (`win32.zip`).
    Win32,
    /// Linux x64 (`linux.zip`).
    Linux,
}

impl Platform {
    /// Detect the running platform.
    ///
    /// Fails with `UnsupportedPlatform` on any OS without a published
    /// archive, before any filesystem or network I/O.
    pub fn current() -> ChromiumResult<Self> {
        #[cfg(target_os = "windows")]
        {
            Ok(Self::Win32)
        }

        #[cfg(target_os = "linux")]
        {
            Ok(Self::Linux)
        }

        #[cfg(not(any(target_os = "windows", target_os = "linux")))]
        {
            Err(super::error::ChromiumError::UnsupportedPlatform {
                platform: std::env::consts::OS.to_string(),
            })
        }
    }

    /// The identifier used for archive names and cache directories.
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Win32 => "win32",
            Self::Linux => "linux",
        }
    }

    /// Name of the browser executable inside the extracted directory.
    pub const fn executable_name(self) -> &'static str {
        match self {
            Self::Win32 => "chrome.exe",
            Self::Linux => "chrome",
        }
    }

    /// Whether extracted files need their mode set to 0755.
    ///
    /// Windows binaries carry no executable bit, so the fix is skipped
    /// there entirely.
    pub const fn needs_permission_fix(self) -> bool {
        match self {
            Self::Win32 => false,
            Self::Linux => true,
        }
    }

    /// Whether extraction should prefer the system `7z` tool when present.
    pub const fn prefers_system_unzip(self) -> bool {
        matches!(self, Self::Linux)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
