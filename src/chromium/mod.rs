//! Chromium binary provisioning.
//!
//! This module guarantees that a platform-specific Chromium executable
//! exists at a deterministic local path, downloading and unpacking it
//! exactly once:
//! - Platform enumeration (archive key, executable name, chmod policy)
//! - Streaming archive download with progress reporting
//! - Extraction strategies (system `7z` or in-process unzip)
//! - Marker-file idempotency
//!
//! # Public API
//!
//! ```rust,ignore
//! use open_webdriver::chromium::{
//!     ChromiumProvisioner,
//!     acquire_chromium_exe,
//!     check_chromium_installed,
//! };
//! ```

// === Submodules ===

mod download;
pub mod error;
mod extract;
mod platform;
pub mod progress;
mod provision;

#[cfg(test)]
pub(crate) mod test_utils;

// === Public API (facade) ===

// Error types
pub use error::{ChromiumError, ChromiumResult};

// Platform enumeration
pub use platform::Platform;

// Progress reporting
pub use progress::{CliProgress, NoopProgress, ProgressReporter};

// Provisioning
pub use provision::{
    ARCHIVE_BASE_URL_ENV, ChromiumProvisioner, DEFAULT_ARCHIVE_BASE_URL, acquire_chromium_exe,
    check_chromium_installed,
};
