//! Error types for Chromium provisioning.
//!
//! A single error enum covers the whole provisioning sequence, keeping
//! error plumbing out of the orchestration code.

use std::path::PathBuf;
use thiserror::Error;

use crate::paths::PathError;

/// Errors that can occur while provisioning the Chromium binary.
#[derive(Debug, Error)]
pub enum ChromiumError {
    /// The running platform has no published Chromium archive.
    #[error("Unsupported platform: {platform}")]
    UnsupportedPlatform { platform: String },

    /// The archive download could not complete.
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// The archive file is absent after the download step returned.
    #[error("Downloaded archive not found: {path}")]
    ArchiveMissing { path: PathBuf },

    /// The in-process extractor rejected or failed on the archive.
    #[error("Failed to extract archive: {0}")]
    ExtractionFailed(String),

    /// The expected executable is absent after extraction.
    #[error("Chromium executable not found: {path}")]
    ExecutableMissing { path: PathBuf },

    /// Cache path resolution failed.
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for provisioning operations.
pub type ChromiumResult<T> = Result<T, ChromiumError>;
