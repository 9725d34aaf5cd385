//! Path utilities for the open-webdriver cache layout.
//!
//! This module provides the canonical path resolution for cached browser
//! binaries:
//! - Cache root (env-overridable, defaults to the system cache directory)
//! - Chromium install root
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O; the CLI handles user-facing output
//! - Per-platform layout (archive, marker, executable) lives with the
//!   provisioner, which owns the platform enumeration

mod cache;
mod ensure;
mod error;

// Re-export public API

pub use cache::{CACHE_DIR_ENV, cache_root, chromium_cache_root};
pub use ensure::{ensure_directory, verify_writable};
pub use error::PathError;
