//! open-webdriver: idempotent Chromium provisioning plus a thin
//! webdriver session wrapper.
//!
//! The crate guarantees that a platform-specific Chromium executable is
//! present locally, downloading and unpacking it on first use, and hands
//! out sessions against a running chromedriver backed by that binary.
//!
//! ```rust,ignore
//! use open_webdriver::{SessionConfig, open_webdriver};
//!
//! let session = open_webdriver(&SessionConfig::default()).await?;
//! session.goto("https://www.google.com").await?;
//! session.quit().await?;
//! ```
//!
//! Library callers that only need the binary use the provisioner
//! directly:
//!
//! ```rust,ignore
//! let exe = open_webdriver::chromium::acquire_chromium_exe().await?;
//! ```

pub mod chromium;
pub mod paths;
pub mod session;

pub use chromium::{
    ChromiumError, ChromiumProvisioner, Platform, acquire_chromium_exe, check_chromium_installed,
};
pub use session::{SessionConfig, SessionError, WebdriverSession, open_webdriver};
