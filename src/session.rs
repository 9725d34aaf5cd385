//! Thin webdriver session wrapper.
//!
//! Everything protocol-level is delegated to `thirtyfour`; this module
//! only provisions the Chromium binary, points the Chrome capabilities
//! at it, and connects to a running chromedriver endpoint.

use std::ops::Deref;
use std::path::Path;

use thiserror::Error;
use thirtyfour::ChromeCapabilities;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::debug;

use crate::chromium::{ChromiumError, acquire_chromium_exe};

/// Default chromedriver endpoint.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Errors that can occur while opening a webdriver session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Provisioning the browser binary failed.
    #[error("Failed to provision Chromium: {0}")]
    Chromium(#[from] ChromiumError),

    /// The webdriver client failed to build capabilities or connect.
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] WebDriverError),
}

/// Options for opening a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Log the resolved binary and capabilities at debug level.
    pub verbose: bool,
    /// Address of a running chromedriver.
    pub webdriver_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            verbose: false,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
        }
    }
}

/// A live browser session.
///
/// Derefs to [`thirtyfour::WebDriver`], so the full client API is
/// available directly. Call [`WebdriverSession::quit`] when done; the
/// underlying session is not closed on drop.
pub struct WebdriverSession {
    driver: WebDriver,
}

impl WebdriverSession {
    /// The underlying webdriver client.
    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Close the browser and end the session.
    pub async fn quit(self) -> Result<(), SessionError> {
        self.driver.quit().await?;
        Ok(())
    }
}

impl Deref for WebdriverSession {
    type Target = WebDriver;

    fn deref(&self) -> &Self::Target {
        &self.driver
    }
}

/// Open a browser session backed by the provisioned Chromium binary.
///
/// Provisions Chromium on first use (see [`crate::chromium`]), then
/// connects to the chromedriver at `config.webdriver_url`.
pub async fn open_webdriver(config: &SessionConfig) -> Result<WebdriverSession, SessionError> {
    let exe = acquire_chromium_exe().await?;
    let caps = build_capabilities(&exe, config)?;

    if config.verbose {
        debug!(binary = %exe.display(), url = config.webdriver_url, "connecting to chromedriver");
    }

    let driver = WebDriver::new(&config.webdriver_url, caps).await?;
    Ok(WebdriverSession { driver })
}

/// Build Chrome capabilities pointing at the provisioned binary.
fn build_capabilities(
    binary: &Path,
    config: &SessionConfig,
) -> Result<ChromeCapabilities, SessionError> {
    let mut caps = DesiredCapabilities::chrome();
    caps.set_binary(&binary.to_string_lossy())?;

    if config.headless {
        caps.add_arg("--headless=new")?;
        caps.add_arg("--disable-gpu")?;
    }
    caps.add_arg("--no-sandbox")?;
    caps.add_arg("--disable-dev-shm-usage")?;

    Ok(caps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use thirtyfour::common::capabilities::desiredcapabilities::Capabilities;

    #[test]
    fn default_config_targets_local_chromedriver() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert!(!config.verbose);
        assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
    }

    #[test]
    fn capabilities_carry_binary_and_headless_args() {
        let config = SessionConfig::default();
        let caps = build_capabilities(Path::new("/tmp/cache/linux/chrome"), &config).unwrap();

        let caps: Capabilities = caps.into();
        let json = serde_json::to_string(&caps).unwrap();
        assert!(json.contains("/tmp/cache/linux/chrome"));
        assert!(json.contains("--headless=new"));
    }

    #[test]
    fn headed_config_omits_headless_arg() {
        let config = SessionConfig {
            headless: false,
            ..SessionConfig::default()
        };
        let caps = build_capabilities(Path::new("/tmp/cache/linux/chrome"), &config).unwrap();

        let caps: Capabilities = caps.into();
        let json = serde_json::to_string(&caps).unwrap();
        assert!(!json.contains("--headless"));
    }
}
