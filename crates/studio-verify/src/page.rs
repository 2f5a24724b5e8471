// Page capabilities used by the verification runner
//
// The runner talks to the browser through the VerifyPage trait so the same
// flow can drive a real Playwright page or a scripted page in tests.

use crate::error::{Error, Result};
use crate::target::Target;
use async_trait::async_trait;
use playwright_rs::{ClickOptions, Page, ScreenshotOptions, expect};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// How a click is performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickMode {
    /// Skip actionability checks (visible, stable, receives events)
    pub force: bool,
    /// Maximum time to wait for the element; library default when `None`
    pub timeout: Option<Duration>,
}

impl ClickMode {
    /// Click without actionability checks
    pub fn forced() -> Self {
        Self {
            force: true,
            timeout: None,
        }
    }

    /// Normal click that gives up after `timeout`
    pub fn within(timeout: Duration) -> Self {
        Self {
            force: false,
            timeout: Some(timeout),
        }
    }

    fn to_options(self) -> ClickOptions {
        let mut builder = ClickOptions::builder().force(self.force);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout.as_millis() as f64);
        }
        builder.build()
    }
}

/// The capability set the runner needs from a browser page
#[async_trait]
pub trait VerifyPage: Send + Sync {
    /// Registers a script that runs before any page script on every navigation.
    async fn add_init_script(&self, script: &str) -> Result<()>;

    /// Navigates to `url` and waits for the load event.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Clicks the element matching `target`.
    async fn click(&self, target: &Target, mode: ClickMode) -> Result<()>;

    /// Waits until `target` is visible, failing with [`Error::NotVisible`]
    /// once `timeout` elapses.
    async fn expect_visible(&self, target: &Target, timeout: Duration) -> Result<()>;

    /// Captures a full-page PNG to `path`, returning the number of bytes written.
    async fn screenshot(&self, path: &Path) -> Result<usize>;
}

#[async_trait]
impl VerifyPage for Page {
    async fn add_init_script(&self, script: &str) -> Result<()> {
        debug!("Registering init script ({} bytes)", script.len());
        Page::add_init_script(self, script).await?;
        Ok(())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        let response = Page::goto(self, url, None).await?;
        if let Some(response) = response {
            debug!("Navigated to {} (status {})", response.url(), response.status());
        }
        Ok(())
    }

    async fn click(&self, target: &Target, mode: ClickMode) -> Result<()> {
        let selector = target.selector();
        debug!("Clicking {} (force: {})", selector, mode.force);
        let locator = self.locator(&selector).await;
        locator.click(Some(mode.to_options())).await?;
        Ok(())
    }

    async fn expect_visible(&self, target: &Target, timeout: Duration) -> Result<()> {
        let locator = self.locator(&target.selector()).await;
        expect(locator)
            .with_timeout(timeout)
            .to_be_visible()
            .await
            .map_err(|e| match e {
                playwright_rs::Error::AssertionTimeout(_) => Error::NotVisible {
                    target: target.to_string(),
                    timeout,
                },
                other => Error::Playwright(other),
            })
    }

    async fn screenshot(&self, path: &Path) -> Result<usize> {
        let options = ScreenshotOptions::builder().full_page(true).build();
        let bytes = self.screenshot_to_file(path, Some(options)).await?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_click_mode() {
        let mode = ClickMode::forced();
        assert!(mode.force);
        assert!(mode.timeout.is_none());

        let options = mode.to_options();
        assert_eq!(options.force, Some(true));
        assert_eq!(options.timeout, None);
    }

    #[test]
    fn test_click_within_timeout() {
        let mode = ClickMode::within(Duration::from_millis(3000));
        assert!(!mode.force);

        let options = mode.to_options();
        assert_eq!(options.force, Some(false));
        assert_eq!(options.timeout, Some(3000.0));
    }
}
