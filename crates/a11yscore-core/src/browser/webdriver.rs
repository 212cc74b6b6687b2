use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thirtyfour::ChromiumLikeCapabilities;
use thirtyfour::error::WebDriverErrorInner;
use thirtyfour::prelude::*;
use tracing::{debug, info};

use crate::browser::driver::PageDriver;
use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A live browser session behind a W3C WebDriver server.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Start a Chrome session on the configured WebDriver server.
    pub async fn connect(config: &AuditConfig) -> AuditResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless()?;
        }
        caps.add_arg(&format!(
            "--window-size={},{}",
            config.window.width, config.window.height
        ))?;

        info!(server = %config.webdriver_url, headless = config.headless, "starting browser session");
        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;
        Ok(Self { driver })
    }
}

/// Only an expired wait is a timeout; anything else is a driver failure.
fn wait_error(err: WebDriverError, timeout: Duration) -> AuditError {
    if matches!(err.as_inner(), WebDriverErrorInner::Timeout(_)) {
        AuditError::Timeout(timeout)
    } else {
        err.into()
    }
}

#[async_trait]
impl PageDriver for WebDriverSession {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> AuditResult<()> {
        info!(%url, "loading page");
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> AuditResult<Value> {
        let ret = self.driver.execute(script, args).await?;
        Ok(ret.json().clone())
    }

    async fn execute_async(&self, script: &str, args: Vec<Value>) -> AuditResult<Value> {
        let ret = self.driver.execute_async(script, args).await?;
        Ok(ret.json().clone())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> AuditResult<()> {
        debug!(width, height, "resizing window");
        self.driver.set_window_rect(0, 0, width, height).await?;
        Ok(())
    }

    async fn screenshot_png(&self) -> AuditResult<Vec<u8>> {
        Ok(self.driver.screenshot_as_png().await?)
    }

    async fn find_all(&self, css: &str) -> AuditResult<Vec<WebElement>> {
        Ok(self.driver.find_all(By::Css(css)).await?)
    }

    async fn find_all_in(&self, parent: &WebElement, css: &str) -> AuditResult<Vec<WebElement>> {
        Ok(parent.find_all(By::Css(css)).await?)
    }

    async fn is_displayed(&self, element: &WebElement) -> AuditResult<bool> {
        Ok(element.is_displayed().await?)
    }

    async fn attribute(&self, element: &WebElement, name: &str) -> AuditResult<Option<String>> {
        Ok(element.attr(name).await?)
    }

    async fn wait_displayed(&self, element: &WebElement, timeout: Duration) -> AuditResult<()> {
        element
            .wait_until()
            .wait(timeout, WAIT_POLL_INTERVAL)
            .displayed()
            .await
            .map_err(|e| wait_error(e, timeout))
    }

    async fn send_tab(&self, element: &WebElement) -> AuditResult<()> {
        element.send_keys(Key::Tab + "").await?;
        Ok(())
    }

    async fn is_active(&self, element: &WebElement) -> AuditResult<bool> {
        let active = self.driver.active_element().await?;
        Ok(active.element_id() == element.element_id())
    }

    async fn quit(self) -> AuditResult<()> {
        debug!("closing browser session");
        self.driver.quit().await?;
        Ok(())
    }
}
