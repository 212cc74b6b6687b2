use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AuditResult;

/// The browser operations the audit needs.
///
/// Implemented by [`WebDriverSession`](crate::browser::webdriver::WebDriverSession)
/// for real runs. Checks are written against this trait only.
#[async_trait]
pub trait PageDriver: Send + Sync + Sized {
    /// Handle to an element in the current document.
    type Element: Clone + Send + Sync;

    async fn goto(&self, url: &str) -> AuditResult<()>;

    /// Run synchronous JavaScript and return its value.
    async fn execute(&self, script: &str, args: Vec<Value>) -> AuditResult<Value>;

    /// Run callback-style JavaScript; the last argument passed to the script
    /// is the completion callback.
    async fn execute_async(&self, script: &str, args: Vec<Value>) -> AuditResult<Value>;

    async fn set_window_size(&self, width: u32, height: u32) -> AuditResult<()>;

    async fn screenshot_png(&self) -> AuditResult<Vec<u8>>;

    async fn find_all(&self, css: &str) -> AuditResult<Vec<Self::Element>>;

    async fn find_all_in(&self, parent: &Self::Element, css: &str)
    -> AuditResult<Vec<Self::Element>>;

    async fn is_displayed(&self, element: &Self::Element) -> AuditResult<bool>;

    async fn attribute(&self, element: &Self::Element, name: &str) -> AuditResult<Option<String>>;

    /// Wait for `element` to become visible; `AuditError::Timeout` otherwise.
    async fn wait_displayed(&self, element: &Self::Element, timeout: Duration) -> AuditResult<()>;

    async fn send_tab(&self, element: &Self::Element) -> AuditResult<()>;

    /// Whether `element` currently holds keyboard focus.
    async fn is_active(&self, element: &Self::Element) -> AuditResult<bool>;

    async fn quit(self) -> AuditResult<()>;
}
