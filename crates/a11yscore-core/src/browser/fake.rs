//! In-memory page used to exercise the audit without a browser.
//!
//! The fake understands exactly the scripts this crate sends. Elements are
//! matched by the literal selector they were registered under; a popup's
//! children are returned for any selector queried inside it.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::browser::axe::{AXE_LOAD_URL_SCRIPT, AXE_PRESENT_SCRIPT, AXE_RUN_SCRIPT};
use crate::browser::driver::PageDriver;
use crate::checks::responsive::{INNER_WIDTH_SCRIPT, SCROLL_WIDTH_SCRIPT, VIEWPORT_META_SCRIPT};
use crate::config::Viewport;
use crate::error::{AuditError, AuditResult};

/// Encode an RGB image as PNG bytes.
pub fn png_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| image::Rgb(f(x, y)));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("in-memory PNG encoding");
    out.into_inner()
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    selector: String,
    displayed: bool,
    attrs: HashMap<String, String>,
    tab_escapes: bool,
    stale: bool,
    children: Vec<usize>,
}

impl FakeElement {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            displayed: true,
            attrs: HashMap::new(),
            tab_escapes: false,
            stale: false,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// TAB on this element moves focus away from it.
    pub fn tab_escapes(mut self) -> Self {
        self.tab_escapes = true;
        self
    }

    /// Waiting on this element fails as if it had been detached.
    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }
}

#[derive(Debug)]
struct State {
    window: Viewport,
    axe_loaded: bool,
    active: Option<usize>,
    script_log: Vec<String>,
    scroll_width_reads: usize,
    quit: bool,
}

/// Clones share page state, so a test can keep one clone to inspect the
/// page after handing another to the audit.
#[derive(Debug, Clone)]
pub struct FakePage {
    elements: Vec<FakeElement>,
    top_level: Vec<usize>,
    content_width: u64,
    fractional_widths: bool,
    viewport_meta: Option<String>,
    axe_results: Value,
    axe_run_error: Option<String>,
    axe_load_fails: bool,
    screenshot: Vec<u8>,
    failing_selectors: HashSet<String>,
    failing_scroll_width_read: Option<usize>,
    fail_navigation: bool,
    state: Arc<Mutex<State>>,
}

pub struct FakePageBuilder {
    page: FakePage,
    window: Viewport,
    axe_preloaded: bool,
}

impl FakePage {
    pub fn builder() -> FakePageBuilder {
        FakePageBuilder {
            page: FakePage {
                elements: Vec::new(),
                top_level: Vec::new(),
                content_width: 0,
                fractional_widths: false,
                viewport_meta: None,
                axe_results: json!({ "violations": [] }),
                axe_run_error: None,
                axe_load_fails: false,
                screenshot: png_from_fn(4, 4, |_, _| [255, 255, 255]),
                failing_selectors: HashSet::new(),
                failing_scroll_width_read: None,
                fail_navigation: false,
                state: Arc::new(Mutex::new(State {
                    window: Viewport::new(1920, 1080),
                    axe_loaded: false,
                    active: None,
                    script_log: Vec::new(),
                    scroll_width_reads: 0,
                    quit: false,
                })),
            },
            window: Viewport::new(1920, 1080),
            axe_preloaded: false,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn window(&self) -> Viewport {
        self.state().window
    }

    pub fn axe_loaded(&self) -> bool {
        self.state().axe_loaded
    }

    pub fn script_log(&self) -> Vec<String> {
        self.state().script_log.clone()
    }

    pub fn was_quit(&self) -> bool {
        self.state().quit
    }

    fn check_selector(&self, css: &str) -> AuditResult<()> {
        if self.failing_selectors.contains(css) {
            return Err(AuditError::Driver(format!("no such element: {css}")));
        }
        Ok(())
    }

    fn width(&self, px: u64) -> Value {
        if self.fractional_widths {
            json!(px as f64 + 0.4)
        } else {
            json!(px)
        }
    }
}

impl FakePageBuilder {
    pub fn window(mut self, window: Viewport) -> Self {
        self.window = window;
        self
    }

    /// Minimum layout width of the document body.
    pub fn content_width(mut self, px: u64) -> Self {
        self.page.content_width = px;
        self
    }

    pub fn fractional_widths(mut self) -> Self {
        self.page.fractional_widths = true;
        self
    }

    pub fn viewport_meta(mut self, content: &str) -> Self {
        self.page.viewport_meta = Some(content.to_string());
        self
    }

    /// Value handed to the `axe.run` callback as the result object.
    pub fn axe_results(mut self, results: Value) -> Self {
        self.page.axe_results = results;
        self
    }

    pub fn axe_run_error(mut self, msg: &str) -> Self {
        self.page.axe_run_error = Some(msg.to_string());
        self
    }

    pub fn axe_load_fails(mut self) -> Self {
        self.page.axe_load_fails = true;
        self
    }

    pub fn axe_preloaded(mut self) -> Self {
        self.axe_preloaded = true;
        self
    }

    pub fn screenshot(mut self, png: Vec<u8>) -> Self {
        self.page.screenshot = png;
        self
    }

    pub fn element(mut self, element: FakeElement) -> Self {
        self.page.top_level.push(self.page.elements.len());
        self.page.elements.push(element);
        self
    }

    pub fn popup(mut self, mut popup: FakeElement, children: Vec<FakeElement>) -> Self {
        for child in children {
            popup.children.push(self.page.elements.len());
            self.page.elements.push(child);
        }
        self.element(popup)
    }

    /// Lookups for `css` fail with a driver error.
    pub fn fail_selector(mut self, css: &str) -> Self {
        self.page.failing_selectors.insert(css.to_string());
        self
    }

    /// The `n`th read of `document.body.scrollWidth` (1-based) fails.
    pub fn fail_scroll_width_read(mut self, n: usize) -> Self {
        self.page.failing_scroll_width_read = Some(n);
        self
    }

    pub fn fail_navigation(mut self) -> Self {
        self.page.fail_navigation = true;
        self
    }

    pub fn build(self) -> FakePage {
        {
            let mut state = self.page.state();
            state.window = self.window;
            state.axe_loaded = self.axe_preloaded;
        }
        self.page
    }
}

#[async_trait]
impl PageDriver for FakePage {
    type Element = usize;

    async fn goto(&self, url: &str) -> AuditResult<()> {
        if self.fail_navigation {
            return Err(AuditError::Driver(format!("unknown error: net::ERR_NAME_NOT_RESOLVED at {url}")));
        }
        Ok(())
    }

    async fn execute(&self, script: &str, _args: Vec<Value>) -> AuditResult<Value> {
        let mut state = self.state();
        state.script_log.push(script.to_string());

        let value = match script {
            AXE_PRESENT_SCRIPT => json!(state.axe_loaded),
            VIEWPORT_META_SCRIPT => json!(self.viewport_meta),
            INNER_WIDTH_SCRIPT => self.width(state.window.width as u64),
            SCROLL_WIDTH_SCRIPT => {
                state.scroll_width_reads += 1;
                if self.failing_scroll_width_read == Some(state.scroll_width_reads) {
                    return Err(AuditError::Driver("javascript error: document.body is null".into()));
                }
                self.width(self.content_width.max(state.window.width as u64))
            }
            other => {
                if other.contains("window.axe =") {
                    state.axe_loaded = true;
                }
                Value::Null
            }
        };
        Ok(value)
    }

    async fn execute_async(&self, script: &str, _args: Vec<Value>) -> AuditResult<Value> {
        let mut state = self.state();
        state.script_log.push(script.to_string());

        let value = match script {
            AXE_LOAD_URL_SCRIPT if self.axe_load_fails => {
                json!({ "error": "failed to load axe" })
            }
            AXE_LOAD_URL_SCRIPT => {
                state.axe_loaded = true;
                json!({ "ok": true })
            }
            AXE_RUN_SCRIPT if !state.axe_loaded => {
                json!({ "error": "ReferenceError: axe is not defined" })
            }
            AXE_RUN_SCRIPT => match &self.axe_run_error {
                Some(msg) => json!({ "error": msg }),
                None => json!({ "ok": self.axe_results }),
            },
            _ => Value::Null,
        };
        Ok(value)
    }

    async fn set_window_size(&self, width: u32, height: u32) -> AuditResult<()> {
        self.state().window = Viewport::new(width, height);
        Ok(())
    }

    async fn screenshot_png(&self) -> AuditResult<Vec<u8>> {
        Ok(self.screenshot.clone())
    }

    async fn find_all(&self, css: &str) -> AuditResult<Vec<usize>> {
        self.check_selector(css)?;
        Ok(self
            .top_level
            .iter()
            .copied()
            .filter(|&i| self.elements[i].selector == css)
            .collect())
    }

    async fn find_all_in(&self, parent: &usize, css: &str) -> AuditResult<Vec<usize>> {
        self.check_selector(css)?;
        Ok(self.elements[*parent].children.clone())
    }

    async fn is_displayed(&self, element: &usize) -> AuditResult<bool> {
        Ok(self.elements[*element].displayed)
    }

    async fn attribute(&self, element: &usize, name: &str) -> AuditResult<Option<String>> {
        Ok(self.elements[*element].attrs.get(name).cloned())
    }

    async fn wait_displayed(&self, element: &usize, timeout: Duration) -> AuditResult<()> {
        if self.elements[*element].stale {
            return Err(AuditError::Driver("stale element reference".into()));
        }
        if self.elements[*element].displayed {
            Ok(())
        } else {
            Err(AuditError::Timeout(timeout))
        }
    }

    async fn send_tab(&self, element: &usize) -> AuditResult<()> {
        let mut state = self.state();
        state.active = if self.elements[*element].tab_escapes {
            None
        } else {
            Some(*element)
        };
        Ok(())
    }

    async fn is_active(&self, element: &usize) -> AuditResult<bool> {
        Ok(self.state().active == Some(*element))
    }

    async fn quit(self) -> AuditResult<()> {
        self.state().quit = true;
        Ok(())
    }
}
