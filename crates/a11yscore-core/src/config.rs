//! Audit configuration.
//!
//! Every field carries a default, so an empty JSON object (or no file at all)
//! yields the stock audit. Files are plain JSON and may set any subset of
//! fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rules::catalog::{
    DEFAULT_IMPORTANT_CRITERIA, DEFAULT_SINGLE_ERROR_CRITERIA, ImpactWeights,
};

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_AXE_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/axe-core/4.10.2/axe.min.js";
pub const DEFAULT_OUTPUT_PATH: &str = "accessibility_results.json";

pub const DEFAULT_POPUP_SELECTORS: &[&str] = &[
    "[role='dialog']",
    ".modal",
    ".popup",
    "#cookie-banner",
    "#cookieWarning",
    "#cookieHolder",
    ".cookie-banner",
    ".cookie-popup",
    ".cookie-consent",
    "[aria-label='cookie consent']",
    "[id*='cookie']",
    "[class*='cookie']",
];

pub const DEFAULT_FOCUSABLE_SELECTOR: &str = "a, button, input, select, textarea, [tabindex]";

/// A browser window size in CSS pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub fn default_viewports() -> Vec<Viewport> {
    vec![
        Viewport::new(320, 480),
        Viewport::new(768, 1024),
        Viewport::new(1024, 768),
        Viewport::new(1920, 1080),
    ]
}

/// Where axe-core comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AxeSource {
    /// Loaded by the page through a `<script src>` element.
    Url(String),
    /// Local `axe.min.js`, evaluated in the page.
    File(PathBuf),
}

impl Default for AxeSource {
    fn default() -> Self {
        AxeSource::Url(DEFAULT_AXE_URL.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window: Viewport,

    /// Pause after the audit engine finishes, before the layout checks.
    pub settle_after_load_ms: u64,
    /// Pause after the viewport sweep, before the screenshot.
    pub settle_after_resize_ms: u64,

    pub viewports: Vec<Viewport>,
    pub popup_selectors: Vec<String>,
    pub focusable_selector: String,
    pub popup_wait_ms: u64,

    pub axe_source: AxeSource,
    /// Passed verbatim as the second argument of `axe.run`.
    pub axe_options: serde_json::Value,

    pub weights: ImpactWeights,
    pub single_error_criteria: Vec<String>,
    pub important_criteria: Vec<String>,

    pub output_path: PathBuf,
    pub min_score: Option<f64>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            window: Viewport::new(1920, 1080),
            settle_after_load_ms: 5_000,
            settle_after_resize_ms: 10_000,
            viewports: default_viewports(),
            popup_selectors: DEFAULT_POPUP_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            focusable_selector: DEFAULT_FOCUSABLE_SELECTOR.to_string(),
            popup_wait_ms: 10_000,
            axe_source: AxeSource::default(),
            axe_options: serde_json::Value::Object(Default::default()),
            weights: ImpactWeights::default(),
            single_error_criteria: DEFAULT_SINGLE_ERROR_CRITERIA
                .iter()
                .map(|s| s.to_string())
                .collect(),
            important_criteria: DEFAULT_IMPORTANT_CRITERIA
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            min_score: None,
        }
    }
}

impl AuditConfig {
    pub fn settle_after_load(&self) -> Duration {
        Duration::from_millis(self.settle_after_load_ms)
    }

    pub fn settle_after_resize(&self) -> Duration {
        Duration::from_millis(self.settle_after_resize_ms)
    }

    pub fn popup_wait(&self) -> Duration {
        Duration::from_millis(self.popup_wait_ms)
    }

    /// Drop both settle pauses. Used for fast local runs and tests.
    pub fn without_settle(mut self) -> Self {
        self.settle_after_load_ms = 0;
        self.settle_after_resize_ms = 0;
        self
    }

    /// Reject values that would make the audit meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.viewports.is_empty() {
            anyhow::bail!("config must list at least one viewport");
        }
        if let Some(v) = self.viewports.iter().find(|v| v.width == 0 || v.height == 0) {
            anyhow::bail!("viewport {}x{} has a zero dimension", v.width, v.height);
        }
        if self.popup_selectors.is_empty() {
            anyhow::bail!("config must list at least one popup selector");
        }
        if let Some(min) = self.min_score {
            if !(0.0..=100.0).contains(&min) {
                anyhow::bail!("min_score must be within 0..=100, got {min}");
            }
        }
        self.weights.validate()?;
        Ok(())
    }
}

/// Load a config file. A missing `path` yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AuditConfig> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str::<AuditConfig>(&content)
                .with_context(|| format!("Invalid JSON in config: {}", path.display()))?
        }
        None => AuditConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn defaults_match_stock_audit() {
        let config = AuditConfig::default();

        assert_eq!(config.viewports.len(), 4);
        assert_eq!(config.viewports[0], Viewport::new(320, 480));
        assert_eq!(config.popup_selectors.len(), 12);
        assert_eq!(config.popup_selectors[0], "[role='dialog']");
        assert_eq!(config.popup_selectors[11], "[class*='cookie']");
        assert_eq!(config.settle_after_load(), Duration::from_secs(5));
        assert_eq!(config.settle_after_resize(), Duration::from_secs(10));
        assert_eq!(config.popup_wait(), Duration::from_secs(10));
        assert_eq!(config.output_path, PathBuf::from("accessibility_results.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(r#"{ "headless": false, "min_score": 80 }"#);
        let config = load_config(Some(file.path())).unwrap();

        assert!(!config.headless);
        assert_eq!(config.min_score, Some(80.0));
        assert_eq!(config.viewports, default_viewports());
    }

    #[test]
    fn axe_source_file_variant_parses() {
        let file = write_config(r#"{ "axe_source": { "file": "vendor/axe.min.js" } }"#);
        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(
            config.axe_source,
            AxeSource::File(PathBuf::from("vendor/axe.min.js"))
        );
    }

    #[test]
    fn invalid_json_is_reported_with_path() {
        let file = write_config("{ not json");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON in config"));
    }

    #[test]
    fn empty_viewports_rejected() {
        let file = write_config(r#"{ "viewports": [] }"#);
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn out_of_range_min_score_rejected() {
        let config = AuditConfig {
            min_score: Some(120.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn without_settle_zeroes_pauses() {
        let config = AuditConfig::default().without_settle();
        assert_eq!(config.settle_after_load(), Duration::ZERO);
        assert_eq!(config.settle_after_resize(), Duration::ZERO);
    }
}
