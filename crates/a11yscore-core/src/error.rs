use std::time::Duration;

/// Failures raised while driving the browser or decoding audit output.
///
/// Heuristic checks catch these and downgrade them to report warnings;
/// session, navigation and audit-engine failures abort the run.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("webdriver error: {0}")]
    Driver(String),

    #[error("timed out after {0:?} waiting for element to become visible")]
    Timeout(Duration),

    #[error("axe-core is not available in the page: {0}")]
    AxeUnavailable(String),

    #[error("axe-core run failed: {0}")]
    Axe(String),

    #[error("malformed axe-core results: {0}")]
    MalformedResults(#[from] serde_json::Error),

    #[error("failed to decode screenshot: {0}")]
    Screenshot(#[from] image::ImageError),

    #[error("unexpected script result for `{script}`: {value}")]
    ScriptResult {
        script: &'static str,
        value: serde_json::Value,
    },
}

impl From<thirtyfour::error::WebDriverError> for AuditError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        AuditError::Driver(err.to_string())
    }
}

pub type AuditResult<T> = std::result::Result<T, AuditError>;
