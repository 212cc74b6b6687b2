//! axe-core injection and invocation.
//!
//! axe-core runs inside the page. We only load it, call `axe.run`, and
//! decode the violation list it hands back; the rules themselves live
//! entirely in axe-core.

use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::browser::driver::PageDriver;
use crate::config::AxeSource;
use crate::error::{AuditError, AuditResult};
use crate::rules::catalog::Impact;
use crate::rules::eval::Violation;

pub(crate) const AXE_PRESENT_SCRIPT: &str = "return typeof window.axe !== 'undefined';";

pub(crate) const AXE_LOAD_URL_SCRIPT: &str = r#"
const src = arguments[0];
const done = arguments[arguments.length - 1];
const el = document.createElement('script');
el.src = src;
el.onload = () => done({ ok: true });
el.onerror = () => done({ error: 'failed to load ' + src });
(document.head || document.documentElement).appendChild(el);
"#;

pub(crate) const AXE_RUN_SCRIPT: &str = r#"
const options = arguments[0];
const done = arguments[arguments.length - 1];
axe.run(document, options)
  .then(r => done({ ok: {
    testEngine: r.testEngine,
    url: r.url,
    timestamp: r.timestamp,
    violations: r.violations
  } }))
  .catch(e => done({ error: String(e) }));
"#;

/// Name and version of the rule engine that produced the results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEngine {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// The subset of an `axe.run` result we consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxeResults {
    #[serde(rename = "testEngine", default)]
    pub test_engine: TestEngine,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub violations: Vec<AxeViolation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxeViolation {
    pub id: String,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(rename = "helpUrl", default)]
    pub help_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Failing nodes; only the count is used.
    #[serde(default)]
    pub nodes: Vec<Value>,
}

impl From<&AxeViolation> for Violation {
    fn from(v: &AxeViolation) -> Self {
        Violation {
            id: v.id.clone(),
            description: v.description.clone(),
            impact: v.impact.clone(),
            help: v.help.clone(),
            help_url: v.help_url.clone(),
            nodes_count: v.nodes.len() as u64,
        }
    }
}

impl AxeResults {
    pub fn violations(&self) -> Vec<Violation> {
        self.violations.iter().map(Violation::from).collect()
    }
}

/// Callback payload shared by the async scripts above.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Outcome<T> {
    Ok(T),
    Error(String),
}

/// Make `window.axe` available in the current page.
///
/// A page that already ships axe-core is left untouched.
pub async fn inject<D: PageDriver>(driver: &D, source: &AxeSource) -> AuditResult<()> {
    if axe_present(driver).await? {
        debug!("axe-core already present in page");
        return Ok(());
    }

    match source {
        AxeSource::Url(url) => {
            debug!(%url, "loading axe-core from url");
            let value = driver
                .execute_async(AXE_LOAD_URL_SCRIPT, vec![json!(url)])
                .await?;
            if let Outcome::Error(msg) = serde_json::from_value::<Outcome<bool>>(value)? {
                return Err(AuditError::AxeUnavailable(msg));
            }
        }
        AxeSource::File(path) => {
            debug!(path = %path.display(), "evaluating local axe-core build");
            let source = fs::read_to_string(path).map_err(|e| {
                AuditError::AxeUnavailable(format!("cannot read {}: {e}", path.display()))
            })?;
            driver.execute(&source, Vec::new()).await?;
        }
    }

    if !axe_present(driver).await? {
        return Err(AuditError::AxeUnavailable(
            "script loaded but window.axe is undefined".into(),
        ));
    }
    Ok(())
}

async fn axe_present<D: PageDriver>(driver: &D) -> AuditResult<bool> {
    match driver.execute(AXE_PRESENT_SCRIPT, Vec::new()).await? {
        Value::Bool(present) => Ok(present),
        other => Err(AuditError::ScriptResult {
            script: "axe presence probe",
            value: other,
        }),
    }
}

/// Run axe-core against the whole document.
pub async fn run<D: PageDriver>(driver: &D, options: &Value) -> AuditResult<AxeResults> {
    let value = driver
        .execute_async(AXE_RUN_SCRIPT, vec![options.clone()])
        .await?;

    match serde_json::from_value::<Outcome<AxeResults>>(value)? {
        Outcome::Ok(results) => {
            info!(
                engine = %results.test_engine.name,
                version = %results.test_engine.version,
                violations = results.violations.len(),
                "accessibility audit finished"
            );
            Ok(results)
        }
        Outcome::Error(msg) => Err(AuditError::Axe(msg)),
    }
}
