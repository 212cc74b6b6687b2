//! Audit pipeline.
//!
//! load page → axe-core → layout, contrast, image and popup checks →
//! score → report.
//!
//! Loading the page and running axe-core are required; any failure there
//! aborts the audit. The heuristic checks are best-effort: a failing check
//! leaves its slot empty and adds a warning to the report.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::browser::axe::{self, AxeResults};
use crate::browser::driver::PageDriver;
use crate::browser::webdriver::WebDriverSession;
use crate::checks::contrast::check_contrast;
use crate::checks::image_alt::check_image_alt;
use crate::checks::model::{HeuristicChecks, PopupCheck};
use crate::checks::popup::{find_popup, is_popup_keyboard_accessible};
use crate::checks::responsive::check_scalability;
use crate::config::AuditConfig;
use crate::error::AuditResult;
use crate::report::model::{AnalysisInfo, PageInfo, Report, ToolInfo};
use crate::rules::score::score;

/// Audit `url` in a new WebDriver session.
pub async fn audit(url: &str, config: &AuditConfig, tool: ToolInfo) -> Result<Report> {
    let session = WebDriverSession::connect(config)
        .await
        .with_context(|| format!("failed to start browser session at {}", config.webdriver_url))?;
    audit_with(session, url, config, tool).await
}

/// Audit `url` using an existing driver. The driver is quit before returning,
/// whether or not the audit succeeded.
pub async fn audit_with<D: PageDriver>(
    driver: D,
    url: &str,
    config: &AuditConfig,
    tool: ToolInfo,
) -> Result<Report> {
    let outcome = inspect_page(&driver, url, config).await;

    if let Err(e) = driver.quit().await {
        warn!(error = %e, "failed to close browser session");
    }

    let (results, checks, analysis) = outcome?;

    let violations = results.violations();
    let scoring = score(
        &violations,
        &config.weights,
        &config.single_error_criteria,
        config.min_score,
    );
    info!(score = scoring.final_score, "accessibility score computed");

    let page = PageInfo {
        url: url.to_string(),
        audited_url: results.url,
        engine: results.test_engine,
        timestamp: results.timestamp,
    };

    Ok(Report::new(tool, page, &violations, scoring, checks, analysis))
}

async fn inspect_page<D: PageDriver>(
    driver: &D,
    url: &str,
    config: &AuditConfig,
) -> Result<(AxeResults, HeuristicChecks, AnalysisInfo)> {
    driver
        .goto(url)
        .await
        .with_context(|| format!("failed to load {url}"))?;

    axe::inject(driver, &config.axe_source)
        .await
        .context("failed to inject axe-core")?;
    let results = axe::run(driver, &config.axe_options)
        .await
        .context("accessibility audit failed")?;

    settle(config.settle_after_load()).await;

    let mut analysis = AnalysisInfo::ok();
    let mut checks = HeuristicChecks::default();

    checks.responsive = caught(
        "responsive",
        check_scalability(driver, &config.viewports, config.window).await,
        &mut analysis,
    );

    settle(config.settle_after_resize()).await;

    checks.contrast = caught("contrast", check_contrast(driver).await, &mut analysis);
    checks.image_alt = caught("image alt", check_image_alt(driver).await, &mut analysis);
    checks.popup = caught("popup", check_popup(driver, config).await, &mut analysis);

    Ok((results, checks, analysis))
}

async fn check_popup<D: PageDriver>(driver: &D, config: &AuditConfig) -> AuditResult<PopupCheck> {
    let popup = find_popup(driver, &config.popup_selectors).await?;
    is_popup_keyboard_accessible(
        driver,
        popup.as_ref(),
        &config.focusable_selector,
        config.popup_wait(),
    )
    .await
}

fn caught<T>(check: &str, result: AuditResult<T>, analysis: &mut AnalysisInfo) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(check, error = %e, "check failed");
            analysis.warn(format!("{check} check failed: {e}"));
            None
        }
    }
}

async fn settle(pause: Duration) {
    if pause.is_zero() {
        return;
    }
    debug!(?pause, "waiting for page to settle");
    tokio::time::sleep(pause).await;
}
