use serde_json::Value;
use tracing::{debug, info};

use crate::browser::driver::PageDriver;
use crate::checks::model::{ResponsiveCheck, WidthSample};
use crate::config::Viewport;
use crate::error::{AuditError, AuditResult};

pub(crate) const VIEWPORT_META_SCRIPT: &str = "const m = document.querySelector('meta[name=\"viewport\"]'); return m ? m.getAttribute('content') : null;";
pub(crate) const INNER_WIDTH_SCRIPT: &str = "return window.innerWidth;";
pub(crate) const SCROLL_WIDTH_SCRIPT: &str = "return document.body.scrollWidth;";

/// Compare document width against window width at the current size.
pub async fn check_page_width<D: PageDriver>(driver: &D, window: Viewport) -> AuditResult<WidthSample> {
    let inner_width = read_width(driver, INNER_WIDTH_SCRIPT, "window.innerWidth").await?;
    let scroll_width = read_width(driver, SCROLL_WIDTH_SCRIPT, "document.body.scrollWidth").await?;

    let sample = WidthSample {
        window_width: window.width,
        window_height: window.height,
        inner_width,
        scroll_width,
        horizontal_scroll: scroll_width > inner_width,
    };
    debug!(?sample, "page width sampled");
    Ok(sample)
}

/// Resize through `viewports` and record horizontal overflow at each size.
///
/// The window is put back to `restore` afterwards, including when a
/// measurement fails midway.
pub async fn check_scalability<D: PageDriver>(
    driver: &D,
    viewports: &[Viewport],
    restore: Viewport,
) -> AuditResult<ResponsiveCheck> {
    let viewport_meta = match driver.execute(VIEWPORT_META_SCRIPT, Vec::new()).await? {
        Value::String(content) => Some(content),
        _ => None,
    };

    let baseline = check_page_width(driver, restore).await?;

    let swept = sweep(driver, viewports).await;
    driver.set_window_size(restore.width, restore.height).await?;
    let samples = swept?;

    let overflow_count = samples.iter().filter(|s| s.horizontal_scroll).count() as u32;
    let passes = overflow_count == 0;

    if passes {
        info!("page scales without horizontal scrolling");
    } else {
        info!(overflow_count, "horizontal scrolling appeared when resizing");
    }

    Ok(ResponsiveCheck {
        viewport_meta,
        baseline,
        samples,
        overflow_count,
        passes,
    })
}

async fn sweep<D: PageDriver>(driver: &D, viewports: &[Viewport]) -> AuditResult<Vec<WidthSample>> {
    let mut samples = Vec::with_capacity(viewports.len());
    for vp in viewports {
        driver.set_window_size(vp.width, vp.height).await?;
        samples.push(check_page_width(driver, *vp).await?);
    }
    Ok(samples)
}

async fn read_width<D: PageDriver>(
    driver: &D,
    script: &'static str,
    what: &'static str,
) -> AuditResult<u64> {
    let value = driver.execute(script, Vec::new()).await?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
        .ok_or(AuditError::ScriptResult {
            script: what,
            value,
        })
}
