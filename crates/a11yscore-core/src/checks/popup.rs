//! Popup detection and keyboard navigability.
//!
//! Cookie banners and modal dialogs are the usual way a page traps keyboard
//! users. We find the first visible candidate and walk its focusable
//! children with TAB, requiring each to hold focus.

use std::time::Duration;

use tracing::{debug, info};

use crate::browser::driver::PageDriver;
use crate::checks::model::{PopupCheck, PopupOutcome};
use crate::error::{AuditError, AuditResult};

/// A displayed popup and the selector that located it.
#[derive(Debug, Clone)]
pub struct Popup<E> {
    pub selector: String,
    pub element: E,
}

/// Return the first displayed element matched by `selectors`, tried in order.
pub async fn find_popup<D: PageDriver>(
    driver: &D,
    selectors: &[String],
) -> AuditResult<Option<Popup<D::Element>>> {
    for selector in selectors {
        for element in driver.find_all(selector).await? {
            if driver.is_displayed(&element).await? {
                debug!(%selector, "popup candidate is displayed");
                return Ok(Some(Popup {
                    selector: selector.clone(),
                    element,
                }));
            }
        }
    }
    Ok(None)
}

/// Tab through the popup's focusable elements.
pub async fn is_popup_keyboard_accessible<D: PageDriver>(
    driver: &D,
    popup: Option<&Popup<D::Element>>,
    focusable_selector: &str,
    wait: Duration,
) -> AuditResult<PopupCheck> {
    let Some(popup) = popup else {
        info!("no popup found");
        return Ok(PopupCheck::not_found());
    };

    let focusables = driver.find_all_in(&popup.element, focusable_selector).await?;
    let outcome = match walk_focus(driver, &focusables, wait).await {
        Ok(outcome) => outcome,
        Err(AuditError::Timeout(_)) => {
            info!("popup element did not become interactable");
            PopupOutcome::Timeout
        }
        Err(e) => return Err(e),
    };

    let keyboard_accessible = outcome == PopupOutcome::Accessible;
    if keyboard_accessible {
        info!(selector = %popup.selector, "popup is keyboard accessible");
    } else {
        info!(selector = %popup.selector, ?outcome, "popup is not keyboard accessible");
    }

    Ok(PopupCheck {
        selector: Some(popup.selector.clone()),
        focusable_count: focusables.len(),
        keyboard_accessible,
        outcome,
    })
}

async fn walk_focus<D: PageDriver>(
    driver: &D,
    focusables: &[D::Element],
    wait: Duration,
) -> AuditResult<PopupOutcome> {
    let Some(first) = focusables.first() else {
        return Ok(PopupOutcome::NoFocusableElements);
    };

    driver.wait_displayed(first, wait).await?;
    driver.send_tab(first).await?;

    for (index, element) in focusables.iter().enumerate() {
        driver.wait_displayed(element, wait).await?;
        driver.send_tab(element).await?;
        if !driver.is_active(element).await? {
            return Ok(PopupOutcome::FocusLost { index });
        }
    }
    Ok(PopupOutcome::Accessible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeElement, FakePage};
    use crate::config::{DEFAULT_FOCUSABLE_SELECTOR, DEFAULT_POPUP_SELECTORS};

    const WAIT: Duration = Duration::from_millis(10);

    fn selectors() -> Vec<String> {
        DEFAULT_POPUP_SELECTORS.iter().map(|s| s.to_string()).collect()
    }

    async fn run(page: &FakePage) -> PopupCheck {
        let popup = find_popup(page, &selectors()).await.unwrap();
        is_popup_keyboard_accessible(page, popup.as_ref(), DEFAULT_FOCUSABLE_SELECTOR, WAIT)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn no_popup_is_not_found() {
        let page = FakePage::builder().build();
        let check = run(&page).await;
        assert_eq!(check.outcome, PopupOutcome::NotFound);
        assert!(!check.keyboard_accessible);
        assert!(!check.found());
    }

    #[tokio::test]
    async fn hidden_candidates_are_skipped_in_selector_order() {
        let page = FakePage::builder()
            .element(FakeElement::new("[role='dialog']").hidden())
            .element(FakeElement::new("[id*='cookie']"))
            .element(FakeElement::new(".modal"))
            .build();

        let popup = find_popup(&page, &selectors()).await.unwrap().unwrap();
        assert_eq!(popup.selector, ".modal");
    }

    #[tokio::test]
    async fn focus_retained_is_accessible() {
        let page = FakePage::builder()
            .popup(
                FakeElement::new(".cookie-banner"),
                vec![FakeElement::new("button"), FakeElement::new("a")],
            )
            .build();

        let check = run(&page).await;
        assert_eq!(check.selector.as_deref(), Some(".cookie-banner"));
        assert_eq!(check.focusable_count, 2);
        assert_eq!(check.outcome, PopupOutcome::Accessible);
        assert!(check.keyboard_accessible);
    }

    #[tokio::test]
    async fn focus_escaping_reports_index() {
        let page = FakePage::builder()
            .popup(
                FakeElement::new(".popup"),
                vec![
                    FakeElement::new("button"),
                    FakeElement::new("input").tab_escapes(),
                ],
            )
            .build();

        let check = run(&page).await;
        assert_eq!(check.outcome, PopupOutcome::FocusLost { index: 1 });
        assert!(!check.keyboard_accessible);
    }

    #[tokio::test]
    async fn invisible_focusable_times_out() {
        let page = FakePage::builder()
            .popup(
                FakeElement::new("[role='dialog']"),
                vec![FakeElement::new("button").hidden()],
            )
            .build();

        let check = run(&page).await;
        assert_eq!(check.outcome, PopupOutcome::Timeout);
        assert!(!check.keyboard_accessible);
    }

    #[tokio::test]
    async fn driver_failure_is_not_reported_as_timeout() {
        let page = FakePage::builder()
            .popup(
                FakeElement::new(".modal"),
                vec![FakeElement::new("button").stale()],
            )
            .build();

        let popup = find_popup(&page, &selectors()).await.unwrap();
        let err = is_popup_keyboard_accessible(&page, popup.as_ref(), DEFAULT_FOCUSABLE_SELECTOR, WAIT)
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Driver(_)));
    }

    #[tokio::test]
    async fn popup_without_focusables() {
        let page = FakePage::builder()
            .popup(FakeElement::new("#cookie-banner"), vec![])
            .build();

        let check = run(&page).await;
        assert_eq!(check.outcome, PopupOutcome::NoFocusableElements);
        assert_eq!(check.focusable_count, 0);
    }
}
