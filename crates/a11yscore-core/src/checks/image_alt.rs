use tracing::info;

use crate::browser::driver::PageDriver;
use crate::checks::model::ImageAltCheck;
use crate::error::AuditResult;

fn non_empty(alt: Option<String>) -> Option<String> {
    alt.filter(|a| !a.trim().is_empty())
}

/// Look for alternative text on the page's images.
///
/// The first `<img>` is reported individually; the remaining images only
/// contribute to the counts.
pub async fn check_image_alt<D: PageDriver>(driver: &D) -> AuditResult<ImageAltCheck> {
    let images = driver.find_all("img").await?;

    let mut missing_alt_count = 0u32;
    let mut first_image_alt = None;
    for (i, img) in images.iter().enumerate() {
        let alt = non_empty(driver.attribute(img, "alt").await?);
        if alt.is_none() {
            missing_alt_count += 1;
        }
        if i == 0 {
            first_image_alt = alt;
        }
    }

    match (images.first(), first_image_alt.as_deref()) {
        (None, _) => info!("page has no images"),
        (Some(_), Some(alt)) => info!(%alt, "first image description"),
        (Some(_), None) => info!("first image has no alt attribute"),
    }

    Ok(ImageAltCheck {
        image_count: images.len() as u32,
        missing_alt_count,
        first_image_present: !images.is_empty(),
        first_image_alt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeElement, FakePage};
    use crate::error::AuditError;

    #[tokio::test]
    async fn reports_first_alt_and_counts_missing() {
        let page = FakePage::builder()
            .element(FakeElement::new("img").attr("alt", "Company logo"))
            .element(FakeElement::new("img"))
            .element(FakeElement::new("img").attr("alt", "   "))
            .build();

        let check = check_image_alt(&page).await.unwrap();

        assert!(check.first_image_present);
        assert_eq!(check.first_image_alt.as_deref(), Some("Company logo"));
        assert_eq!(check.image_count, 3);
        assert_eq!(check.missing_alt_count, 2);
    }

    #[tokio::test]
    async fn first_image_without_alt() {
        let page = FakePage::builder()
            .element(FakeElement::new("img").attr("alt", ""))
            .build();

        let check = check_image_alt(&page).await.unwrap();
        assert!(check.first_image_present);
        assert!(check.first_image_alt.is_none());
        assert_eq!(check.missing_alt_count, 1);
    }

    #[tokio::test]
    async fn page_without_images() {
        let page = FakePage::builder().build();
        let check = check_image_alt(&page).await.unwrap();
        assert!(!check.first_image_present);
        assert_eq!(check.image_count, 0);
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let page = FakePage::builder().fail_selector("img").build();
        let err = check_image_alt(&page).await.unwrap_err();
        assert!(matches!(err, AuditError::Driver(_)));
    }
}
