use image::{GrayImage, RgbImage};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::browser::driver::PageDriver;
use crate::checks::model::ContrastCheck;
use crate::error::AuditResult;

/// Screenshot the viewport and measure its global contrast.
pub async fn check_contrast<D: PageDriver>(driver: &D) -> AuditResult<ContrastCheck> {
    let png = driver.screenshot_png().await?;
    let check = contrast_of_png(&png)?;
    info!(contrast = check.contrast, "screenshot contrast measured");
    Ok(check)
}

/// Decode a PNG and compute grayscale contrast statistics.
pub fn contrast_of_png(png: &[u8]) -> AuditResult<ContrastCheck> {
    let rgb = image::load_from_memory(png)?.to_rgb8();
    let gray = to_luma_601(&rgb);
    let (mean, std_dev) = mean_and_std_dev(gray.as_raw());

    Ok(ContrastCheck {
        contrast: std_dev,
        mean_luminance: mean,
        width: gray.width(),
        height: gray.height(),
        screenshot_sha256: hex::encode(Sha256::digest(png)),
    })
}

/// ITU-R 601-2 luma, `L = R*299/1000 + G*587/1000 + B*114/1000`,
/// in 16-bit fixed point with rounding.
pub fn to_luma_601(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (r as u32 * 19_595 + g as u32 * 38_470 + b as u32 * 7_471 + 0x8000) >> 16;
        image::Luma([l as u8])
    })
}

/// Mean and population standard deviation. Empty input yields zeros.
pub fn mean_and_std_dev(values: &[u8]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakePage, png_from_fn};

    #[test]
    fn luma_matches_601_weights() {
        let rgb = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => image::Rgb([255, 0, 0]),
            1 => image::Rgb([0, 255, 0]),
            _ => image::Rgb([0, 0, 255]),
        });
        let gray = to_luma_601(&rgb);
        assert_eq!(gray.as_raw(), &vec![76, 150, 29]);
    }

    #[test]
    fn white_and_black_extremes() {
        let rgb = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([0, 0, 0])
            }
        });
        assert_eq!(to_luma_601(&rgb).as_raw(), &vec![255, 0]);
    }

    #[test]
    fn std_dev_is_population() {
        let (mean, sd) = mean_and_std_dev(&[0, 255]);
        assert!((mean - 127.5).abs() < 1e-9);
        assert!((sd - 127.5).abs() < 1e-9);

        let (_, sd) = mean_and_std_dev(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert!((sd - 2.0).abs() < 1e-9);
    }

    #[test]
    fn uniform_image_has_zero_contrast() {
        let png = png_from_fn(8, 8, |_, _| [120, 120, 120]);
        let check = contrast_of_png(&png).unwrap();
        assert_eq!(check.contrast, 0.0);
        assert_eq!((check.width, check.height), (8, 8));
        assert_eq!(check.screenshot_sha256.len(), 64);
    }

    #[test]
    fn empty_input_yields_zero() {
        assert_eq!(mean_and_std_dev(&[]), (0.0, 0.0));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(contrast_of_png(b"not a png").is_err());
    }

    #[tokio::test]
    async fn checkerboard_screenshot_has_high_contrast() {
        let png = png_from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 { [255, 255, 255] } else { [0, 0, 0] }
        });
        let page = FakePage::builder().screenshot(png).build();

        let check = check_contrast(&page).await.unwrap();
        assert!((check.contrast - 127.5).abs() < 1e-9);
        assert!((check.mean_luminance - 127.5).abs() < 1e-9);
    }
}
