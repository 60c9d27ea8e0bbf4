//! Footer band extraction
//!
//! Slices the bottom fractional band of a page image for inspection by the
//! QR and text detectors.

use super::types::{DetectError, Result};
use image::RgbImage;

/// The bottom band of a page, with the offset needed to translate band-local
/// coordinates back to page coordinates.
#[derive(Debug, Clone)]
pub struct FooterBand {
    /// The band pixels.
    pub image: RgbImage,
    /// Page row at which the band starts.
    pub y_offset: u32,
}

/// Slice the bottom `footer_fraction` of a page.
///
/// The band starts at row `floor(height * (1 - footer_fraction))`. For any
/// page of height >= 1 the band is never empty: a vanishingly small fraction
/// still yields at least the bottom row, and a fraction of 1.0 yields the
/// whole page.
pub fn extract_footer(image: &RgbImage, footer_fraction: f32) -> Result<FooterBand> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidImage(format!(
            "zero-sized image ({}x{})",
            width, height
        )));
    }
    if !footer_fraction.is_finite() || footer_fraction <= 0.0 || footer_fraction > 1.0 {
        return Err(DetectError::InvalidFooterFraction(footer_fraction));
    }

    // 0.15 etc. are not exactly representable, so the product can land a
    // hair under the exact value; floor keeps that extra row in the band.
    let y_offset = (f64::from(height) * (1.0 - f64::from(footer_fraction))).floor() as u32;
    let y_offset = y_offset.min(height - 1);

    let band = image::imageops::crop_imm(image, 0, y_offset, width, height - y_offset).to_image();

    Ok(FooterBand {
        image: band,
        y_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_page(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |_, y| Rgb([(y % 256) as u8, 0, 0]))
    }

    #[test]
    fn test_extracts_bottom_band() {
        let page = gradient_page(100, 1000);
        let band = extract_footer(&page, 0.15).unwrap();

        // 1000 * (1 - 0.15) floors to 849 in floating point.
        assert_eq!(band.y_offset, 849);
        assert_eq!(band.image.dimensions(), (100, 151));
        assert_eq!(band.image.get_pixel(0, 0), page.get_pixel(0, 849));
    }

    #[test]
    fn test_band_covers_through_last_row() {
        let page = gradient_page(40, 600);
        let band = extract_footer(&page, 0.25).unwrap();
        assert_eq!(band.y_offset + band.image.height(), 600);
        let last = band.image.height() - 1;
        assert_eq!(band.image.get_pixel(0, last), page.get_pixel(0, 599));
    }

    #[test]
    fn test_fraction_one_is_whole_page() {
        let page = gradient_page(50, 200);
        let band = extract_footer(&page, 1.0).unwrap();
        assert_eq!(band.y_offset, 0);
        assert_eq!(band.image.dimensions(), (50, 200));
    }

    #[test]
    fn test_tiny_fraction_yields_at_least_one_row() {
        let page = gradient_page(50, 1400);
        let band = extract_footer(&page, 0.0001).unwrap();
        assert!(band.image.height() >= 1);
        assert_eq!(band.y_offset + band.image.height(), 1400);

        let single_row = gradient_page(50, 1);
        let band = extract_footer(&single_row, 0.5).unwrap();
        assert_eq!(band.y_offset, 0);
        assert_eq!(band.image.height(), 1);
    }

    #[test]
    fn test_rejects_invalid_fraction() {
        let page = gradient_page(10, 10);
        assert!(matches!(
            extract_footer(&page, 0.0),
            Err(DetectError::InvalidFooterFraction(_))
        ));
        assert!(matches!(
            extract_footer(&page, 1.5),
            Err(DetectError::InvalidFooterFraction(_))
        ));
        assert!(matches!(
            extract_footer(&page, -0.2),
            Err(DetectError::InvalidFooterFraction(_))
        ));
        assert!(matches!(
            extract_footer(&page, f32::NAN),
            Err(DetectError::InvalidFooterFraction(_))
        ));
    }

    #[test]
    fn test_rejects_zero_sized_image() {
        let empty = RgbImage::new(0, 0);
        assert!(matches!(
            extract_footer(&empty, 0.15),
            Err(DetectError::InvalidImage(_))
        ));
    }
}
