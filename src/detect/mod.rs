//! Footer advertisement detection
//!
//! Locates and judges advertisement content in the bottom band of scanned
//! pages:
//!
//! # Features
//!
//! - **Band extraction** ([`footer`]) - Slice the bottom fraction of a page
//! - **QR location** ([`qr`]) - Find QR symbol bounding boxes via rqrr
//! - **Text blocks** ([`text`]) - Otsu + morphological close + contour boxes
//! - **Decision** ([`decision`]) - Combine the detectors with a uniformity
//!   fallback into a blank-or-keep verdict
//!
//! All detections are geometric; no OCR or semantic classification is
//! involved, and absence of a QR code or text block is a normal outcome,
//! not an error.

pub mod decision;
pub mod footer;
pub mod qr;
pub mod text;
mod types;

// Re-export public API
pub use decision::FooterAdDecision;
pub use footer::{extract_footer, FooterBand};
pub use qr::QrCodeLocator;
pub use text::TextBandDetector;
pub use types::{
    DetectError, FooterAction, FooterScan, Result, DEFAULT_FOOTER_FRACTION,
    MIN_TEXT_BLOCK_HEIGHT, MIN_TEXT_BLOCK_WIDTH, UNIFORM_STDDEV_THRESHOLD,
};

use image::{GrayImage, RgbImage};

/// BT.601 grayscale conversion shared by the band detectors.
pub(crate) fn to_grayscale(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let y601 = 0.299 * f32::from(p[0]) + 0.587 * f32::from(p[1]) + 0.114 * f32::from(p[2]);
        image::Luma([y601.round() as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_grayscale_weights() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let gray = to_grayscale(&img);
        assert_eq!(gray.get_pixel(0, 0).0[0], 76);

        let img = RgbImage::from_pixel(2, 2, Rgb([0, 255, 0]));
        let gray = to_grayscale(&img);
        assert_eq!(gray.get_pixel(0, 0).0[0], 150);

        let img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        let gray = to_grayscale(&img);
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
    }
}
