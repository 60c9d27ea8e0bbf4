//! Footer advertisement decision engine
//!
//! Combines the QR locator, the text block detector and a uniformity
//! fallback into the per-page decision of whether to blank the footer band.

use super::footer::{extract_footer, FooterBand};
use super::qr::QrCodeLocator;
use super::text::TextBandDetector;
use super::types::{FooterAction, FooterScan, Result, UNIFORM_STDDEV_THRESHOLD};
use crate::region::Region;
use image::RgbImage;
use tracing::debug;

/// Decides whether a page's footer band carries advertisement content.
pub struct FooterAdDecision;

impl FooterAdDecision {
    /// Decide what to do with the page's footer.
    ///
    /// Precedence, in order: any QR or text detection blanks the whole
    /// band; failing that, a band with pixel-intensity standard deviation
    /// below the uniformity threshold is blanked as a solid filler strip;
    /// otherwise the footer is left untouched.
    pub fn decide(page: &RgbImage, footer_fraction: f32) -> Result<FooterAction> {
        Ok(Self::scan(page, footer_fraction)?.action())
    }

    /// Full scan of the footer band, for preview and debugging.
    ///
    /// All returned rectangles are translated to page coordinates.
    pub fn scan(page: &RgbImage, footer_fraction: f32) -> Result<FooterScan> {
        let FooterBand {
            image: band,
            y_offset,
        } = extract_footer(page, footer_fraction)?;
        let dy = y_offset as i32;

        let qr_regions: Vec<Region> = QrCodeLocator::locate(&band)
            .into_iter()
            .map(|r| r.translate_y(dy))
            .collect();
        let text_regions: Vec<Region> = TextBandDetector::locate_text_blocks(&band)
            .into_iter()
            .map(|r| r.translate_y(dy))
            .collect();

        let band_stddev = intensity_stddev(&band);
        let band_rect = Region::new(0, dy, page.width() as i32, page.height() as i32);

        let has_detections = !qr_regions.is_empty() || !text_regions.is_empty();
        let uniform_fallback = !has_detections && band_stddev < UNIFORM_STDDEV_THRESHOLD;

        debug!(
            qr = qr_regions.len(),
            text = text_regions.len(),
            stddev = band_stddev,
            uniform_fallback,
            "footer scan"
        );

        Ok(FooterScan {
            qr_regions,
            text_regions,
            band_stddev,
            uniform_fallback,
            band: band_rect,
        })
    }
}

/// Population standard deviation of every channel sample in the image.
fn intensity_stddev(image: &RgbImage) -> f64 {
    let samples = image.as_raw();
    if samples.is_empty() {
        return 0.0;
    }

    let n = samples.len() as f64;
    let mean = samples.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}
