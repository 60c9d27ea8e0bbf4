//! Footer ad detection core types
//!
//! Shared constants, error types and result structures for the footer
//! advertisement detectors.

use crate::region::Region;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default fraction of the page height inspected as the footer band.
pub const DEFAULT_FOOTER_FRACTION: f32 = 0.15;

/// Text block bounding boxes must be strictly wider than this to survive
/// the noise filter (tuned for footer-scale ad text, not body text).
pub const MIN_TEXT_BLOCK_WIDTH: u32 = 50;

/// Text block bounding boxes must be strictly taller than this.
pub const MIN_TEXT_BLOCK_HEIGHT: u32 = 10;

/// Bands whose pixel-intensity standard deviation falls below this value
/// count as suspiciously uniform (solid filler strips).
pub const UNIFORM_STDDEV_THRESHOLD: f64 = 30.0;

// ============================================================
// Error Types
// ============================================================

/// Footer detection error types
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid footer fraction {0}: must be a finite value in (0, 1]")]
    InvalidFooterFraction(f32),
}

pub type Result<T> = std::result::Result<T, DetectError>;

// ============================================================
// Results
// ============================================================

/// What to do with a page's footer band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterAction {
    /// Blank the entire footer band.
    BlankBand {
        /// The band in page coordinates.
        band: Region,
    },
    /// Leave the footer untouched.
    NoAction,
}

/// Detailed footer scan result, for preview and debugging.
///
/// All rectangles are in page coordinates (band-local detections are
/// translated by the band's vertical offset before they land here).
#[derive(Debug, Clone)]
pub struct FooterScan {
    /// QR symbol bounding boxes found in the band.
    pub qr_regions: Vec<Region>,
    /// Text block bounding boxes found in the band.
    pub text_regions: Vec<Region>,
    /// Population standard deviation of the band's channel samples.
    pub band_stddev: f64,
    /// True when the uniformity fallback fired (no detections, low stddev).
    pub uniform_fallback: bool,
    /// The inspected footer band.
    pub band: Region,
}

impl FooterScan {
    /// True when at least one QR symbol or text block was found.
    pub fn has_detections(&self) -> bool {
        !self.qr_regions.is_empty() || !self.text_regions.is_empty()
    }

    /// Total number of detected rectangles.
    pub fn detection_count(&self) -> usize {
        self.qr_regions.len() + self.text_regions.len()
    }

    /// The action this scan implies.
    ///
    /// Detection evidence always wins; the uniformity fallback only applies
    /// to bands with no detectable glyphs at all.
    pub fn action(&self) -> FooterAction {
        if self.has_detections() || self.uniform_fallback {
            FooterAction::BlankBand { band: self.band }
        } else {
            FooterAction::NoAction
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_scan(band: Region) -> FooterScan {
        FooterScan {
            qr_regions: Vec::new(),
            text_regions: Vec::new(),
            band_stddev: 80.0,
            uniform_fallback: false,
            band,
        }
    }

    #[test]
    fn test_scan_without_signal_is_no_action() {
        let scan = empty_scan(Region::new(0, 850, 1000, 1000));
        assert!(!scan.has_detections());
        assert_eq!(scan.detection_count(), 0);
        assert_eq!(scan.action(), FooterAction::NoAction);
    }

    #[test]
    fn test_detection_triggers_blank_band() {
        let band = Region::new(0, 850, 1000, 1000);
        let mut scan = empty_scan(band);
        scan.text_regions.push(Region::new(100, 880, 300, 900));

        assert!(scan.has_detections());
        assert_eq!(scan.action(), FooterAction::BlankBand { band });
    }

    #[test]
    fn test_qr_detection_alone_triggers_blank_band() {
        // A located QR symbol wins even in a high-variance band.
        let band = Region::new(0, 850, 1000, 1000);
        let mut scan = empty_scan(band);
        scan.qr_regions.push(Region::new(40, 870, 160, 990));

        assert!(scan.has_detections());
        assert_eq!(scan.detection_count(), 1);
        assert_eq!(scan.action(), FooterAction::BlankBand { band });
    }

    #[test]
    fn test_uniform_fallback_triggers_blank_band() {
        let band = Region::new(0, 850, 1000, 1000);
        let mut scan = empty_scan(band);
        scan.band_stddev = 4.2;
        scan.uniform_fallback = true;

        assert!(!scan.has_detections());
        assert_eq!(scan.action(), FooterAction::BlankBand { band });
    }

    #[test]
    fn test_error_display() {
        let err = DetectError::InvalidFooterFraction(1.5);
        assert!(err.to_string().contains("1.5"));

        let err = DetectError::InvalidImage("zero-sized image".to_string());
        assert!(err.to_string().contains("zero-sized"));
    }
}
