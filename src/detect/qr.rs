//! QR symbol location
//!
//! Thin wrapper over the `rqrr` decoder that reduces its grid detection to
//! candidate bounding rectangles in band-local coordinates.

use crate::region::Region;
use image::RgbImage;

/// Locates QR symbols in a footer band.
pub struct QrCodeLocator;

impl QrCodeLocator {
    /// Bounding boxes of QR symbols found in the band, band-local.
    ///
    /// Returns at most one rectangle: the axis-aligned bounding box of the
    /// first detected grid's corner points. A symbol only needs to be
    /// located, not successfully decoded, to count. No symbol found is the
    /// common case and yields an empty vec.
    pub fn locate(band: &RgbImage) -> Vec<Region> {
        let gray = super::to_grayscale(band);
        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();

        grids
            .first()
            .map(|grid| {
                let corners = grid.bounds;
                let min_x = corners.iter().map(|p| p.x).min().unwrap_or(0);
                let min_y = corners.iter().map(|p| p.y).min().unwrap_or(0);
                let max_x = corners.iter().map(|p| p.x).max().unwrap_or(0);
                let max_y = corners.iter().map(|p| p.y).max().unwrap_or(0);
                Region::new(min_x, min_y, max_x, max_y)
            })
            .into_iter()
            .collect()
    }
}
