//! Text block detection
//!
//! Finds dense text-like blobs in a footer band: Otsu binarization with
//! dark strokes as foreground, a morphological close to merge adjacent
//! character strokes into word/line blobs, then external contour bounding
//! boxes filtered by minimum size.

use super::types::{MIN_TEXT_BLOCK_HEIGHT, MIN_TEXT_BLOCK_WIDTH};
use crate::region::Region;
use image::{GrayImage, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;

/// Radius of the square closing element, applied as dilate-then-erode.
/// Radius 2 merges strokes up to 4 px apart.
const CLOSE_RADIUS: u8 = 2;

/// Detects text-like blocks in a footer band.
pub struct TextBandDetector;

impl TextBandDetector {
    /// Bounding boxes of text-like blobs, band-local coordinates.
    ///
    /// Boxes not strictly larger than the 50x10 noise filter are dropped;
    /// an empty result is the normal outcome for ad-free bands.
    pub fn locate_text_blocks(band: &RgbImage) -> Vec<Region> {
        let gray = super::to_grayscale(band);
        Self::locate_in_gray(&gray)
    }

    /// Same as [`Self::locate_text_blocks`], over an existing grayscale band.
    pub fn locate_in_gray(gray: &GrayImage) -> Vec<Region> {
        if gray.width() == 0 || gray.height() == 0 {
            return Vec::new();
        }

        let level = otsu_level(gray);
        // BinaryInverted maps dark strokes to foreground.
        let binary = threshold(gray, level, ThresholdType::BinaryInverted);
        let closed = close(&binary, Norm::LInf, CLOSE_RADIUS);

        let contours: Vec<Contour<i32>> = find_contours(&closed);
        contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(|c| contour_bounds(c))
            .filter(|r| r.width() > MIN_TEXT_BLOCK_WIDTH && r.height() > MIN_TEXT_BLOCK_HEIGHT)
            .collect()
    }
}

/// Axis-aligned bounding box of a contour, exclusive right/bottom edges.
fn contour_bounds(contour: &Contour<i32>) -> Option<Region> {
    let first = contour.points.first()?;
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;

    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(Region::new(min_x, min_y, max_x + 1, max_y + 1))
}
