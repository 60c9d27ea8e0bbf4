//! Content-bounds margin trimming
//!
//! Crops an image to the bounding box of its non-background pixels, where
//! background means "near white" under a luminance threshold. Used as the
//! final pipeline stage to tighten pages after masking or footer blanking.

use image::{Rgb, RgbImage};

/// Luminance at or above this value counts as background.
pub const DEFAULT_BACKGROUND_THRESHOLD: u8 = 250;

/// BT.601 luminance of an RGB pixel.
fn luminance(pixel: &Rgb<u8>) -> u8 {
    let y = 0.299 * f32::from(pixel[0]) + 0.587 * f32::from(pixel[1]) + 0.114 * f32::from(pixel[2]);
    y.round() as u8
}

/// Crop an image to the bounding box of its non-background content.
///
/// A pixel is background when its luminance is at or above
/// `background_threshold`. If every pixel is background there is nothing to
/// trim and the input is returned unchanged; this is the normal outcome for
/// blank pages, not an error. Single-pixel-wide content trims to exactly
/// that line.
pub fn trim_to_content(image: RgbImage, background_threshold: u8) -> RgbImage {
    let (width, height) = image.dimensions();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if luminance(pixel) < background_threshold {
            found = true;
            if x < min_x {
                min_x = x;
            }
            if y < min_y {
                min_y = y;
            }
            if x > max_x {
                max_x = x;
            }
            if y > max_y {
                max_y = y;
            }
        }
    }

    if !found {
        return image;
    }

    let crop_width = max_x - min_x + 1;
    let crop_height = max_y - min_y + 1;
    if crop_width == width && crop_height == height {
        return image;
    }

    image::imageops::crop_imm(&image, min_x, min_y, crop_width, crop_height).to_image()
}
