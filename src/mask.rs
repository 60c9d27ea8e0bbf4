//! Region-retention masking
//!
//! The two blanking primitives of the cleanup pipeline:
//!
//! - [`mask_to_regions`] keeps only the supplied regions and paints white
//!   everywhere else (the interactive keep-region path)
//! - [`blank_region`] paints exactly one region white and leaves the rest
//!   untouched (the footer-ad path)
//!
//! Keeping and blanking are deliberately separate operations; neither is
//! implemented as the complement of the other.

use crate::region::Region;
use image::{Rgb, RgbImage};

/// Fill value for blanked pixels.
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Keep only the given regions of an image, painting everything else white.
///
/// Regions are clamped to the image bounds and compose via union; a pixel
/// inside any region keeps its original value. Degenerate regions contribute
/// nothing. An empty region list returns the input unchanged.
pub fn mask_to_regions(image: RgbImage, regions: &[Region]) -> RgbImage {
    if regions.is_empty() {
        return image;
    }

    let (width, height) = image.dimensions();
    let mut keep = vec![false; width as usize * height as usize];

    for region in regions {
        let r = region.clamp_to(width, height);
        if r.is_empty() {
            continue;
        }
        for y in r.y1..r.y2 {
            let row = y as usize * width as usize;
            for x in r.x1..r.x2 {
                keep[row + x as usize] = true;
            }
        }
    }

    let mut out = image;
    // ImageBuffer pixel order is row-major, matching the mask layout.
    for (i, pixel) in out.pixels_mut().enumerate() {
        if !keep[i] {
            *pixel = WHITE;
        }
    }
    out
}

/// Paint exactly one region white, leaving all other pixels untouched.
pub fn blank_region(image: RgbImage, region: &Region) -> RgbImage {
    let (width, height) = image.dimensions();
    let r = region.clamp_to(width, height);
    if r.is_empty() {
        return image;
    }

    let mut out = image;
    for y in r.y1..r.y2 {
        for x in r.x1..r.x2 {
            out.put_pixel(x, y, WHITE);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([10, 20, 30])
            } else {
                Rgb([200, 100, 50])
            }
        })
    }

    #[test]
    fn test_empty_regions_identity() {
        let img = checkerboard(20, 10);
        let expected = img.clone();
        let out = mask_to_regions(img, &[]);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_mask_keeps_inside_blanks_outside() {
        let img = checkerboard(20, 10);
        let original = img.clone();
        let out = mask_to_regions(img, &[Region::new(5, 2, 10, 8)]);

        for (x, y, pixel) in out.enumerate_pixels() {
            if (5..10).contains(&x) && (2..8).contains(&y) {
                assert_eq!(pixel, original.get_pixel(x, y), "kept pixel at {x},{y}");
            } else {
                assert_eq!(pixel, &WHITE, "blanked pixel at {x},{y}");
            }
        }
    }

    #[test]
    fn test_mask_union_of_overlapping_regions() {
        let img = checkerboard(20, 20);
        let original = img.clone();
        let regions = [Region::new(0, 0, 10, 10), Region::new(5, 5, 15, 15)];
        let out = mask_to_regions(img, &regions);

        // Pixel in both regions.
        assert_eq!(out.get_pixel(7, 7), original.get_pixel(7, 7));
        // Pixel in exactly one region.
        assert_eq!(out.get_pixel(2, 2), original.get_pixel(2, 2));
        assert_eq!(out.get_pixel(13, 13), original.get_pixel(13, 13));
        // Pixel in neither.
        assert_eq!(out.get_pixel(18, 2), &WHITE);
    }

    #[test]
    fn test_mask_is_subset_operation() {
        let img = checkerboard(16, 16);
        let original = img.clone();
        let regions = [Region::new(1, 1, 4, 4), Region::new(10, 10, 20, 20)];
        let out = mask_to_regions(img, &regions);

        for (x, y, pixel) in out.enumerate_pixels() {
            assert!(
                pixel == original.get_pixel(x, y) || pixel == &WHITE,
                "pixel at {x},{y} is neither original nor white"
            );
        }
    }

    #[test]
    fn test_mask_clamps_oversized_region() {
        let img = checkerboard(20, 10);
        let expected = img.clone();
        let out = mask_to_regions(img, &[Region::new(-5, -5, 25, 15)]);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_mask_degenerate_region_blanks_all() {
        let img = checkerboard(8, 8);
        let out = mask_to_regions(img, &[Region::new(3, 3, 3, 3)]);
        assert!(out.pixels().all(|p| p == &WHITE));
    }

    #[test]
    fn test_blank_region() {
        let img = checkerboard(20, 10);
        let original = img.clone();
        let out = blank_region(img, &Region::new(0, 6, 20, 10));

        for (x, y, pixel) in out.enumerate_pixels() {
            if y >= 6 {
                assert_eq!(pixel, &WHITE);
            } else {
                assert_eq!(pixel, original.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_blank_region_degenerate_is_identity() {
        let img = checkerboard(10, 10);
        let expected = img.clone();
        let out = blank_region(img, &Region::new(50, 50, 60, 60));
        assert_eq!(out, expected);
    }
}
