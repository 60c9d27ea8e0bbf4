//! Region geometry types
//!
//! Rectangular keep/discard regions in page pixel coordinates, the per-page
//! region sets built from CLI flags or a JSON map file, and the page map
//! consumed by the cleanup pipeline.
//!
//! Coordinates are stored as `i32` so that raw user input (inverted corners,
//! values outside the image) can be carried as-is; every consumer clamps via
//! [`Region::clamp_to`] before touching pixels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

// ============================================================
// Error Types
// ============================================================

/// Error parsing a region from its `x1,y1,x2,y2` text form.
#[derive(Debug, Error)]
#[error("invalid region '{input}': expected X1,Y1,X2,Y2")]
pub struct ParseRegionError {
    input: String,
}

/// Keep-map file errors.
#[derive(Debug, Error)]
pub enum KeepMapError {
    #[error("Keep map not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("Failed to read keep map: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse keep map: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================
// Region
// ============================================================

/// Axis-aligned rectangle in page pixel coordinates.
///
/// Corners may arrive inverted or out of bounds; [`Region::clamp_to`]
/// normalizes them against a concrete image size. When rasterized the
/// rectangle is half-open: it covers `[x1, x2) x [y1, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Region {
    /// Create a region from raw corner coordinates.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels, zero if the corners are inverted.
    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).max(0) as u32
    }

    /// Height in pixels, zero if the corners are inverted.
    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).max(0) as u32
    }

    /// Shift the region vertically (band-local to page coordinates).
    pub fn translate_y(&self, dy: i32) -> Self {
        Self {
            x1: self.x1,
            y1: self.y1 + dy,
            x2: self.x2,
            y2: self.y2 + dy,
        }
    }

    /// Sort the corners and clamp them into `[0, width] x [0, height]`.
    ///
    /// Inverted corners are corrected rather than rejected; the result may
    /// still be empty (zero area) and then contributes nothing.
    pub fn clamp_to(&self, width: u32, height: u32) -> ClampedRegion {
        let (lo_x, hi_x) = if self.x1 <= self.x2 {
            (self.x1, self.x2)
        } else {
            (self.x2, self.x1)
        };
        let (lo_y, hi_y) = if self.y1 <= self.y2 {
            (self.y1, self.y2)
        } else {
            (self.y2, self.y1)
        };

        let clamp_x = |v: i32| (v.max(0) as u32).min(width);
        let clamp_y = |v: i32| (v.max(0) as u32).min(height);

        ClampedRegion {
            x1: clamp_x(lo_x),
            y1: clamp_y(lo_y),
            x2: clamp_x(hi_x),
            y2: clamp_y(hi_y),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<i32> = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|_| ParseRegionError {
                input: s.to_string(),
            })?;

        if parts.len() != 4 {
            return Err(ParseRegionError {
                input: s.to_string(),
            });
        }

        Ok(Region::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

/// A region clamped into a concrete image's bounds, corners ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedRegion {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl ClampedRegion {
    /// True when the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }
}

// ============================================================
// KeepRegionSet
// ============================================================

/// Ordered set of keep regions for one page.
///
/// Order is irrelevant to the masking result (regions compose via union) but
/// is preserved for display purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeepRegionSet {
    regions: Vec<Region>,
}

impl KeepRegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }
}

impl From<Vec<Region>> for KeepRegionSet {
    fn from(regions: Vec<Region>) -> Self {
        Self { regions }
    }
}

// ============================================================
// PageKeepMap
// ============================================================

/// Keep regions per page.
///
/// A page without an entry has no explicit keep regions; an entry holding an
/// empty set is preserved as "explicitly zero regions kept" and is distinct
/// from a missing entry. An optional all-pages set applies wherever no
/// per-page entry exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageKeepMap {
    /// Regions applied to every page without its own entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    all_pages: Option<KeepRegionSet>,
    /// Per-page regions, keyed by 0-based page index.
    pages: BTreeMap<usize, KeepRegionSet>,
}

impl PageKeepMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map that applies the same regions to every page.
    pub fn for_all_pages(regions: Vec<Region>) -> Self {
        Self {
            all_pages: Some(KeepRegionSet::from(regions)),
            pages: BTreeMap::new(),
        }
    }

    /// Load a map from a JSON file.
    ///
    /// Format: `{"all_pages": [..], "pages": {"0": [{"x1":..},..], ..}}`,
    /// both keys optional.
    pub fn load_from_path(path: &Path) -> Result<Self, KeepMapError> {
        if !path.exists() {
            return Err(KeepMapError::NotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Regions for a page: the page's own entry if present, else the
    /// all-pages set, else `None`.
    pub fn regions_for(&self, page_index: usize) -> Option<&KeepRegionSet> {
        self.pages
            .get(&page_index)
            .or(self.all_pages.as_ref())
    }

    /// The set applied to pages without their own entry, if any.
    pub fn all_pages(&self) -> Option<&KeepRegionSet> {
        self.all_pages.as_ref()
    }

    /// Set a page's regions. An empty set is kept as an explicit entry.
    pub fn set_page(&mut self, page_index: usize, regions: KeepRegionSet) {
        self.pages.insert(page_index, regions);
    }

    /// Remove a page's entry entirely (distinct from setting it empty).
    pub fn remove_page(&mut self, page_index: usize) -> Option<KeepRegionSet> {
        self.pages.remove(&page_index)
    }

    /// True when neither per-page nor all-pages regions exist.
    pub fn is_empty(&self) -> bool {
        self.all_pages.is_none() && self.pages.is_empty()
    }

    /// Number of pages with their own entry.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
