//! PDF rasterization via Poppler's pdftoppm
//!
//! Renders PDF pages to in-memory RGB images at a configurable resolution.
//! Poppler is invoked as an external tool, matching how scanned-book PDFs
//! are usually produced on Linux; the binary is located once at construction
//! so a missing install fails fast.

use super::types::{PdfError, Result, DEFAULT_DPI};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Renders PDF pages to RGB images using pdftoppm.
pub struct PdfRasterizer {
    dpi: u32,
    tool: PathBuf,
}

impl PdfRasterizer {
    /// Create a rasterizer, resolving pdftoppm from PATH.
    pub fn new(dpi: u32) -> Result<Self> {
        let tool = which::which("pdftoppm")
            .map_err(|_| PdfError::ToolNotFound("pdftoppm (install poppler-utils)".to_string()))?;
        Ok(Self {
            dpi: dpi.max(1),
            tool,
        })
    }

    /// Create a rasterizer at the default resolution.
    pub fn with_default_dpi() -> Result<Self> {
        Self::new(DEFAULT_DPI)
    }

    /// Whether pdftoppm is available on this system.
    pub fn tool_available() -> bool {
        which::which("pdftoppm").is_ok()
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Count the pages of a PDF without rendering it.
    pub fn page_count(pdf_path: &Path) -> Result<usize> {
        let doc = lopdf::Document::load(pdf_path)
            .map_err(|e| PdfError::LoadFailed(format!("{}: {}", pdf_path.display(), e)))?;
        Ok(doc.get_pages().len())
    }

    /// Render the first pages of a PDF to RGB images.
    ///
    /// Pages come back in document order. `max_pages` caps how many are
    /// rendered; `None` renders the whole document.
    pub fn rasterize(&self, pdf_path: &Path, max_pages: Option<usize>) -> Result<Vec<RgbImage>> {
        if !pdf_path.exists() {
            return Err(PdfError::PdfNotFound(pdf_path.to_path_buf()));
        }

        let total = Self::page_count(pdf_path)?;
        let last = match max_pages {
            Some(limit) => total.min(limit),
            None => total,
        };
        if last == 0 {
            return Ok(Vec::new());
        }

        let temp_dir = tempfile::tempdir()?;
        let prefix = temp_dir.path().join("page");

        debug!(
            pdf = %pdf_path.display(),
            pages = last,
            dpi = self.dpi,
            "rasterizing with pdftoppm"
        );

        let output = Command::new(&self.tool)
            .args(["-png", "-r"])
            .arg(self.dpi.to_string())
            .args(["-f", "1", "-l"])
            .arg(last.to_string())
            .arg(pdf_path)
            .arg(&prefix)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::RasterizeFailed(stderr.trim().to_string()));
        }

        // pdftoppm pads page numbers to a fixed width, so lexicographic
        // order is document order.
        let mut rendered: Vec<PathBuf> = std::fs::read_dir(temp_dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        rendered.sort();

        if rendered.len() < last {
            return Err(PdfError::RasterizeFailed(format!(
                "expected {} rendered pages, found {}",
                last,
                rendered.len()
            )));
        }

        let mut pages = Vec::with_capacity(last);
        for path in rendered.into_iter().take(last) {
            let img = image::open(&path)
                .map_err(|e| PdfError::RasterizeFailed(format!("{}: {}", path.display(), e)))?;
            pages.push(img.to_rgb8());
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_missing_file() {
        let result = PdfRasterizer::page_count(Path::new("/nonexistent/book.pdf"));
        assert!(matches!(result, Err(PdfError::LoadFailed(_))));
    }

    #[test]
    fn test_rasterize_missing_file() {
        if let Ok(rasterizer) = PdfRasterizer::new(72) {
            let result = rasterizer.rasterize(Path::new("/nonexistent/book.pdf"), None);
            assert!(matches!(result, Err(PdfError::PdfNotFound(_))));
        }
    }

    #[test]
    fn test_dpi_floor() {
        if let Ok(rasterizer) = PdfRasterizer::new(0) {
            assert_eq!(rasterizer.dpi(), 1);
        }
    }
}
