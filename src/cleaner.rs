//! Document-level cleaning
//!
//! Drives a whole PDF (or a single image) through the page cleanup
//! pipeline: rasterize, clean every page in parallel, reassemble. Page
//! order is preserved and a summary of what happened comes back to the
//! caller.

use crate::pdf::{PdfAssembler, PdfError, PdfRasterizer};
use crate::pipeline::{CleanError, PageAction, PageCleanupPipeline, PipelineConfig};
use crate::region::{KeepMapError, PageKeepMap};
use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

// ============================================================
// Error Types
// ============================================================

/// Document cleaning error types
#[derive(Debug, Error)]
pub enum CleanerError {
    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error(transparent)]
    KeepMap(#[from] KeepMapError),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CleanerError>;

// ============================================================
// Progress Callbacks
// ============================================================

/// Callback interface for step-level progress reporting.
///
/// All methods have empty defaults, so an implementation only needs the
/// events it cares about.
pub trait ProgressCallback: Sync {
    /// A named step is starting.
    fn on_step_start(&self, _step: &str) {}

    /// Progress within the current step.
    fn on_step_progress(&self, _current: usize, _total: usize) {}

    /// A named step finished with a short result message.
    fn on_step_complete(&self, _step: &str, _message: &str) {}

    /// Detail message for debugging output.
    fn on_debug(&self, _message: &str) {}
}

/// Progress callback that reports nothing.
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {}

// ============================================================
// Options and Summary
// ============================================================

/// Options for a document cleaning run.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Per-page cleanup configuration.
    pub pipeline: PipelineConfig,
    /// Keep regions by page index; pages without an entry use detection.
    pub keep_map: PageKeepMap,
    /// Rasterization resolution.
    pub dpi: u32,
    /// JPEG quality for the assembled PDF.
    pub jpeg_quality: u8,
    /// Process at most this many pages.
    pub max_pages: Option<usize>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            keep_map: PageKeepMap::new(),
            dpi: crate::pdf::DEFAULT_DPI,
            jpeg_quality: crate::pdf::DEFAULT_JPEG_QUALITY,
            max_pages: None,
        }
    }
}

/// What a cleaning run did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanSummary {
    /// Pages processed.
    pub page_count: usize,
    /// Pages masked to caller-supplied keep regions.
    pub pages_masked: usize,
    /// Pages whose footer band was blanked by detection.
    pub pages_blanked: usize,
    /// Wall-clock processing time.
    pub elapsed_seconds: f64,
    /// Size of the written output in bytes.
    pub output_size: u64,
}

// ============================================================
// Document Cleaner
// ============================================================

/// Cleans whole documents using the page cleanup pipeline.
pub struct DocumentCleaner {
    options: CleanOptions,
    pipeline: PageCleanupPipeline,
}

impl DocumentCleaner {
    /// Create a cleaner, validating the pipeline configuration.
    pub fn new(options: CleanOptions) -> Result<Self> {
        let pipeline = PageCleanupPipeline::new(options.pipeline.clone())?;
        Ok(Self { options, pipeline })
    }

    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// Default output path for an input, inside `output_dir`.
    pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        output_dir.join(format!("{}_clean.pdf", stem))
    }

    /// Default page image directory for an input, inside `output_dir`.
    pub fn image_dir_for(input: &Path, output_dir: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        output_dir.join(format!("{}_pages", stem))
    }

    /// Clean a PDF without progress reporting.
    pub fn clean_pdf(&self, input: &Path, output: &Path) -> Result<CleanSummary> {
        self.clean_pdf_with_progress(input, output, &SilentProgress)
    }

    /// Clean a PDF, reporting step progress through `progress`.
    pub fn clean_pdf_with_progress<P: ProgressCallback>(
        &self,
        input: &Path,
        output: &Path,
        progress: &P,
    ) -> Result<CleanSummary> {
        let start = Instant::now();

        progress.on_step_start("Rasterizing pages");
        let rasterizer = PdfRasterizer::new(self.options.dpi)?;
        let pages = rasterizer.rasterize(input, self.options.max_pages)?;
        progress.on_step_complete("Rasterize", &format!("{} pages", pages.len()));
        if pages.is_empty() {
            return Err(CleanerError::Pdf(PdfError::RasterizeFailed(format!(
                "{}: document has no pages",
                input.display()
            ))));
        }

        progress.on_step_start("Cleaning pages");
        let (cleaned, pages_masked, pages_blanked) = self.clean_pages(pages, progress)?;
        progress.on_step_complete(
            "Clean",
            &format!("{} masked, {} blanked", pages_masked, pages_blanked),
        );

        progress.on_step_start("Writing PDF");
        let assembler = PdfAssembler::new(self.options.jpeg_quality);
        assembler.write_pdf(&cleaned, output)?;
        let output_size = std::fs::metadata(output)?.len();
        progress.on_step_complete("Write", &format!("{} bytes", output_size));

        let summary = CleanSummary {
            page_count: cleaned.len(),
            pages_masked,
            pages_blanked,
            elapsed_seconds: start.elapsed().as_secs_f64(),
            output_size,
        };
        info!(
            input = %input.display(),
            pages = summary.page_count,
            masked = summary.pages_masked,
            blanked = summary.pages_blanked,
            "cleaned document"
        );
        Ok(summary)
    }

    /// Clean a PDF and write the pages as numbered PNG files instead of
    /// reassembling a PDF.
    pub fn clean_pdf_to_images<P: ProgressCallback>(
        &self,
        input: &Path,
        output_dir: &Path,
        progress: &P,
    ) -> Result<CleanSummary> {
        let start = Instant::now();

        progress.on_step_start("Rasterizing pages");
        let rasterizer = PdfRasterizer::new(self.options.dpi)?;
        let pages = rasterizer.rasterize(input, self.options.max_pages)?;
        progress.on_step_complete("Rasterize", &format!("{} pages", pages.len()));
        if pages.is_empty() {
            return Err(CleanerError::Pdf(PdfError::RasterizeFailed(format!(
                "{}: document has no pages",
                input.display()
            ))));
        }

        progress.on_step_start("Cleaning pages");
        let (cleaned, pages_masked, pages_blanked) = self.clean_pages(pages, progress)?;
        progress.on_step_complete(
            "Clean",
            &format!("{} masked, {} blanked", pages_masked, pages_blanked),
        );

        progress.on_step_start("Writing page images");
        std::fs::create_dir_all(output_dir)?;
        let mut output_size = 0u64;
        for (index, page) in cleaned.iter().enumerate() {
            let path = output_dir.join(format!("page-{:04}.png", index + 1));
            page.save(&path)
                .map_err(|e| CleanerError::Image(format!("{}: {}", path.display(), e)))?;
            output_size += std::fs::metadata(&path)?.len();
        }
        progress.on_step_complete("Write", &format!("{} files", cleaned.len()));

        let summary = CleanSummary {
            page_count: cleaned.len(),
            pages_masked,
            pages_blanked,
            elapsed_seconds: start.elapsed().as_secs_f64(),
            output_size,
        };
        info!(
            input = %input.display(),
            pages = summary.page_count,
            dir = %output_dir.display(),
            "cleaned document to images"
        );
        Ok(summary)
    }

    /// Clean a single standalone image file.
    ///
    /// The keep map's page 0 entry applies. The output format follows the
    /// output path's extension.
    pub fn clean_image(&self, input: &Path, output: &Path) -> Result<CleanSummary> {
        let start = Instant::now();

        let page = image::open(input)
            .map_err(|e| CleanerError::Image(format!("{}: {}", input.display(), e)))?
            .to_rgb8();

        let keep = self.options.keep_map.regions_for(0);
        let (cleaned, action) = self.pipeline.process_with_action(page, keep)?;
        cleaned
            .save(output)
            .map_err(|e| CleanerError::Image(format!("{}: {}", output.display(), e)))?;
        let output_size = std::fs::metadata(output)?.len();

        Ok(CleanSummary {
            page_count: 1,
            pages_masked: usize::from(matches!(action, PageAction::MaskedToRegions(_))),
            pages_blanked: usize::from(matches!(action, PageAction::BlankedFooter)),
            elapsed_seconds: start.elapsed().as_secs_f64(),
            output_size,
        })
    }

    /// Run the page pipeline over all pages in parallel, preserving order.
    fn clean_pages<P: ProgressCallback>(
        &self,
        pages: Vec<RgbImage>,
        progress: &P,
    ) -> Result<(Vec<RgbImage>, usize, usize)> {
        let total = pages.len();
        let done = AtomicUsize::new(0);

        let processed: std::result::Result<Vec<(RgbImage, PageAction)>, CleanError> = pages
            .into_par_iter()
            .enumerate()
            .map(|(index, page)| {
                let keep = self.options.keep_map.regions_for(index);
                let (cleaned, action) = self.pipeline.process_with_action(page, keep)?;
                match action {
                    PageAction::MaskedToRegions(count) => progress.on_debug(&format!(
                        "page {}: masked to {} keep region(s)",
                        index + 1,
                        count
                    )),
                    PageAction::BlankedFooter => {
                        progress.on_debug(&format!("page {}: footer band blanked", index + 1));
                    }
                    PageAction::Untouched => {}
                }
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                progress.on_step_progress(current, total);
                Ok((cleaned, action))
            })
            .collect();
        let processed = processed?;

        let pages_masked = processed
            .iter()
            .filter(|(_, action)| matches!(action, PageAction::MaskedToRegions(_)))
            .count();
        let pages_blanked = processed
            .iter()
            .filter(|(_, action)| matches!(action, PageAction::BlankedFooter))
            .count();
        let cleaned = processed.into_iter().map(|(page, _)| page).collect();

        Ok((cleaned, pages_masked, pages_blanked))
    }
}
