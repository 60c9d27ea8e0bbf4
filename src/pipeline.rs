//! Page cleanup pipeline
//!
//! Orchestrates the per-page transformation: apply either the caller's keep
//! regions (masking everything else white) or the automatic footer-ad
//! decision (blanking the detected band), then optionally trim the result
//! to its content bounds.
//!
//! # Example
//!
//! ```no_run
//! use adsweep_pdf::pipeline::{PageCleanupPipeline, PipelineConfig};
//!
//! let pipeline = PageCleanupPipeline::new(PipelineConfig::default())?;
//! let page = image::open("page.png")?.to_rgb8();
//! let cleaned = pipeline.process(page, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::detect::{DetectError, FooterAction, FooterAdDecision, DEFAULT_FOOTER_FRACTION};
use crate::mask;
use crate::region::KeepRegionSet;
use crate::trim::{self, DEFAULT_BACKGROUND_THRESHOLD};
use image::RgbImage;
use thiserror::Error;
use tracing::debug;

// ============================================================
// Error Types
// ============================================================

/// Page cleanup error types
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CleanError>;

impl From<DetectError> for CleanError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::InvalidImage(msg) => CleanError::InvalidImage(msg),
            DetectError::InvalidFooterFraction(_) => CleanError::InvalidConfig(err.to_string()),
        }
    }
}

// ============================================================
// Configuration
// ============================================================

/// Immutable per-run pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Fraction of the page height inspected as the footer band, in (0, 1].
    pub footer_fraction: f32,
    /// Trim the cleaned page to its content bounds.
    pub trim_margins: bool,
    /// Luminance at or above this value counts as background when trimming.
    pub background_threshold: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            footer_fraction: DEFAULT_FOOTER_FRACTION,
            trim_margins: true,
            background_threshold: DEFAULT_BACKGROUND_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    fn validate(&self) -> Result<()> {
        let f = self.footer_fraction;
        if !f.is_finite() || f <= 0.0 || f > 1.0 {
            return Err(CleanError::InvalidConfig(format!(
                "footer_fraction {} must be a finite value in (0, 1]",
                f
            )));
        }
        Ok(())
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set the footer band fraction (validated when the pipeline is built).
    #[must_use]
    pub fn footer_fraction(mut self, fraction: f32) -> Self {
        self.config.footer_fraction = fraction;
        self
    }

    /// Enable or disable margin trimming.
    #[must_use]
    pub fn trim_margins(mut self, trim: bool) -> Self {
        self.config.trim_margins = trim;
        self
    }

    /// Set the trim background threshold.
    #[must_use]
    pub fn background_threshold(mut self, threshold: u8) -> Self {
        self.config.background_threshold = threshold;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

// ============================================================
// Pipeline
// ============================================================

/// What the pipeline did to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Masked to the supplied keep regions (count given).
    MaskedToRegions(usize),
    /// Footer band blanked after ad detection.
    BlankedFooter,
    /// No keep regions and no ad signal; pixels left as rendered.
    Untouched,
}

/// Per-page cleanup orchestrator.
///
/// Construction validates the configuration, so processing can only fail on
/// malformed input images.
#[derive(Debug, Clone)]
pub struct PageCleanupPipeline {
    config: PipelineConfig,
}

impl PageCleanupPipeline {
    /// Create a pipeline with a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Clean one page image.
    ///
    /// A non-empty keep set masks the page to those regions; otherwise the
    /// footer-ad decision runs and may blank the footer band. The result is
    /// trimmed to its content bounds when the configuration asks for it.
    pub fn process(&self, page: RgbImage, keep_regions: Option<&KeepRegionSet>) -> Result<RgbImage> {
        Ok(self.process_with_action(page, keep_regions)?.0)
    }

    /// Clean one page image and report what was done to it.
    pub fn process_with_action(
        &self,
        page: RgbImage,
        keep_regions: Option<&KeepRegionSet>,
    ) -> Result<(RgbImage, PageAction)> {
        let (width, height) = page.dimensions();
        if width == 0 || height == 0 {
            return Err(CleanError::InvalidImage(format!(
                "zero-sized page image ({}x{})",
                width, height
            )));
        }

        let (cleaned, action) = match keep_regions {
            Some(set) if !set.is_empty() => {
                debug!(regions = set.len(), "masking page to keep regions");
                (
                    mask::mask_to_regions(page, set.as_slice()),
                    PageAction::MaskedToRegions(set.len()),
                )
            }
            _ => match FooterAdDecision::decide(&page, self.config.footer_fraction)? {
                FooterAction::BlankBand { band } => {
                    debug!(%band, "blanking footer band");
                    (mask::blank_region(page, &band), PageAction::BlankedFooter)
                }
                FooterAction::NoAction => (page, PageAction::Untouched),
            },
        };

        let result = if self.config.trim_margins {
            trim::trim_to_content(cleaned, self.config.background_threshold)
        } else {
            cleaned
        };

        Ok((result, action))
    }
}
