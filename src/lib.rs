//! adsweep-pdf - Advertisement removal for scanned PDF pages
//!
//! Cleans scanned book and document PDFs by removing advertisement
//! footers and QR-code strips, masking pages to caller-designated keep
//! regions, and trimming the surrounding white margins. Pages are
//! rasterized with Poppler, cleaned in parallel and reassembled into a
//! compact JPEG-backed PDF.
//!
//! # Example
//!
//! ```no_run
//! use adsweep_pdf::{CleanOptions, DocumentCleaner};
//! use std::path::Path;
//!
//! let cleaner = DocumentCleaner::new(CleanOptions::default())?;
//! let summary = cleaner.clean_pdf(Path::new("scan.pdf"), Path::new("scan_clean.pdf"))?;
//! println!("{} pages cleaned", summary.page_count);
//! # Ok::<(), adsweep_pdf::CleanerError>(())
//! ```

pub mod cache;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod detect;
pub mod mask;
pub mod pdf;
pub mod pipeline;
pub mod progress;
pub mod region;
pub mod trim;

// Cache module
pub use cache::{should_skip_processing, CacheDigest, CacheError, ProcessingCache, CACHE_VERSION};

// Document cleaning
pub use cleaner::{
    CleanOptions, CleanSummary, CleanerError, DocumentCleaner, ProgressCallback, SilentProgress,
};

// CLI
pub use cli::{CacheInfoArgs, CleanArgs, Cli, Commands};

// Config
pub use config::{CliOverrides, Config, ConfigError};

// Detection
pub use detect::{
    extract_footer, DetectError, FooterAction, FooterAdDecision, FooterBand, FooterScan,
    QrCodeLocator, TextBandDetector,
};

// Page operations
pub use mask::{blank_region, mask_to_regions};
pub use trim::trim_to_content;

// PDF I/O
pub use pdf::{PdfAssembler, PdfError, PdfRasterizer};

// Pipeline
pub use pipeline::{
    CleanError, PageAction, PageCleanupPipeline, PipelineConfig, PipelineConfigBuilder,
};

// Progress tracking
pub use progress::{build_progress_bar, OutputMode, ProcessingStage, ProgressTracker};

// Regions
pub use region::{KeepMapError, KeepRegionSet, PageKeepMap, ParseRegionError, Region};

/// Process exit codes for the command-line binary.
pub mod exit_codes {
    /// All files processed successfully.
    pub const SUCCESS: i32 = 0;
    /// At least one file failed to process.
    pub const GENERAL_ERROR: i32 = 1;
    /// The input path does not exist or contains nothing to process.
    pub const INPUT_NOT_FOUND: i32 = 2;
}
