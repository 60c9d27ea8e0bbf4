//! PDF I/O types and constants

use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default rasterization resolution in DPI.
pub const DEFAULT_DPI: u32 = 150;

/// Default JPEG quality for assembled pages.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

// ============================================================
// Error Types
// ============================================================

/// PDF I/O error types
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF file not found: {0}")]
    PdfNotFound(PathBuf),

    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    #[error("Rasterization failed: {0}")]
    RasterizeFailed(String),

    #[error("Failed to load PDF: {0}")]
    LoadFailed(String),

    #[error("Failed to encode page image: {0}")]
    EncodeFailed(String),

    #[error("Failed to save PDF: {0}")]
    SaveFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PdfError>;
