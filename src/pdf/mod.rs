//! PDF input and output
//!
//! Features:
//! - Page rasterization through Poppler's pdftoppm
//! - Page counting via lopdf without rendering
//! - Reassembly of cleaned pages into a JPEG-backed PDF

pub mod raster;
mod types;
pub mod writer;

pub use raster::PdfRasterizer;
pub use types::{PdfError, Result, DEFAULT_DPI, DEFAULT_JPEG_QUALITY};
pub use writer::PdfAssembler;
