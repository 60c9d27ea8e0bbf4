//! PDF assembly from cleaned page images
//!
//! Each page image becomes a JPEG-compressed image XObject painted over a
//! full-page content stream, with the media box sized one point per pixel.
//! Keeping the JPEG data as a DCTDecode stream means the page bitmap goes
//! into the file exactly once, already compressed.

use super::types::{PdfError, Result, DEFAULT_JPEG_QUALITY};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::path::Path;
use tracing::debug;

/// Builds a PDF from RGB page images.
pub struct PdfAssembler {
    jpeg_quality: u8,
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl PdfAssembler {
    /// Create an assembler with the given JPEG quality, clamped to 1..=100.
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Write the page images to a PDF at `output_path`, in order.
    pub fn write_pdf(&self, pages: &[RgbImage], output_path: &Path) -> Result<()> {
        if pages.is_empty() {
            return Err(PdfError::SaveFailed(
                "no pages to write".to_string(),
            ));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            let (width, height) = page.dimensions();
            let jpeg = self.encode_jpeg(page)?;
            debug!(
                page = index + 1,
                width,
                height,
                bytes = jpeg.len(),
                "encoded page image"
            );

            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(width),
                    "Height" => i64::from(height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg,
            ));

            let image_name = format!("Im{}", index + 1);
            let mut xobjects = Dictionary::new();
            xobjects.set(image_name.clone(), image_id);
            let resources_id = doc.add_object(dictionary! {
                "XObject" => Object::Dictionary(xobjects),
            });

            // Scale the unit image square up to the full media box.
            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            i64::from(width).into(),
                            0.into(),
                            0.into(),
                            i64::from(height).into(),
                            0.into(),
                            0.into(),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(image_name.into_bytes())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let encoded = content
                .encode()
                .map_err(|e| PdfError::EncodeFailed(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    i64::from(width).into(),
                    i64::from(height).into(),
                ],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        // Deflates the content streams; the DCTDecode image streams already
        // carry a filter and are left alone.
        doc.compress();
        doc.save(output_path)
            .map_err(|e| PdfError::SaveFailed(format!("{}: {}", output_path.display(), e)))?;

        Ok(())
    }

    fn encode_jpeg(&self, page: &RgbImage) -> Result<Vec<u8>> {
        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality);
        encoder
            .encode_image(page)
            .map_err(|e| PdfError::EncodeFailed(e.to_string()))?;
        Ok(jpeg)
    }
}
