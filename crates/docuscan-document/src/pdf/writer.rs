// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor — turns an ordered list of base64 page images into a single
// pure-image PDF, one centred JPEG per page.
//
// Pages carry nothing but the image XObject: no text, no annotations, no page
// numbers. OCRmyPDF (and therefore Paperless) skips OCR on any page that
// already has a text layer.

use docuscan_core::config::PdfConfig;
use docuscan_core::error::DocuscanError;
use docuscan_core::{PaperSize, SkippedImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, info, instrument, warn};

use crate::image::ImageProcessor;

pub const AUTHOR: &str = "Document Scanner";
pub const SUBJECT: &str = "Scanned Document";
pub const CREATOR: &str = "Document Scanner v1.0";
const PRODUCER: &str = concat!("docuscan-document ", env!("CARGO_PKG_VERSION"));

/// Resource name of the single image drawn on every page.
const IMAGE_NAME: &[u8] = b"Im0";

/// Knobs for a single composition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Longest allowed image edge in pixels.
    pub max_image_size: u32,
    pub paper_size: PaperSize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            quality: 98,
            max_image_size: 5000,
            paper_size: PaperSize::A4,
        }
    }
}

impl From<&PdfConfig> for ComposeOptions {
    fn from(cfg: &PdfConfig) -> Self {
        Self {
            quality: cfg.compression_quality,
            max_image_size: cfg.max_image_size,
            paper_size: cfg.paper_size,
        }
    }
}

impl ComposeOptions {
    /// Replace the quality, clamped into 1-100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }
}

/// Result of a composition run.
#[derive(Debug, Clone)]
pub struct ComposeOutcome {
    pub pdf: Vec<u8>,
    pub page_count: usize,
    /// Inputs that failed to decode, in input order.
    pub skipped: Vec<SkippedImage>,
}

/// Where an image lands on its page, in PDF points from the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale an image to fit entirely within the page, preserving its aspect
/// ratio, and centre it on both axes.
pub fn fit_to_page(img_width: u32, img_height: u32, page_width: f32, page_height: f32) -> Placement {
    let img_aspect = img_width as f32 / img_height.max(1) as f32;
    let page_aspect = page_width / page_height;

    let (width, height) = if img_aspect > page_aspect {
        // Wider than the page: fit to width.
        (page_width, page_width / img_aspect)
    } else {
        (page_height * img_aspect, page_height)
    };

    Placement {
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
        width,
        height,
    }
}

/// A page image ready to embed.
struct PreparedPage {
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

/// Builds pure-image PDFs from scanned pages.
///
/// Stateless apart from its options, so one compositor can serve concurrent
/// requests.
#[derive(Debug, Clone, Default)]
pub struct PageCompositor {
    options: ComposeOptions,
}

impl PageCompositor {
    pub fn new(options: ComposeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Compose `images` (base64, data-URI prefix optional) into one PDF.
    ///
    /// Images that fail to decode or encode are logged, recorded in
    /// [`ComposeOutcome::skipped`], and left out; the remaining pages keep
    /// their input order. If nothing survives the result is a valid
    /// zero-page PDF.
    #[instrument(
        skip(self, images),
        fields(image_count = images.len(), quality = self.options.quality)
    )]
    pub fn compose<S: AsRef<str>>(
        &self,
        images: &[S],
        title: &str,
    ) -> Result<ComposeOutcome, DocuscanError> {
        let (page_w, page_h) = self.options.paper_size.dimensions_pt();
        info!(paper = ?self.options.paper_size, title, "Composing PDF");

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(images.len());
        let mut skipped = Vec::new();

        for (index, payload) in images.iter().enumerate() {
            let page = match self.prepare_page(payload.as_ref()) {
                Ok(page) => page,
                Err(err) => {
                    warn!(image = index + 1, error = %err, "Skipping image");
                    skipped.push(SkippedImage {
                        index,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let page_id = add_image_page(&mut doc, pages_id, page, page_w, page_h)?;
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => Object::Name(b"Pages".to_vec()),
                "Kids" => Object::Array(kids),
                "Count" => Object::Integer(page_count as i64),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(info_dictionary(title));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut pdf = Vec::new();
        doc.save_to(&mut pdf).map_err(|err| {
            DocuscanError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;

        info!(
            pages = page_count,
            skipped = skipped.len(),
            bytes = pdf.len(),
            "PDF composed"
        );

        Ok(ComposeOutcome {
            pdf,
            page_count,
            skipped,
        })
    }

    /// Decode, flatten, bound, and JPEG-encode one page image.
    fn prepare_page(&self, payload: &str) -> Result<PreparedPage, DocuscanError> {
        let processor = ImageProcessor::from_base64(payload)?
            .flatten_onto_white()
            .fit_within(self.options.max_image_size);
        let jpeg = processor.to_jpeg_bytes(self.options.quality)?;

        Ok(PreparedPage {
            jpeg,
            width: processor.width(),
            height: processor.height(),
        })
    }
}

/// Append a page drawing `page` centred on a `page_w` x `page_h` canvas.
fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    page: PreparedPage,
    page_w: f32,
    page_h: f32,
) -> Result<ObjectId, DocuscanError> {
    let placement = fit_to_page(page.width, page.height, page_w, page_h);
    debug!(
        width = page.width,
        height = page.height,
        jpeg_bytes = page.jpeg.len(),
        ?placement,
        "Placing image"
    );

    let mut image_stream = Stream::new(
        dictionary! {
            "Type" => Object::Name(b"XObject".to_vec()),
            "Subtype" => Object::Name(b"Image".to_vec()),
            "Width" => Object::Integer(page.width as i64),
            "Height" => Object::Integer(page.height as i64),
            "ColorSpace" => Object::Name(b"DeviceRGB".to_vec()),
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => Object::Name(b"DCTDecode".to_vec()),
        },
        page.jpeg,
    );
    image_stream.allows_compression = false;
    let image_id = doc.add_object(Object::Stream(image_stream));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(placement.width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(placement.height),
                    Object::Real(placement.x),
                    Object::Real(placement.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content.encode().map_err(|err| {
        DocuscanError::PdfError(format!("failed to encode page content: {}", err))
    })?;
    let content_id = doc.add_object(Object::Stream(Stream::new(dictionary! {}, content_bytes)));

    let mut xobjects = Dictionary::new();
    xobjects.set(IMAGE_NAME, Object::Reference(image_id));

    let page_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Page".to_vec()),
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_w),
            Object::Real(page_h),
        ]),
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "XObject" => xobjects,
        },
    });

    Ok(page_id)
}

/// Document information dictionary. Only the title varies per document.
fn info_dictionary(title: &str) -> Dictionary {
    dictionary! {
        "Title" => text_string(title),
        "Author" => text_string(AUTHOR),
        "Subject" => text_string(SUBJECT),
        "Creator" => text_string(CREATOR),
        "Producer" => text_string(PRODUCER),
    }
}

/// Encode a PDF text string: ASCII as a literal, anything else as UTF-16BE
/// with a byte-order mark.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
