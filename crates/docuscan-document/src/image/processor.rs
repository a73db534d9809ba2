// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode scanned pages from base64, flatten them onto white,
// bound their size, and re-encode as progressive JPEG for PDF embedding.

use std::borrow::Cow;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use docuscan_core::error::DocuscanError;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use tracing::{debug, instrument};

/// Standard alphabet, tolerant of missing `=` padding (some browser
/// encoders drop it).
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Remove a data-URI marker such as `data:image/png;base64,`.
///
/// Everything up to and including the first comma is dropped; a payload with
/// no comma is returned unchanged.
pub fn strip_data_uri(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}

/// Decode a base64 page payload (data-URI prefix allowed) to raw bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, DocuscanError> {
    let data = strip_data_uri(payload);
    let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64
        .decode(cleaned.as_bytes())
        .map_err(|err| DocuscanError::Base64(err.to_string()))
}

/// Normalization pipeline for a single scanned page.
///
/// Each step consumes `self` and returns the transformed processor:
///
/// ```ignore
/// let jpeg = ImageProcessor::from_base64(&payload)?
///     .flatten_onto_white()
///     .fit_within(5000)
///     .to_jpeg_bytes(98)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode a base64 payload, with or without a data-URI prefix.
    #[instrument(skip_all, fields(payload_len = payload.len()))]
    pub fn from_base64(payload: &str) -> Result<Self, DocuscanError> {
        let bytes = decode_base64(payload)?;
        Self::from_bytes(&bytes)
    }

    /// Decode raw encoded bytes (JPEG, PNG, WebP, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, DocuscanError> {
        let img = image::load_from_memory(data).map_err(|err| {
            DocuscanError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image decoded"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Convert to opaque 8-bit RGB.
    ///
    /// Images carrying an alpha channel are composited over white using alpha
    /// as the blend mask; other non-RGB modes (grey, 16-bit, ...) are
    /// converted directly. Plain RGB8 passes through untouched.
    pub fn flatten_onto_white(self) -> Self {
        if matches!(self.image, DynamicImage::ImageRgb8(_)) {
            return self;
        }

        if !self.image.color().has_alpha() {
            return Self {
                image: DynamicImage::ImageRgb8(self.image.to_rgb8()),
            };
        }

        let rgba = self.image.to_rgba8();
        let mut flat = RgbImage::new(rgba.width(), rgba.height());
        for (src, dst) in rgba.pixels().zip(flat.pixels_mut()) {
            let [r, g, b, a] = src.0;
            let alpha = a as u32;
            let blend = |channel: u8| -> u8 {
                ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
            };
            *dst = Rgb([blend(r), blend(g), blend(b)]);
        }

        debug!("Alpha composited onto white");
        Self {
            image: DynamicImage::ImageRgb8(flat),
        }
    }

    /// Downscale so neither edge exceeds `max_size`, preserving aspect
    /// ratio with Lanczos3 filtering. Smaller images are left alone.
    pub fn fit_within(self, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        if self.image.width() <= max_size && self.image.height() <= max_size {
            return self;
        }

        let resized = self
            .image
            .resize(max_size, max_size, FilterType::Lanczos3);
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            new_w = resized.width(),
            new_h = resized.height(),
            "Image downscaled"
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as a progressive JPEG with optimized Huffman tables.
    ///
    /// `quality` is clamped to 1-100. Any alpha is discarded, so callers
    /// wanting a white background should [`flatten_onto_white`] first.
    ///
    /// [`flatten_onto_white`]: Self::flatten_onto_white
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, DocuscanError> {
        let rgb: Cow<'_, RgbImage> = match &self.image {
            DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
            other => Cow::Owned(other.to_rgb8()),
        };
        let (width, height) = rgb.dimensions();
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(DocuscanError::ImageError(format!(
                "{}x{} exceeds the JPEG dimension limit",
                width, height
            )));
        };

        let mut buffer = Vec::new();
        let mut encoder = Encoder::new(&mut buffer, quality.clamp(1, 100));
        encoder.set_progressive(true);
        encoder.set_optimized_huffman_tables(true);
        encoder
            .encode(rgb.as_raw(), w, h, ColorType::Rgb)
            .map_err(|err| DocuscanError::ImageError(format!("JPEG encoding failed: {}", err)))?;

        Ok(buffer)
    }
}
