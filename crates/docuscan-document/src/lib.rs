// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docuscan-document — Turns scanned page images into pure-image PDFs.
//
// Provides image normalization (base64 decoding, flattening onto white,
// downscaling, progressive JPEG encoding), the page compositor that lays each
// image onto its own page, PDF inspection, and the output size estimator.

pub mod estimate;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `docuscan_document::PageCompositor` etc.
pub use estimate::estimate_pdf_size;
pub use image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;
pub use pdf::writer::{ComposeOptions, ComposeOutcome, PageCompositor};
