// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — base64 decoding, flattening, downscaling, and JPEG re-encoding.

pub mod processor;

pub use processor::{ImageProcessor, decode_base64, strip_data_uri};
