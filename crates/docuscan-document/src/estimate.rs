// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output size estimate — a rough per-page heuristic, not a measurement.

/// Fixed cost of the PDF structure itself (catalog, page tree, xref).
pub const PDF_OVERHEAD_BYTES: u64 = 10_000;

/// Quality assumed when a caller does not say.
pub const DEFAULT_ESTIMATE_QUALITY: u8 = 85;

/// Typical size of one A4 scan at the given JPEG quality.
pub fn bytes_per_page(quality: u8) -> u64 {
    match quality {
        90.. => 400_000,
        75..=89 => 250_000,
        _ => 150_000,
    }
}

/// Estimated size in bytes of a `pages`-page document.
pub fn estimate_pdf_size(pages: u64, quality: u8) -> u64 {
    pages
        .saturating_mul(bytes_per_page(quality))
        .saturating_add(PDF_OVERHEAD_BYTES)
}
