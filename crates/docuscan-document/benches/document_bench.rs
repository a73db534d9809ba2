// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the docuscan-document crate.
// Measures the full compose path (base64 decode, flatten, JPEG encode, PDF
// assembly) on synthetic phone-camera-sized pages.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use docuscan_document::{ComposeOptions, PageCompositor};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Build a base64 PNG with a transparent margin, so the flatten step does
/// real work rather than taking the RGB fast path.
fn synthetic_page(width: u32, height: u32) -> String {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    for y in height / 10..height - height / 10 {
        for x in width / 10..width - width / 10 {
            img.put_pixel(x, y, Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]));
        }
    }
    let mut png = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .expect("PNG encoding of synthetic page");
    STANDARD.encode(png)
}

/// Compose three 1200x1600 pages at the default quality.
fn bench_compose(c: &mut Criterion) {
    let pages: Vec<String> = (0..3).map(|_| synthetic_page(1200, 1600)).collect();
    let compositor = PageCompositor::new(ComposeOptions::default());

    c.bench_function("compose 3 pages (1200x1600, q98)", |b| {
        b.iter(|| {
            let outcome = compositor
                .compose(black_box(&pages), "Benchmark")
                .expect("compose");
            black_box(outcome.pdf);
        });
    });
}

/// Same pages with forced downscaling to 800px, exercising Lanczos3.
fn bench_compose_downscaled(c: &mut Criterion) {
    let pages: Vec<String> = (0..3).map(|_| synthetic_page(1200, 1600)).collect();
    let compositor = PageCompositor::new(ComposeOptions {
        max_image_size: 800,
        ..ComposeOptions::default()
    });

    c.bench_function("compose 3 pages downscaled to 800px", |b| {
        b.iter(|| {
            let outcome = compositor
                .compose(black_box(&pages), "Benchmark")
                .expect("compose");
            black_box(outcome.pdf);
        });
    });
}

criterion_group!(benches, bench_compose, bench_compose_downscaled);
criterion_main!(benches);
