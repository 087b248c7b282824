//! Benchmarks for the recompression ladder.
//!
//! Run with: cargo bench -p squeeze-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use squeeze_core::pipeline::{encode_jpeg, normalize};
use squeeze_core::{CompressionJob, Recompressor};

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    })
}

fn benchmark_encode(c: &mut Criterion) {
    let img = gradient(512, 512);

    c.bench_function("encode_jpeg_q95_512", |b| {
        b.iter(|| encode_jpeg(black_box(&img), 95))
    });
    c.bench_function("encode_jpeg_q15_512", |b| {
        b.iter(|| encode_jpeg(black_box(&img), 15))
    });
}

fn benchmark_normalize(c: &mut Criterion) {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1024, 1024, Rgba([200, 100, 50, 128])));

    c.bench_function("normalize_rgba_1024", |b| {
        b.iter(|| normalize(black_box(img.clone()), Rgb([26, 10, 46])))
    });
}

fn benchmark_full_ladder(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("src.png");
    DynamicImage::ImageRgb8(gradient(256, 256))
        .save(&src)
        .expect("write fixture");
    // Budget of one byte forces every level to be tried.
    let job = CompressionJob::new(&src, dir.path().join("out.jpg"), 1);
    let recompressor = Recompressor::default();

    c.bench_function("recompress_exhaust_256", |b| {
        b.iter(|| recompressor.compress(black_box(&job)))
    });
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_normalize,
    benchmark_full_ladder
);
criterion_main!(benches);
