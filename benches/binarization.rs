use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use qr_tuner::models::DetectionResult;
use qr_tuner::render::render_overlay;
use qr_tuner::utils::binarization::{binarize, normalize_min_max, threshold_binarize};

fn bench_threshold_binarize_medium(c: &mut Criterion) {
    let gray = GrayImage::from_pixel(640, 480, Luma([128]));
    c.bench_function("threshold_binarize_640x480", |b| {
        b.iter(|| threshold_binarize(black_box(&gray), black_box(80)))
    });
}

fn bench_binarize_color_frame(c: &mut Criterion) {
    let frame = DynamicImage::ImageRgb8(RgbImage::new(1280, 720));
    c.bench_function("binarize_frame_1280x720", |b| {
        b.iter(|| binarize(black_box(&frame), black_box(80)))
    });
}

fn bench_normalize_for_display(c: &mut Criterion) {
    let gray = GrayImage::from_fn(640, 480, |x, _| Luma([if x % 2 == 0 { 0 } else { 255 }]));
    c.bench_function("normalize_min_max_640x480", |b| {
        b.iter(|| normalize_min_max(black_box(&gray), 100, 255))
    });
}

fn bench_render_empty_overlay(c: &mut Criterion) {
    let gray = GrayImage::from_pixel(640, 480, Luma([255]));
    let result = DetectionResult::empty();
    c.bench_function("render_overlay_empty_640x480", |b| {
        b.iter(|| render_overlay(black_box(&gray), black_box(&result), black_box(80)))
    });
}

criterion_group!(
    benches,
    bench_threshold_binarize_medium,
    bench_binarize_color_frame,
    bench_normalize_for_display,
    bench_render_empty_overlay
);
criterion_main!(benches);
