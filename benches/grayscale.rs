use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, RgbImage};
use qr_tuner::utils::grayscale::{rgb_to_grayscale, to_grayscale};

fn bench_rgb_to_grayscale_medium(c: &mut Criterion) {
    let image = vec![128u8; 640 * 480 * 3];
    c.bench_function("rgb_to_grayscale_640x480", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&image), black_box(640), black_box(480)))
    });
}

fn bench_rgb_to_grayscale_large(c: &mut Criterion) {
    let image = vec![128u8; 1920 * 1080 * 3];
    c.bench_function("rgb_to_grayscale_1920x1080", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&image), black_box(1920), black_box(1080)))
    });
}

fn bench_frame_to_grayscale(c: &mut Criterion) {
    let frame = DynamicImage::ImageRgb8(RgbImage::new(1280, 720));
    c.bench_function("frame_to_grayscale_1280x720", |b| {
        b.iter(|| to_grayscale(black_box(&frame)))
    });
}

criterion_group!(
    benches,
    bench_rgb_to_grayscale_medium,
    bench_rgb_to_grayscale_large,
    bench_frame_to_grayscale
);
criterion_main!(benches);
