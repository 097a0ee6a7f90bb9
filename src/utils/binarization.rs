use super::grayscale::to_grayscale;
use image::{DynamicImage, GrayImage};
use rayon::prelude::*;

/// Maximum intensity written for pixels at or above the threshold
pub const MAX_VALUE: u8 = 255;

/// Clamp an arbitrary threshold into `[0, 255]`
pub fn clamp_threshold(threshold: i32) -> u8 {
    threshold.clamp(0, MAX_VALUE as i32) as u8
}

/// Fixed global threshold: `>= threshold` becomes 255, everything else 0
pub fn threshold_binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let mut binary = gray.clone();
    let pixels: &mut [u8] = &mut binary;
    pixels.par_iter_mut().for_each(|p| {
        *p = if *p >= threshold { MAX_VALUE } else { 0 };
    });
    binary
}

/// Convert a frame to grayscale and apply a fixed binary threshold.
///
/// The threshold is clamped before use. Output has the frame's dimensions.
pub fn binarize(frame: &DynamicImage, threshold: i32) -> GrayImage {
    let gray = to_grayscale(frame);
    threshold_binarize(&gray, clamp_threshold(threshold))
}

/// Linearly stretch intensities so the darkest pixel maps to `lo` and the
/// brightest to `hi`. A constant image maps entirely to `lo`.
pub fn normalize_min_max(gray: &GrayImage, lo: u8, hi: u8) -> GrayImage {
    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(mn, mx), p| (mn.min(p.0[0]), mx.max(p.0[0])));

    let mut out = gray.clone();
    let pixels: &mut [u8] = &mut out;
    if max <= min {
        pixels.fill(lo);
        return out;
    }

    let src_range = (max - min) as f32;
    let dst_range = hi as f32 - lo as f32;
    pixels.par_iter_mut().for_each(|p| {
        let scaled = lo as f32 + (*p - min) as f32 * dst_range / src_range;
        *p = scaled.round().clamp(0.0, 255.0) as u8;
    });
    out
}
