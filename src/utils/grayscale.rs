//! Luminance conversion for color frames.
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed with integer weights that sum
//! to 256 so pure white stays at 255: Y = (77*R + 150*G + 29*B) >> 8.
//! Rows are converted in parallel.

use image::{DynamicImage, GrayImage};
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (77*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 77;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8) as u8
}

/// Convert packed RGB bytes to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }
    gray.par_chunks_mut(width)
        .zip(rgb.par_chunks(width * 3))
        .for_each(|(out_row, in_row)| {
            for (out, px) in out_row.iter_mut().zip(in_row.chunks_exact(3)) {
                *out = luminance(px[0], px[1], px[2]);
            }
        });
    gray
}

/// Convert any frame to a single-channel image.
///
/// 8-bit grayscale frames are copied as-is; everything else goes through RGB.
pub fn to_grayscale(frame: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = frame {
        return gray.clone();
    }

    let rgb = frame.to_rgb8();
    let (width, height) = rgb.dimensions();
    let data = rgb_to_grayscale(rgb.as_raw(), width as usize, height as usize);
    GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}
