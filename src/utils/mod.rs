//! Utility functions for frame processing
//!
//! - Grayscale conversion (RGB to luminance)
//! - Binarization (fixed threshold) and display normalization
//! - Colour ramp for per-detection colours
//! - Bitmap font for on-frame labels

/// Fixed-threshold binarization and min-max normalization
pub mod binarization;
/// JET colour ramp
pub mod colormap;
/// 5x7 bitmap font
pub mod font;
/// RGB to luminance conversion
pub mod grayscale;
