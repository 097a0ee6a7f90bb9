//! qr_tuner - interactive binarization tuning for multi-QR detection
//!
//! Pulls frames from a camera, video or still images, binarizes them at a
//! keyboard-adjustable threshold, runs a multi-symbol QR detector and draws
//! the located quads and decoded text on a visualization frame.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// OpenCV capture source and window (feature `camera`)
#[cfg(feature = "camera")]
pub mod camera;
/// Session configuration and defaults
pub mod config;
/// QR detector seam and the `rqrr` backend
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (Point, Quad, Detection, TuningState, ...)
pub mod models;
/// Overlay rendering
pub mod render;
/// The tune-detect-render loop
pub mod session;
/// Display and persistence sinks
pub mod sink;
/// Frame sources
pub mod source;
/// Utility functions (grayscale, binarization, colours, font)
pub mod utils;

pub use config::SessionConfig;
pub use detector::{MultiDetector, RqrrDetector, detect};
pub use error::{Result, TunerError};
pub use models::{Detection, DetectionResult, Point, Quad, TuningState, apply_control};
pub use render::render_overlay;
pub use session::{Session, SessionSummary, StopReason};
pub use utils::binarization::binarize;

use image::{DynamicImage, RgbImage};
use render::draw_detections;
use utils::binarization::clamp_threshold;
use utils::grayscale::to_grayscale;

/// Binarize, detect and render one frame.
///
/// Detector failures are logged and yield an overlay-free frame.
pub fn process_frame<D: MultiDetector + ?Sized>(
    frame: &DynamicImage,
    detector: &mut D,
    threshold: i32,
) -> (RgbImage, DetectionResult) {
    let threshold = clamp_threshold(threshold);
    let binary = binarize(frame, threshold as i32);
    let result = detect(detector, &binary);
    let rendered = render_overlay(&binary, &result, threshold);
    (rendered, result)
}

/// Detect on a still image and draw the results over the original pixels.
///
/// With `threshold` set the image is binarized first; otherwise detection
/// runs on plain grayscale.
pub fn annotate_image<D: MultiDetector + ?Sized>(
    image: &DynamicImage,
    detector: &mut D,
    threshold: Option<i32>,
) -> (RgbImage, DetectionResult) {
    let input = match threshold {
        Some(t) => binarize(image, t),
        None => to_grayscale(image),
    };
    let result = detect(detector, &input);
    let mut annotated = image.to_rgb8();
    for (label, _) in draw_detections(&mut annotated, &result) {
        log::info!("{label}");
    }
    (annotated, result)
}
