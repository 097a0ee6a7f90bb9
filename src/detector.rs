//! Multi-symbol QR detection.
//!
//! Locating and decoding symbols is delegated to `rqrr`; this module only
//! adapts its output into [`DetectionResult`] and contains its failures.

use crate::error::{Result, TunerError};
use crate::models::{Detection, DetectionResult, Point, Quad};
use image::{GrayImage, Luma};
use rqrr::{BitGrid, PreparedImage};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Locates and decodes zero or more QR symbols in a single-channel image
pub trait MultiDetector {
    /// Run one detection pass
    fn detect_multi(&mut self, image: &GrayImage) -> Result<DetectionResult>;
}

impl<F> MultiDetector for F
where
    F: FnMut(&GrayImage) -> Result<DetectionResult>,
{
    fn detect_multi(&mut self, image: &GrayImage) -> Result<DetectionResult> {
        self(image)
    }
}

/// Detector backed by `rqrr`
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDetector;

impl RqrrDetector {
    /// Create a new detector
    pub fn new() -> Self {
        Self
    }
}

impl MultiDetector for RqrrDetector {
    fn detect_multi(&mut self, image: &GrayImage) -> Result<DetectionResult> {
        Ok(DetectionResult::from_detections(run_rqrr(image)))
    }
}

fn run_rqrr(image: &GrayImage) -> Vec<Detection> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut prepared = PreparedImage::prepare_from_greyscale(width, height, |x, y| {
        image.get_pixel(x as u32, y as u32).0[0]
    });

    prepared
        .detect_grids()
        .into_iter()
        .map(|grid| {
            let text = match grid.decode() {
                Ok((_, content)) => content,
                Err(err) => {
                    log::debug!("symbol located but not decoded: {err:?}");
                    String::new()
                }
            };
            let corners = Quad::new(grid.bounds.map(|p| Point::new(p.x as f32, p.y as f32)));
            Detection {
                text,
                corners,
                patch: rectified_patch(&grid.grid),
            }
        })
        .collect()
}

/// One pixel per module, dark modules black
fn rectified_patch<G: BitGrid>(grid: &G) -> GrayImage {
    let size = grid.size() as u32;
    GrayImage::from_fn(size, size, |x, y| {
        if grid.bit(y as usize, x as usize) {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Run the detector and contain any failure.
///
/// An error or a panic from the detector is logged and reported as an
/// empty result so the frame is still rendered, just without an overlay.
pub fn detect<D: MultiDetector + ?Sized>(detector: &mut D, binary: &GrayImage) -> DetectionResult {
    let outcome = catch_unwind(AssertUnwindSafe(|| detector.detect_multi(binary)))
        .unwrap_or_else(|panic| Err(TunerError::detector(panic_message(panic.as_ref()))));
    match outcome {
        Ok(result) => result,
        Err(err) => {
            log::error!("detector failed, skipping overlay for this frame: {err}");
            DetectionResult::empty()
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_image_finds_nothing() {
        let mut detector = RqrrDetector::new();
        let image = GrayImage::from_pixel(64, 64, Luma([255]));
        let result = detector.detect_multi(&image).unwrap();
        assert!(!result.found());
    }

    #[test]
    fn test_empty_image_finds_nothing() {
        let mut detector = RqrrDetector::new();
        let result = detector.detect_multi(&GrayImage::new(0, 0)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_failure_is_swallowed() {
        let mut failing =
            |_: &GrayImage| -> Result<DetectionResult> { Err(TunerError::detector("boom")) };
        let result = detect(&mut failing, &GrayImage::new(4, 4));
        assert!(!result.found());
    }

    #[test]
    fn test_panicking_detector_is_contained() {
        let mut panicking =
            |_: &GrayImage| -> Result<DetectionResult> { panic!("detector blew up") };
        let result = detect(&mut panicking, &GrayImage::new(4, 4));
        assert!(result.is_empty());
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic");
    }

    #[test]
    fn test_rectified_patch_polarity() {
        struct Checker;
        impl BitGrid for Checker {
            fn size(&self) -> usize {
                2
            }
            fn bit(&self, y: usize, x: usize) -> bool {
                (x + y) % 2 == 0
            }
        }
        let patch = rectified_patch(&Checker);
        assert_eq!(patch.dimensions(), (2, 2));
        assert_eq!(patch.as_raw(), &vec![0, 255, 255, 0]);
    }
}
