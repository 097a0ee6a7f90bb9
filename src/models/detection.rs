use super::Quad;
use image::GrayImage;

/// One located symbol: decoded text, corner quad and rectified patch
#[derive(Debug, Clone)]
pub struct Detection {
    /// Decoded payload; empty when the symbol was located but not decoded
    pub text: String,
    /// Corner polygon in frame coordinates
    pub corners: Quad,
    /// Perspective-corrected module bitmap
    pub patch: GrayImage,
}

impl Detection {
    /// Side length of the rectified patch in pixels
    pub fn patch_side(&self) -> u32 {
        self.patch.width()
    }
}

/// Output of a single detector invocation.
///
/// Detections are stored as whole entries so the text, corner and patch
/// sequences can never drift apart in length.
#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    detections: Vec<Detection>,
}

impl DetectionResult {
    /// Result with nothing found
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from detections in detector order
    pub fn from_detections(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Whether at least one symbol was located
    pub fn found(&self) -> bool {
        !self.detections.is_empty()
    }

    /// Number of located symbols
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// True when nothing was found
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Detections in detector order
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Decoded texts, one per detection
    pub fn texts(&self) -> Vec<&str> {
        self.detections.iter().map(|d| d.text.as_str()).collect()
    }

    /// Corner quads, one per detection
    pub fn corners(&self) -> Vec<Quad> {
        self.detections.iter().map(|d| d.corners).collect()
    }

    /// Rectified patches, one per detection
    pub fn patches(&self) -> Vec<&GrayImage> {
        self.detections.iter().map(|d| &d.patch).collect()
    }
}
