//! Overlay rendering for detection results.

use crate::models::{Detection, DetectionResult, Quad};
use crate::utils::binarization::normalize_min_max;
use crate::utils::colormap::detection_color;
use crate::utils::font::draw_text;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// Lower bound of the display range; keeps black label text readable
pub const DISPLAY_MIN: u8 = 100;
/// Upper bound of the display range
pub const DISPLAY_MAX: u8 = 255;
/// Baseline position of the threshold label
pub const THRESHOLD_LABEL_POS: (i32, i32) = (10, 30);
/// Maximum number of payload characters shown per label
pub const MAX_LABEL_CHARS: usize = 20;
/// Label shown when a symbol was located but not decoded
pub const NOT_FOUND_LABEL: &str = "txt not found";

const TEXT_SCALE: u32 = 2;
const LINE_THICKNESS: i32 = 5;
const LABEL_OFFSET: i32 = 10;
const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Text of the threshold label, value padded to three columns
pub fn threshold_label(threshold: u8) -> String {
    format!("thresh: {threshold:3}")
}

/// Display text for one detection.
///
/// Strips `https://`, truncates the payload and appends the rectified patch
/// side. Undecoded symbols all get the same placeholder.
pub fn detection_label(detection: &Detection) -> String {
    let text = detection.text.replace("https://", "");
    if text.is_empty() {
        return NOT_FOUND_LABEL.to_string();
    }
    let shown: String = text.chars().take(MAX_LABEL_CHARS).collect();
    format!("{}({})", shown, detection.patch_side())
}

/// Normalized, 3-channel copy of the binary frame with the threshold label
pub fn prepare_canvas(binary: &GrayImage, threshold: u8) -> RgbImage {
    let normalized = normalize_min_max(binary, DISPLAY_MIN, DISPLAY_MAX);
    let mut canvas = DynamicImage::ImageLuma8(normalized).to_rgb8();
    let (x, y) = THRESHOLD_LABEL_POS;
    draw_text(&mut canvas, &threshold_label(threshold), x, y, LABEL_COLOR, TEXT_SCALE);
    canvas
}

/// Draw a closed quad with a square brush of `thickness` pixels
pub fn draw_quad(img: &mut RgbImage, quad: &Quad, color: Rgb<u8>, thickness: i32) {
    let radius = (thickness.max(1) - 1) / 2;
    for (a, b) in quad.edges() {
        for oy in -radius..=radius {
            for ox in -radius..=radius {
                let (ox, oy) = (ox as f32, oy as f32);
                draw_line_segment_mut(img, (a.x + ox, a.y + oy), (b.x + ox, b.y + oy), color);
            }
        }
    }
}

/// Draw every detection's quad and label, coloured by position in the frame.
///
/// Returns the drawn labels with their colours, in detector order.
pub fn draw_detections(img: &mut RgbImage, result: &DetectionResult) -> Vec<(String, Rgb<u8>)> {
    let count = result.len();
    result
        .detections()
        .iter()
        .enumerate()
        .map(|(i, detection)| {
            let color = detection_color(i, count);
            draw_quad(img, &detection.corners, color, LINE_THICKNESS);

            let label = detection_label(detection);
            let (x, y) = detection.corners.first().to_pixel();
            draw_text(img, &label, x, y - LABEL_OFFSET, color, TEXT_SCALE);
            (label, color)
        })
        .collect()
}

/// Build the visualization frame for one iteration.
///
/// When nothing was found only the threshold label is drawn.
pub fn render_overlay(binary: &GrayImage, result: &DetectionResult, threshold: u8) -> RgbImage {
    let mut canvas = prepare_canvas(binary, threshold);
    for detection in result.detections() {
        log::info!("Original TXT: {}", detection.text);
    }
    for (i, (label, color)) in draw_detections(&mut canvas, result).into_iter().enumerate() {
        log::debug!("{i} {label},{:?}", color.0);
    }
    canvas
}

/// Source frame and rendered overlay side by side, scaled by `scale`
pub fn compose_side_by_side(frame: &DynamicImage, rendered: &RgbImage, scale: f32) -> RgbImage {
    let source = frame.to_rgb8();
    let (w, h) = source.dimensions();
    let overlay = if rendered.dimensions() == (w, h) {
        rendered.clone()
    } else {
        imageops::resize(rendered, w, h, FilterType::Triangle)
    };

    let mut canvas = RgbImage::new(w * 2, h);
    imageops::replace(&mut canvas, &source, 0, 0);
    imageops::replace(&mut canvas, &overlay, w as i64, 0);

    if (scale - 1.0).abs() < f32::EPSILON {
        return canvas;
    }
    let out_w = ((w * 2) as f32 * scale).round().max(1.0) as u32;
    let out_h = (h as f32 * scale).round().max(1.0) as u32;
    imageops::resize(&canvas, out_w, out_h, FilterType::Triangle)
}
