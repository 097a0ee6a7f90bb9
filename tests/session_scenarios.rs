//! End-to-end scenarios for the tune-detect-render loop.
//!
//! QR frames are generated on the fly so the tests do not depend on any
//! image fixtures.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use qr_tuner::render::prepare_canvas;
use qr_tuner::sink::HeadlessDisplay;
use qr_tuner::source::FrameSource;
use qr_tuner::{
    DetectionResult, MultiDetector, Result, RqrrDetector, Session, SessionConfig, StopReason,
    binarize, process_frame, render_overlay,
};
use qrcode::{Color, QrCode};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

const DARK: Rgb<u8> = Rgb([20, 20, 20]);
const LIGHT: Rgb<u8> = Rgb([230, 230, 230]);

fn qr_frame(text: &str) -> DynamicImage {
    let code = QrCode::new(text.as_bytes()).expect("failed to encode test QR");
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let scale = 8u32;
    let quiet = 4u32;
    let side = (modules + 2 * quiet) * scale;

    let img = RgbImage::from_fn(side, side, |x, y| {
        let (mx, my) = (x / scale, y / scale);
        if mx < quiet || my < quiet || mx >= modules + quiet || my >= modules + quiet {
            return LIGHT;
        }
        let idx = ((my - quiet) * modules + (mx - quiet)) as usize;
        if colors[idx] == Color::Dark { DARK } else { LIGHT }
    });
    DynamicImage::ImageRgb8(img)
}

fn blank_frame() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, LIGHT))
}

struct VecSource {
    frames: VecDeque<DynamicImage>,
}

impl VecSource {
    fn new(frames: Vec<DynamicImage>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<DynamicImage>> {
        Ok(self.frames.pop_front())
    }
}

fn saved_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("output dir should exist")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn save_config(dir: &Path) -> SessionConfig {
    SessionConfig {
        save_frames: true,
        out_dir: dir.to_path_buf(),
        ..SessionConfig::default()
    }
}

#[test]
fn hello_symbol_is_detected_and_drawn() {
    let frame = qr_frame("HELLO");
    let binary = binarize(&frame, 80);

    let mut detector = RqrrDetector::new();
    let result = detector.detect_multi(&binary).expect("detector should not fail");
    assert!(result.found());
    assert_eq!(result.texts(), vec!["HELLO"]);
    assert_eq!(result.corners().len(), 1);
    assert_eq!(result.patches().len(), 1);
    assert_eq!(result.detections()[0].patch_side(), 21);

    let rendered = render_overlay(&binary, &result, 80);
    let plain = prepare_canvas(&binary, 80);
    assert_eq!(rendered.dimensions(), plain.dimensions());
    assert_ne!(rendered.as_raw(), plain.as_raw(), "overlay should change pixels");
}

#[test]
fn process_frame_reports_hello() {
    let mut detector = RqrrDetector::new();
    let (_, result) = process_frame(&qr_frame("HELLO"), &mut detector, 80);
    assert_eq!(result.texts(), vec!["HELLO"]);
}

#[test]
fn threshold_above_light_level_hides_symbol() {
    let mut detector = RqrrDetector::new();
    let (_, result) = process_frame(&qr_frame("HELLO"), &mut detector, 240);
    assert!(!result.found());
}

#[test]
fn immediate_end_of_stream_stops_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frames");
    let display = HeadlessDisplay::new().without_pacing();
    let session = Session::new(
        save_config(&out),
        VecSource::new(Vec::new()),
        RqrrDetector::new(),
        display,
    )
    .unwrap();

    let summary = session.run().unwrap();
    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames, 0);
    assert_eq!(summary.saved, 0);
    assert!(saved_files(&out).is_empty());
}

#[test]
fn three_iterations_save_three_numbered_frames() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out").join("video");
    let frames = vec![qr_frame("HELLO"), blank_frame(), qr_frame("https://example.com")];
    let display = HeadlessDisplay::new().without_pacing();
    let session =
        Session::new(save_config(&out), VecSource::new(frames), RqrrDetector::new(), display)
            .unwrap();

    let summary = session.run().unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.saved, 3);
    assert_eq!(summary.save_failures, 0);
    assert_eq!(
        saved_files(&out),
        vec!["frame_0001.png", "frame_0002.png", "frame_0003.png"]
    );
}

#[test]
fn quit_stops_within_one_iteration_and_skips_save() {
    let dir = tempfile::tempdir().unwrap();
    let frames = vec![blank_frame(), blank_frame(), blank_frame(), blank_frame()];
    let display = HeadlessDisplay::from_script("aq").without_pacing();
    let session = Session::new(
        save_config(dir.path()),
        VecSource::new(frames),
        RqrrDetector::new(),
        display,
    )
    .unwrap();

    let summary = session.run().unwrap();
    assert_eq!(summary.stop_reason, StopReason::Quit);
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.final_threshold, 85);
    assert_eq!(saved_files(dir.path()), vec!["frame_0001.png"]);
}

#[test]
fn saved_composite_is_half_scale_side_by_side() {
    let dir = tempfile::tempdir().unwrap();
    let display = HeadlessDisplay::new().without_pacing();
    let session = Session::new(
        save_config(dir.path()),
        VecSource::new(vec![blank_frame()]),
        RqrrDetector::new(),
        display,
    )
    .unwrap();
    session.run().unwrap();

    let saved = image::open(dir.path().join("frame_0001.png")).unwrap();
    assert_eq!((saved.width(), saved.height()), (64, 24));
}

#[test]
fn unwritable_output_dir_is_setup_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let config = save_config(&blocker.join("frames"));
    let result = Session::new(
        config,
        VecSource::new(vec![blank_frame()]),
        RqrrDetector::new(),
        HeadlessDisplay::new(),
    );
    assert!(result.is_err());
}

#[test]
fn panicking_detector_skips_overlay_but_keeps_looping() {
    let dir = tempfile::tempdir().unwrap();
    let frames = vec![qr_frame("HELLO"), blank_frame(), blank_frame()];
    let detector = |_: &GrayImage| -> Result<DetectionResult> { panic!("detector crashed") };
    let display = HeadlessDisplay::new().without_pacing();
    let session =
        Session::new(save_config(dir.path()), VecSource::new(frames), detector, display).unwrap();

    let summary = session.run().unwrap();
    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.saved, 3);
}

#[test]
fn failed_frame_write_is_counted_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frames");
    let frames = vec![blank_frame(), blank_frame(), blank_frame()];
    let display = HeadlessDisplay::new().without_pacing();
    let session =
        Session::new(save_config(&out), VecSource::new(frames), RqrrDetector::new(), display)
            .unwrap();
    fs::remove_dir_all(&out).unwrap();

    let summary = session.run().unwrap();
    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.saved, 0);
    assert_eq!(summary.save_failures, 3);
    assert!(!out.exists());
}
