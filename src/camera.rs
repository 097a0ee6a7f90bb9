//! OpenCV-backed camera/video source and window display.
//!
//! Only built with the `camera` feature.

use crate::error::{Result, TunerError};
use crate::sink::DisplaySink;
use crate::source::{FrameSource, SourceSpec};
use image::{DynamicImage, RgbImage};
use opencv::{
    core::{CV_8UC3, Mat, Mat_AUTO_STEP, ToInputArray, ToOutputArray},
    highgui, imgproc,
    prelude::*,
    videoio::{self, CAP_ANY, VideoCapture},
};
use std::time::Duration;

/// Channel-order conversion; macOS builds of OpenCV take an extra algorithm hint
fn convert_color(
    src: &impl ToInputArray,
    dst: &mut impl ToOutputArray,
    code: i32,
) -> opencv::Result<()> {
    #[cfg(target_os = "macos")]
    imgproc::cvt_color(
        src,
        dst,
        code,
        0,
        opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
    )?;

    #[cfg(not(target_os = "macos"))]
    imgproc::cvt_color(src, dst, code, 0)?;

    Ok(())
}

/// Frames from `VideoCapture`
pub struct CameraSource {
    capture: VideoCapture,
    target: SourceSpec,
    released: bool,
}

impl CameraSource {
    /// Open a device or video file
    pub fn open(target: SourceSpec) -> Result<Self> {
        let capture = match &target {
            SourceSpec::Device(index) => VideoCapture::new(*index, CAP_ANY),
            SourceSpec::Video(path) => VideoCapture::from_file(&path.to_string_lossy(), CAP_ANY),
            SourceSpec::Images(_) => {
                return Err(TunerError::source_open(
                    target.to_string(),
                    "still images are read without OpenCV",
                ));
            }
        }
        .map_err(|e| TunerError::source_open(target.to_string(), e.to_string()))?;

        if !capture
            .is_opened()
            .map_err(|e| TunerError::source_open(target.to_string(), e.to_string()))?
        {
            return Err(TunerError::source_open(target.to_string(), "capture is not opened"));
        }

        log::info!("Opened {}", target);
        Ok(Self {
            capture,
            target,
            released: false,
        })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<DynamicImage>> {
        let mut bgr = Mat::default();
        if !self.capture.read(&mut bgr)? || bgr.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        convert_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;

        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let data = rgb.data_bytes()?.to_vec();
        let image = RgbImage::from_vec(width, height, data)
            .ok_or_else(|| TunerError::source_open(self.target.to_string(), "frame buffer size mismatch"))?;
        Ok(Some(DynamicImage::ImageRgb8(image)))
    }

    fn frame_size(&self) -> Option<(u32, u32)> {
        let w = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH).ok()?;
        let h = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT).ok()?;
        (w > 0.0 && h > 0.0).then_some((w as u32, h as u32))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.capture.release() {
            log::warn!("failed to release {}: {err}", self.target);
        }
    }
}

/// `highgui` window
pub struct HighGuiWindow {
    name: String,
    open: bool,
}

impl HighGuiWindow {
    /// Create a named window
    pub fn open(name: &str) -> Result<Self> {
        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            name: name.to_string(),
            open: true,
        })
    }
}

impl DisplaySink for HighGuiWindow {
    fn show(&mut self, frame: &RgbImage) -> Result<()> {
        let data = frame.as_raw();
        // Borrowed view over the image buffer; only used within this call
        let rgb = unsafe {
            Mat::new_rows_cols_with_data_unsafe(
                frame.height() as i32,
                frame.width() as i32,
                CV_8UC3,
                data.as_ptr() as *mut _,
                Mat_AUTO_STEP,
            )?
        };
        let mut bgr = Mat::default();
        convert_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
        highgui::imshow(&self.name, &bgr)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<char>> {
        let delay = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        let key = highgui::wait_key(delay)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(char::from_u32((key & 0xFF) as u32))
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(err) = highgui::destroy_window(&self.name) {
            log::warn!("failed to close window {}: {err}", self.name);
        }
    }
}
