//! Frame sources.

use crate::error::{Result, TunerError};
use image::DynamicImage;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions treated as still images
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Where frames come from, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Capture device index
    Device(i32),
    /// Still image or directory of images
    Images(PathBuf),
    /// Video file
    Video(PathBuf),
}

impl SourceSpec {
    /// A bare integer selects a device; directories and image files are
    /// still images; any other path is treated as video.
    pub fn parse(spec: &str) -> Self {
        if let Ok(index) = spec.trim().parse::<i32>() {
            return Self::Device(index);
        }
        let path = PathBuf::from(spec);
        if path.is_dir() || is_image_path(&path) {
            Self::Images(path)
        } else {
            Self::Video(path)
        }
    }
}

impl std::fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device(index) => write!(f, "camera {index}"),
            Self::Images(path) | Self::Video(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Produces frames one at a time
pub trait FrameSource {
    /// Next frame, or `Ok(None)` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<DynamicImage>>;

    /// Frame size reported by the device, when known up front
    fn frame_size(&self) -> Option<(u32, u32)> {
        None
    }

    /// Release the underlying handle
    fn release(&mut self) {}
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> Result<Option<DynamicImage>> {
        (**self).next_frame()
    }

    fn frame_size(&self) -> Option<(u32, u32)> {
        (**self).frame_size()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Whether `path` names a still image by extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Yields each image of a file or directory tree exactly once, sorted by path
#[derive(Debug)]
pub struct ImageSequenceSource {
    pending: VecDeque<PathBuf>,
}

impl ImageSequenceSource {
    /// Open a single image file or a directory of images
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut images = if path.is_dir() {
            collect_images(path)
        } else if path.is_file() && is_image_path(path) {
            vec![path.to_path_buf()]
        } else {
            return Err(TunerError::source_open(
                path.display().to_string(),
                "not an image file or directory",
            ));
        };

        images.sort();
        log::info!("Image source {}: {} frame(s)", path.display(), images.len());
        Ok(Self {
            pending: images.into(),
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<DynamicImage>> {
        match self.pending.pop_front() {
            Some(path) => {
                log::debug!("Loading frame {}", path.display());
                Ok(Some(image::open(&path)?))
            }
            None => Ok(None),
        }
    }

    fn release(&mut self) {
        self.pending.clear();
    }
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Skipping unreadable directory {}: {}", dir.display(), err);
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_image_path(&path) {
                images.push(path);
            }
        }
    }

    images
}
