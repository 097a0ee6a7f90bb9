//! Display and persistence sinks.

use crate::error::{Result, TunerError};
use image::RgbImage;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Shows rendered frames and reports key presses
pub trait DisplaySink {
    /// Present one frame
    fn show(&mut self, frame: &RgbImage) -> Result<()>;

    /// Wait up to `timeout` for a key press
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<char>>;

    /// Tear down the window, if any
    fn close(&mut self) {}
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn show(&mut self, frame: &RgbImage) -> Result<()> {
        (**self).show(frame)
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<char>> {
        (**self).poll_key(timeout)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Window-less display.
///
/// Replays a scripted key sequence, one key per poll, then reports no key.
/// Each poll sleeps for the timeout so the loop keeps its pacing.
#[derive(Debug)]
pub struct HeadlessDisplay {
    keys: VecDeque<Option<char>>,
    shown: usize,
    sleep: bool,
}

impl HeadlessDisplay {
    /// Display that never reports a key
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            shown: 0,
            sleep: true,
        }
    }

    /// Display that replays `keys` in order
    pub fn with_keys<I: IntoIterator<Item = Option<char>>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Parse a script where `.` means "no key" and any other char is a key press
    pub fn from_script(script: &str) -> Self {
        Self::with_keys(script.chars().map(|c| if c == '.' { None } else { Some(c) }))
    }

    /// Skip the pacing sleep (tests)
    pub fn without_pacing(mut self) -> Self {
        self.sleep = false;
        self
    }
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for HeadlessDisplay {
    fn show(&mut self, frame: &RgbImage) -> Result<()> {
        self.shown += 1;
        log::trace!("frame {} shown ({}x{})", self.shown, frame.width(), frame.height());
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<char>> {
        if self.sleep && !timeout.is_zero() {
            thread::sleep(timeout);
        }
        Ok(self.keys.pop_front().flatten())
    }
}

/// Writes frames as `frame_0001.png`, `frame_0002.png`, ... into a directory
#[derive(Debug)]
pub struct FrameSaver {
    dir: PathBuf,
    count: u32,
}

impl FrameSaver {
    /// Create the output directory if needed.
    ///
    /// Failure here is a setup error and should abort the session.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            log::info!("Created output directory {}", dir.display());
        } else if !dir.is_dir() {
            return Err(TunerError::config(format!(
                "output path {} is not a directory",
                dir.display()
            )));
        }
        Ok(Self { dir, count: 0 })
    }

    /// Frames written so far
    pub fn saved(&self) -> u32 {
        self.count
    }

    /// Path the next successful save will use
    pub fn next_path(&self) -> PathBuf {
        self.dir.join(format!("frame_{:04}.png", self.count + 1))
    }

    /// Write one frame. The counter only advances on success.
    pub fn save(&mut self, frame: &RgbImage) -> Result<PathBuf> {
        let path = self.next_path();
        frame.save(&path)?;
        self.count += 1;
        Ok(path)
    }
}
