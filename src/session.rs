//! The tune-detect-render loop.

use crate::config::SessionConfig;
use crate::detector::MultiDetector;
use crate::error::Result;
use crate::models::TuningState;
use crate::process_frame;
use crate::render::compose_side_by_side;
use crate::sink::{DisplaySink, FrameSaver};
use crate::source::FrameSource;

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The quit key was pressed
    Quit,
    /// The source ran out of frames or failed to deliver one
    EndOfStream,
}

/// What happened over a whole session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Iterations that acquired and displayed a frame
    pub frames: usize,
    /// Frames written to disk
    pub saved: u32,
    /// Frame writes that failed
    pub save_failures: usize,
    /// Threshold when the loop stopped
    pub final_threshold: u8,
    /// Why the loop stopped
    pub stop_reason: StopReason,
}

/// Owns every handle a tuning run needs.
///
/// Source and display are released when the session is dropped, whichever
/// way the loop ends.
pub struct Session<S, D, W>
where
    S: FrameSource,
    D: MultiDetector,
    W: DisplaySink,
{
    config: SessionConfig,
    source: S,
    detector: D,
    display: W,
    saver: Option<FrameSaver>,
    state: TuningState,
    frames: usize,
    save_failures: usize,
    closed: bool,
}

impl<S, D, W> Session<S, D, W>
where
    S: FrameSource,
    D: MultiDetector,
    W: DisplaySink,
{
    /// Validate the config and prepare the output directory when saving.
    pub fn new(config: SessionConfig, source: S, detector: D, display: W) -> Result<Self> {
        config.validate()?;
        let saver = if config.save_frames {
            Some(FrameSaver::create(&config.out_dir)?)
        } else {
            None
        };
        let state = TuningState::new(config.initial_threshold);

        Ok(Self {
            config,
            source,
            detector,
            display,
            saver,
            state,
            frames: 0,
            save_failures: 0,
            closed: false,
        })
    }

    fn log_banner(&self) {
        let keys = &self.config.keys;
        if let Some((w, h)) = self.source.frame_size() {
            let scale = self.config.display_scale;
            log::info!(
                "Display size ({}, {})",
                (w as f32 * scale) as u32,
                (h as f32 * scale) as u32
            );
        }
        log::info!("Key");
        log::info!("  [{}]: Exit", keys.quit);
        log::info!("  [{}]: Thresh += {}", keys.increase, self.config.threshold_step);
        log::info!("  [{}]: Thresh -= {}", keys.decrease, self.config.threshold_step);
    }

    /// Run one iteration. `Some(reason)` means the loop is over.
    pub fn step(&mut self) -> Result<Option<StopReason>> {
        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::warn!("camera frame not found");
                return Ok(Some(StopReason::EndOfStream));
            }
            Err(err) => {
                log::warn!("frame acquisition failed, stopping: {err}");
                return Ok(Some(StopReason::EndOfStream));
            }
        };

        let threshold = self.state.threshold();
        let (rendered, _) = process_frame(&frame, &mut self.detector, threshold as i32);
        let composite = compose_side_by_side(&frame, &rendered, self.config.display_scale);
        self.display.show(&composite)?;
        self.frames += 1;

        let key = self.display.poll_key(self.config.poll_interval)?;
        let (keep_going, next) =
            self.config
                .keys
                .apply(key, self.state, self.config.threshold_step);
        if next != self.state {
            log::info!("Thresh: {}", next.threshold());
        }
        self.state = next;
        if !keep_going {
            return Ok(Some(StopReason::Quit));
        }

        if let Some(saver) = self.saver.as_mut() {
            match saver.save(&composite) {
                Ok(path) => log::debug!("saved {}", path.display()),
                Err(err) => {
                    self.save_failures += 1;
                    log::warn!("failed to save {}: {err}", saver.next_path().display());
                }
            }
        }

        Ok(None)
    }

    /// Loop until quit or end of stream
    pub fn run(mut self) -> Result<SessionSummary> {
        self.log_banner();
        let stop_reason = loop {
            if let Some(reason) = self.step()? {
                break reason;
            }
        };
        log::info!(
            "Session stopped ({:?}) after {} frame(s)",
            stop_reason,
            self.frames
        );

        Ok(SessionSummary {
            frames: self.frames,
            saved: self.saver.as_ref().map_or(0, FrameSaver::saved),
            save_failures: self.save_failures,
            final_threshold: self.state.threshold(),
            stop_reason,
        })
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.display.close();
        self.source.release();
    }
}

impl<S, D, W> Drop for Session<S, D, W>
where
    S: FrameSource,
    D: MultiDetector,
    W: DisplaySink,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
