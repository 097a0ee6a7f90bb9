use crate::error::{Result, TunerError};
use crate::models::KeyBindings;
use crate::models::tuning::{DEFAULT_STEP, DEFAULT_THRESHOLD};
use std::path::PathBuf;
use std::time::Duration;

/// Default keyboard poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2);
/// Default directory for saved frames
pub const DEFAULT_OUT_DIR: &str = "out/video";
/// Default composite scale
pub const DEFAULT_DISPLAY_SCALE: f32 = 0.5;
/// Default window title
pub const DEFAULT_WINDOW_NAME: &str = "Camera frame";

/// Settings for one tuning session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Threshold at loop start; clamped into `[0, 255]`
    pub initial_threshold: i32,
    /// Amount one increase/decrease key moves the threshold
    pub threshold_step: i32,
    /// Bounded wait for a key press each iteration
    pub poll_interval: Duration,
    /// Where saved frames go
    pub out_dir: PathBuf,
    /// Write every displayed frame to `out_dir`
    pub save_frames: bool,
    /// Scale applied to the side-by-side composite
    pub display_scale: f32,
    /// Window title for windowed displays
    pub window_name: String,
    /// Key bindings
    pub keys: KeyBindings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_threshold: DEFAULT_THRESHOLD as i32,
            threshold_step: DEFAULT_STEP,
            poll_interval: DEFAULT_POLL_INTERVAL,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            save_frames: false,
            display_scale: DEFAULT_DISPLAY_SCALE,
            window_name: DEFAULT_WINDOW_NAME.to_string(),
            keys: KeyBindings::default(),
        }
    }
}

impl SessionConfig {
    /// Reject settings the loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.display_scale > 0.0 && self.display_scale.is_finite()) {
            return Err(TunerError::config(format!(
                "display scale must be positive, got {}",
                self.display_scale
            )));
        }
        if self.threshold_step == 0 {
            return Err(TunerError::config("threshold step must be non-zero"));
        }
        let KeyBindings {
            quit,
            increase,
            decrease,
        } = self.keys;
        if quit == increase || quit == decrease || increase == decrease {
            return Err(TunerError::config("key bindings must be distinct"));
        }
        Ok(())
    }
}
