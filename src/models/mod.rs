//! Plain data types shared across the loop

/// Detector output: per-symbol text, corners and patch
pub mod detection;
/// Points and corner quads
pub mod point;
/// Threshold state and key bindings
pub mod tuning;

pub use detection::{Detection, DetectionResult};
pub use point::{Point, Quad};
pub use tuning::{Control, KeyBindings, TuningState, apply_control};
