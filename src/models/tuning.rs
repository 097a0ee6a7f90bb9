use crate::utils::binarization::clamp_threshold;

/// Default binarization threshold at session start
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Default amount one key press moves the threshold
pub const DEFAULT_STEP: i32 = 5;

/// Mutable session parameter adjusted from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TuningState {
    threshold: u8,
}

impl TuningState {
    /// Create a state, clamping the threshold into `[0, 255]`
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: clamp_threshold(threshold),
        }
    }

    /// Current threshold
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// New state moved by `delta`, clamped
    pub fn adjusted(self, delta: i32) -> Self {
        Self::new(self.threshold as i32 + delta)
    }
}

impl Default for TuningState {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Keyboard keys bound to session controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Stops the loop
    pub quit: char,
    /// Raises the threshold
    pub increase: char,
    /// Lowers the threshold
    pub decrease: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: 'q',
            increase: 'a',
            decrease: 'z',
        }
    }
}

/// What a polled key asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Stop the loop
    Quit,
    /// Raise the threshold by one step
    Increase,
    /// Lower the threshold by one step
    Decrease,
    /// Unbound key or no key at all
    Ignore,
}

impl KeyBindings {
    /// Map a polled key to a control
    pub fn control_for(&self, key: Option<char>) -> Control {
        match key {
            Some(k) if k == self.quit => Control::Quit,
            Some(k) if k == self.increase => Control::Increase,
            Some(k) if k == self.decrease => Control::Decrease,
            _ => Control::Ignore,
        }
    }

    /// Apply one polled key to the tuning state.
    ///
    /// Returns whether the loop should continue along with the new state.
    /// This is the only place a `TuningState` changes during a session.
    pub fn apply(&self, key: Option<char>, state: TuningState, step: i32) -> (bool, TuningState) {
        match self.control_for(key) {
            Control::Quit => (false, state),
            Control::Increase => (true, state.adjusted(step)),
            Control::Decrease => (true, state.adjusted(-step)),
            Control::Ignore => (true, state),
        }
    }
}

/// Apply a key with the default bindings and step
pub fn apply_control(key: Option<char>, state: TuningState) -> (bool, TuningState) {
    KeyBindings::default().apply(key, state, DEFAULT_STEP)
}
