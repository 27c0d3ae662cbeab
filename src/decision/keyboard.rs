//! Edge-triggered keyboard adapter.

use super::{DecisionSource, Observation};
use crate::core::DecisionError;

/// Turns key presses into jumps: one jump per press, no auto-repeat while the
/// key is held.
#[derive(Debug, Default, Clone)]
pub struct KeyboardDecision {
    held: bool,
    /// A press arrived since the last tick started.
    pending: bool,
    /// Latched for the tick in progress.
    jump_this_tick: bool,
}

impl KeyboardDecision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self) {
        if !self.held {
            self.pending = true;
        }
        self.held = true;
    }

    pub fn key_up(&mut self) {
        self.held = false;
    }

    /// Press and release, for input backends that report no key releases.
    pub fn tap(&mut self) {
        self.key_down();
        self.key_up();
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl DecisionSource for KeyboardDecision {
    fn begin_tick(&mut self) {
        self.jump_this_tick = self.pending;
        self.pending = false;
    }

    fn decide(&mut self, _observation: &Observation) -> Result<bool, DecisionError> {
        Ok(self.jump_this_tick)
    }
}
