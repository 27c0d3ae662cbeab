//! Scrolling floor made of two tiled segments.

use crate::core::FloorConfig;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Floor {
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
    pub width: f64,
}

impl Floor {
    /// Segments start side by side at x = 0 and x = `width`.
    pub fn new(y: f64, width: u32) -> Self {
        let width = width as f64;
        Self {
            y,
            x1: 0.0,
            x2: width,
            width,
        }
    }

    /// Scroll both segments; one whose right edge has left the screen jumps
    /// to the right of the other.
    pub fn advance_tick(&mut self, config: &FloorConfig) {
        self.x1 -= config.velocity;
        self.x2 -= config.velocity;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}
