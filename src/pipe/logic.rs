//! Pipe movement, lifecycle checks and collision.

use super::types::Pipe;
use crate::collision::Mask;
use crate::core::PipeConfig;
use crate::sprites::SpriteSet;

impl Pipe {
    /// Scroll left by the pipe velocity.
    pub fn advance_tick(&mut self, config: &PipeConfig) {
        self.x -= config.velocity;
    }

    /// The right edge has scrolled past the left boundary.
    pub fn is_off_screen(&self, sprites: &SpriteSet) -> bool {
        self.x + (sprites.pipe_width() as f64) < 0.0
    }

    /// Mark the pipe passed when `agent_x` is beyond its left edge.
    ///
    /// Returns true only on the call that flips `passed`; later calls return
    /// false and `passed` stays set.
    pub fn has_been_passed(&mut self, agent_x: f64) -> bool {
        if !self.passed && agent_x > self.x {
            self.passed = true;
            return true;
        }
        false
    }

    /// Pixel-exact test of a bird sprite at (`bird_x`, `bird_y`) against both
    /// pipes.
    pub fn overlaps(&self, bird_mask: &Mask, bird_x: f64, bird_y: f64, sprites: &SpriteSet) -> bool {
        let origin_x = bird_x.round() as i32;
        let origin_y = bird_y.round() as i32;
        let dx = self.x.round() as i32 - origin_x;
        let top_offset = (dx, self.top.round() as i32 - origin_y);
        let bottom_offset = (dx, self.bottom.round() as i32 - origin_y);

        bird_mask.overlaps(sprites.pipe_bottom(), bottom_offset)
            || bird_mask.overlaps(sprites.pipe_top(), top_offset)
    }
}
