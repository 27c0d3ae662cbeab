//! Sprite geometry the simulation needs: collision masks and sizes.
//!
//! Image decoding belongs to the asset loader; it hands the core either
//! masks built with [`Mask::from_rgba`] or uses [`SpriteSet::default`], a
//! procedural set sized like the reference art.

use crate::collision::Mask;
use crate::core::constants::*;
use crate::core::ConfigError;

#[derive(Debug, Clone)]
pub struct SpriteSet {
    /// Flap animation frames; all share the first frame's size.
    bird_frames: Vec<Mask>,
    /// Pipe with its opening at the top.
    pipe_bottom: Mask,
    /// Same pipe flipped, opening at the bottom.
    pipe_top: Mask,
    floor_width: u32,
}

impl Default for SpriteSet {
    fn default() -> Self {
        let bird = Mask::ellipse(BIRD_WIDTH, BIRD_HEIGHT);
        Self {
            bird_frames: vec![bird; BIRD_FRAMES],
            pipe_bottom: pipe_mask(PIPE_WIDTH, PIPE_HEIGHT, PIPE_LIP_HEIGHT, PIPE_BODY_INSET),
            pipe_top: pipe_mask(PIPE_WIDTH, PIPE_HEIGHT, PIPE_LIP_HEIGHT, PIPE_BODY_INSET)
                .flipped_vertical(),
            floor_width: FLOOR_WIDTH,
        }
    }
}

impl SpriteSet {
    /// Build a sprite set from loaded masks. The top pipe is the bottom pipe
    /// flipped vertically.
    pub fn new(
        bird_frames: Vec<Mask>,
        pipe_bottom: Mask,
        floor_width: u32,
    ) -> Result<Self, ConfigError> {
        let first = bird_frames
            .first()
            .ok_or_else(|| ConfigError::sprite("at least one bird frame is required"))?;
        if first.is_empty() {
            return Err(ConfigError::sprite("bird frame has zero size"));
        }
        if bird_frames
            .iter()
            .any(|f| f.width() != first.width() || f.height() != first.height())
        {
            return Err(ConfigError::sprite("bird frames differ in size"));
        }
        if pipe_bottom.is_empty() {
            return Err(ConfigError::sprite("pipe mask has zero size"));
        }
        if floor_width == 0 {
            return Err(ConfigError::sprite("floor width must be non-zero"));
        }
        let pipe_top = pipe_bottom.flipped_vertical();
        Ok(Self {
            bird_frames,
            pipe_bottom,
            pipe_top,
            floor_width,
        })
    }

    pub fn bird_frame_count(&self) -> usize {
        self.bird_frames.len()
    }

    /// Mask of animation frame `index`, wrapping if the set has fewer frames.
    pub fn bird_mask(&self, index: usize) -> &Mask {
        &self.bird_frames[index % self.bird_frames.len()]
    }

    pub fn bird_width(&self) -> u32 {
        self.bird_frames[0].width()
    }

    pub fn bird_height(&self) -> u32 {
        self.bird_frames[0].height()
    }

    pub fn pipe_top(&self) -> &Mask {
        &self.pipe_top
    }

    pub fn pipe_bottom(&self) -> &Mask {
        &self.pipe_bottom
    }

    pub fn pipe_width(&self) -> u32 {
        self.pipe_bottom.width()
    }

    pub fn pipe_height(&self) -> u32 {
        self.pipe_bottom.height()
    }

    pub fn floor_width(&self) -> u32 {
        self.floor_width
    }
}

/// Pipe standing upright: a full-width lip on the first `lip_height` rows and
/// a body inset by `inset` pixels on each side below it.
pub fn pipe_mask(width: u32, height: u32, lip_height: u32, inset: u32) -> Mask {
    Mask::from_fn(width, height, |x, y| {
        y < lip_height || (x >= inset && x + inset < width)
    })
}
