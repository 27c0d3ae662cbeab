//! Pipe data structures.

use crate::core::{GameConfig, PipeConfig};
use crate::sprites::SpriteSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Vertical extent of a pipe's gap, as seen by decision functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapGeometry {
    /// Bottom edge of the top pipe.
    pub upper: f64,
    /// Top edge of the bottom pipe.
    pub lower: f64,
}

/// One pipe pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge, shared by both pipes.
    pub x: f64,
    /// Upper edge of the gap, drawn once at construction.
    pub gap_center: f64,
    /// Y of the top pipe sprite's origin (`gap_center - pipe height`).
    pub top: f64,
    /// Y of the bottom pipe sprite's origin (`gap_center + gap`).
    pub bottom: f64,
    /// Set once an agent has moved past `x`; never cleared.
    pub passed: bool,
}

impl Pipe {
    /// New pipe at `x` with a gap-center drawn uniformly from the configured
    /// range.
    pub fn create<R: Rng>(x: f64, config: &PipeConfig, sprites: &SpriteSet, rng: &mut R) -> Self {
        let gap_center = rng.gen_range(config.gap_center_min..config.gap_center_max) as f64;
        Self::with_gap_center(x, gap_center, config.gap, sprites.pipe_height())
    }

    /// Pipe with a fixed gap-center.
    pub fn with_gap_center(x: f64, gap_center: f64, gap: f64, pipe_height: u32) -> Self {
        Self {
            x,
            gap_center,
            top: gap_center - pipe_height as f64,
            bottom: gap_center + gap,
            passed: false,
        }
    }

    pub fn gap(&self) -> GapGeometry {
        GapGeometry {
            upper: self.gap_center,
            lower: self.bottom,
        }
    }

    /// The pipe present when a session starts.
    pub fn first<R: Rng>(config: &GameConfig, sprites: &SpriteSet, rng: &mut R) -> Self {
        Self::create(config.pipe.first_x, &config.pipe, sprites, rng)
    }
}
