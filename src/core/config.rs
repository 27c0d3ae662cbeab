//! Session configuration.
//!
//! Every tunable lives here and is handed to components by reference; no
//! component keeps its own copy of window sizes or speeds.

use super::constants::*;
use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Window and floor placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    /// Top edge of the floor.
    pub floor_y: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WIN_WIDTH,
            height: WIN_HEIGHT,
            floor_y: FLOOR_Y,
        }
    }
}

/// Agent spawn point, kinematics and tilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub spawn_x: f64,
    pub spawn_y: f64,
    /// Velocity set by a jump (negative = upward).
    pub jump_velocity: f64,
    /// Downward acceleration in units/tick².
    pub gravity: f64,
    /// Cap on per-tick displacement magnitude.
    pub terminal_velocity: f64,
    /// Extra upward nudge applied to any upward displacement.
    pub upward_bias: f64,
    pub max_tilt: f64,
    pub min_tilt: f64,
    /// Degrees removed per tick while nose-diving.
    pub rotation_step: f64,
    /// The bird keeps its upward tilt until it falls this far below the
    /// height it last jumped from.
    pub tilt_hold_distance: f64,
    /// Ticks each flap animation frame is shown.
    pub animation_ticks: u32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            spawn_x: BIRD_SPAWN_X,
            spawn_y: BIRD_SPAWN_Y,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            upward_bias: UPWARD_BIAS,
            max_tilt: MAX_TILT,
            min_tilt: MIN_TILT,
            rotation_step: ROTATION_STEP,
            tilt_hold_distance: TILT_HOLD_DISTANCE,
            animation_ticks: ANIMATION_TICKS,
        }
    }
}

/// Pipe placement and speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    /// Vertical opening between the top and bottom pipe.
    pub gap: f64,
    /// Gap-center is drawn from `gap_center_min..gap_center_max`.
    pub gap_center_min: i32,
    pub gap_center_max: i32,
    /// Units scrolled left per tick.
    pub velocity: f64,
    /// X of the pipe present at session start.
    pub first_x: f64,
    /// X of every later pipe. `None` spawns at the window's right edge.
    pub spawn_x: Option<f64>,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            gap: PIPE_GAP,
            gap_center_min: GAP_CENTER_MIN,
            gap_center_max: GAP_CENTER_MAX,
            velocity: PIPE_VELOCITY,
            first_x: FIRST_PIPE_X,
            spawn_x: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub velocity: f64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            velocity: FLOOR_VELOCITY,
        }
    }
}

/// What happens to an agent that touches a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashBehavior {
    /// The world freezes and the bird falls, without input, until it hits
    /// the floor.
    FallToGround,
    /// The agent is retired immediately.
    Remove,
}

/// Out-of-bounds checks, crash handling and the score ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Kill agents whose sprite bottom (less `floor_margin`) reaches the floor.
    pub check_floor: bool,
    /// Kill agents that rise above `ceiling_y`.
    pub check_ceiling: bool,
    pub floor_margin: f64,
    pub ceiling_y: f64,
    pub crash: CrashBehavior,
    /// The session ends, exporting the leading agent, once the score reaches
    /// this value.
    pub score_ceiling: Option<u32>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            check_floor: true,
            check_ceiling: true,
            floor_margin: FLOOR_MARGIN,
            ceiling_y: CEILING_Y,
            crash: CrashBehavior::Remove,
            score_ceiling: None,
        }
    }
}

/// Complete, immutable configuration of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub bird: BirdConfig,
    pub pipe: PipeConfig,
    pub floor: FloorConfig,
    pub rules: RulesConfig,
}

impl GameConfig {
    /// Human-played game: spawn near the top, fall to the ground after a crash.
    pub fn solo() -> Self {
        let mut config = Self::default();
        config.bird.spawn_y = SOLO_SPAWN_Y;
        config.rules.crash = CrashBehavior::FallToGround;
        config
    }

    /// Evolved population: crashed agents are retired and the run stops at
    /// the score ceiling.
    pub fn population() -> Self {
        let mut config = Self::default();
        config.rules.crash = CrashBehavior::Remove;
        config.rules.score_ceiling = Some(SCORE_CEILING);
        config
    }

    /// Read a (possibly partial) JSON config; missing keys keep defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_over(path, Self::default())
    }

    /// Read a (possibly partial) JSON config; missing keys keep the values
    /// of `base`, so a preset survives an empty file.
    pub fn load_over<P: AsRef<Path>>(path: P, base: Self) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_over(&raw, base)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Self::from_json_over(raw, Self::default())
    }

    pub fn from_json_over(raw: &str, base: Self) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(raw)?;
        let mut merged = serde_json::to_value(base)?;
        merge_json(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// X at which pipes spawn once the previous one is passed.
    pub fn pipe_spawn_x(&self) -> f64 {
        self.pipe.spawn_x.unwrap_or(self.world.width as f64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width == 0 || world.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: world.width,
                height: world.height,
            });
        }
        if !(0.0..=world.height as f64).contains(&world.floor_y) {
            return Err(ConfigError::FloorOutsideWindow {
                floor_y: world.floor_y,
                height: world.height,
            });
        }

        let pipe = &self.pipe;
        if pipe.gap_center_min >= pipe.gap_center_max {
            return Err(ConfigError::InvalidGapRange {
                min: pipe.gap_center_min,
                max: pipe.gap_center_max,
            });
        }
        positive("pipe gap", pipe.gap)?;
        positive("pipe velocity", pipe.velocity)?;
        positive("floor velocity", self.floor.velocity)?;

        let bird = &self.bird;
        positive("gravity", bird.gravity)?;
        positive("terminal velocity", bird.terminal_velocity)?;
        positive("rotation step", bird.rotation_step)?;
        if bird.jump_velocity >= 0.0 || !bird.jump_velocity.is_finite() {
            return Err(ConfigError::JumpVelocity(bird.jump_velocity));
        }
        let tilts_finite = bird.min_tilt.is_finite() && bird.max_tilt.is_finite();
        if !tilts_finite || bird.min_tilt >= bird.max_tilt {
            return Err(ConfigError::InvalidTiltRange {
                min: bird.min_tilt,
                max: bird.max_tilt,
            });
        }
        if bird.animation_ticks == 0 {
            return Err(ConfigError::ZeroAnimationTicks);
        }
        Ok(())
    }
}

/// Overlay `overrides` onto `base`, object keys recursively.
fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
