//! Bird data structures.

use crate::core::BirdConfig;
use serde::{Deserialize, Serialize};

/// Where an agent is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    /// Receives decisions and is tested against pipes.
    Alive,
    /// Hit a pipe and is falling to the ground without input.
    Crashed,
    /// Excluded from every further tick.
    Dead,
}

/// One bird instance.
#[derive(Debug, Clone)]
pub struct Bird {
    /// Fixed for the bird's lifetime.
    pub x: f64,
    /// Top edge of the sprite; grows downward.
    pub y: f64,
    /// Velocity set by the last jump (0 before the first one).
    pub velocity: f64,
    /// Degrees, positive = nose up.
    pub tilt: f64,
    /// Ticks since the last jump (or since spawn).
    pub tick_count: u32,
    /// `y` at the last jump.
    pub height: f64,
    pub status: AgentStatus,

    // Animation
    /// Ticks into the current flap cycle.
    pub img_count: u32,
    /// Current animation frame index.
    pub frame: usize,
}

impl Bird {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tilt: 0.0,
            tick_count: 0,
            height: y,
            status: AgentStatus::Alive,
            img_count: 0,
            frame: 0,
        }
    }

    /// Bird at the configured spawn point.
    pub fn spawn(config: &BirdConfig) -> Self {
        Self::new(config.spawn_x, config.spawn_y)
    }

    pub fn is_alive(&self) -> bool {
        self.status == AgentStatus::Alive
    }

    /// Alive or crashed: still moving under physics.
    pub fn is_active(&self) -> bool {
        self.status != AgentStatus::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_defaults() {
        let bird = Bird::spawn(&BirdConfig::default());
        assert!((bird.x - 230.0).abs() < f64::EPSILON);
        assert!((bird.y - 350.0).abs() < f64::EPSILON);
        assert!((bird.height - bird.y).abs() < f64::EPSILON);
        assert_eq!(bird.tick_count, 0);
        assert_eq!(bird.status, AgentStatus::Alive);
        assert!(bird.is_alive());
        assert!(bird.is_active());
    }

    #[test]
    fn test_crashed_is_active_but_not_alive() {
        let mut bird = Bird::new(0.0, 0.0);
        bird.status = AgentStatus::Crashed;
        assert!(!bird.is_alive());
        assert!(bird.is_active());
        bird.status = AgentStatus::Dead;
        assert!(!bird.is_active());
    }
}
