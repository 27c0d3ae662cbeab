//! Error types for session construction and decision sources.

use thiserror::Error;

/// Rejected configuration. Raised only while building a session or loading a
/// config file, never during a tick.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("gap-center range is empty: min {min} must be below max {max}")]
    InvalidGapRange { min: i32, max: i32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("jump velocity must be negative (upward), got {0}")]
    JumpVelocity(f64),

    #[error("tilt range is inverted: min {min} >= max {max}")]
    InvalidTiltRange { min: f64, max: f64 },

    #[error("window dimensions must be non-zero, got {width}x{height}")]
    EmptyWindow { width: u32, height: u32 },

    #[error("floor y {floor_y} lies outside the window height {height}")]
    FloorOutsideWindow { floor_y: f64, height: u32 },

    #[error("animation frame length must be at least one tick")]
    ZeroAnimationTicks,

    #[error("a session needs at least one agent")]
    EmptyPopulation,

    #[error("sprite error: {0}")]
    Sprite(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    #[must_use]
    pub fn sprite<S: Into<String>>(msg: S) -> Self {
        Self::Sprite(msg.into())
    }
}

/// A decision function could not produce a usable answer for one agent.
///
/// The session treats every variant as "no jump" for that agent only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("no decision function for agent {0}")]
    UnknownAgent(usize),

    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("decision output is not finite: {0}")]
    NonFinite(f64),
}
