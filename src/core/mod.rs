//! Configuration, tunable defaults and error types shared by every component.

pub mod config;
pub mod constants;
pub mod error;

pub use config::{BirdConfig, CrashBehavior, FloorConfig, GameConfig, PipeConfig, RulesConfig, WorldConfig};
pub use error::{ConfigError, DecisionError};
