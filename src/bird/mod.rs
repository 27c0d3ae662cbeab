//! The bird agent: kinematics, tilt and flap animation.
//!
//! Motion uses a closed-form projectile formula over the integer number of
//! ticks since the last jump, so a run is fully determined by its inputs and
//! tied to the tick rate rather than wall-clock time.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
