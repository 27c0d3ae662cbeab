//! Flappy - deterministic Flappy Bird simulation core.
//!
//! The same tick-based world runs a single human-controlled bird or a whole
//! population of agents driven by trained decision functions. Rendering,
//! audio, input and persistence of trained agents sit behind small traits so
//! the core stays headless and reproducible under a seeded RNG.

pub mod audio;
pub mod bird;
pub mod collision;
pub mod core;
pub mod decision;
pub mod export;
pub mod floor;
pub mod pipe;
pub mod population;
pub mod session;
pub mod sprites;
pub mod stop;

pub use audio::{AudioEvent, AudioPort, LoggingAudio, NullAudio};
pub use bird::{AgentStatus, Bird};
pub use crate::core::{ConfigError, CrashBehavior, DecisionError, GameConfig};
pub use decision::{
    DecisionFunction, DecisionSource, FeedForwardNet, FnDecision, KeyboardDecision, Observation,
    TrainedDecision,
};
pub use export::{ExportPort, JsonFileExport, MemoryExport, NoExport};
pub use floor::Floor;
pub use pipe::{GapGeometry, Pipe};
pub use population::FitnessLedger;
pub use session::{Session, SessionSnapshot, SessionState, TickEvent, TickResult};
pub use sprites::SpriteSet;
pub use stop::StopSignal;
