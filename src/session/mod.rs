//! Game session: state machine, per-tick protocol and render snapshots.

pub mod logic;
pub mod snapshot;
pub mod types;

pub use logic::Session;
pub use snapshot::{AgentView, PipeView, SessionSnapshot};
pub use types::{DeathCause, OverReason, SessionState, TickEvent, TickResult};
