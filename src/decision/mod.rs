//! Decision sources: who decides whether an agent jumps this tick.
//!
//! The session is written once against [`DecisionSource`]. A human player is
//! plugged in through [`KeyboardDecision`]; trained agents through
//! [`TrainedDecision`] wrapping one [`DecisionFunction`] per agent.

pub mod keyboard;
pub mod network;
pub mod trained;

pub use crate::pipe::GapGeometry;
pub use keyboard::KeyboardDecision;
pub use network::FeedForwardNet;
pub use trained::{FnDecision, TrainedDecision};

use crate::core::DecisionError;

/// What an agent can see when deciding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Index of the agent in the session's population.
    pub agent: usize,
    pub y: f64,
    /// Gap of the lookahead pipe, or `None` if no pipe has ever been seen.
    pub gap: Option<GapGeometry>,
}

impl Observation {
    /// `(y, |y - gap upper|, |y - gap lower|)`, the inputs trained functions
    /// are fed.
    pub fn inputs(&self) -> Option<[f64; 3]> {
        self.gap.map(|gap| {
            [
                self.y,
                (self.y - gap.upper).abs(),
                (self.y - gap.lower).abs(),
            ]
        })
    }
}

/// Supplies jump decisions, one per live agent per tick.
pub trait DecisionSource {
    /// Called once at the start of every tick, before any `decide`.
    fn begin_tick(&mut self) {}

    /// Whether the observed agent jumps this tick. Errors count as "no jump"
    /// for that agent only.
    fn decide(&mut self, observation: &Observation) -> Result<bool, DecisionError>;

    /// The function driving `agent`, if this source has one to export.
    fn decision_function(&self, _agent: usize) -> Option<&dyn DecisionFunction> {
        None
    }
}

/// Scalar-output function from observation inputs, e.g. a trained network.
pub trait DecisionFunction {
    fn activate(&self, inputs: &[f64]) -> Result<f64, DecisionError>;

    /// Serializable form for export collaborators, when one exists.
    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }
}
