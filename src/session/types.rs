//! Session states and per-tick results.

use crate::core::DecisionError;
use serde::Serialize;

/// Controller state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// At least one agent is alive; the world scrolls.
    Running,
    /// No agent is alive but some crashed bird is still falling. The world is
    /// frozen and no decisions are taken.
    AgentDead,
    /// Nothing more will happen; further ticks are no-ops.
    SessionOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverReason {
    AllAgentsDead,
    ScoreCeiling,
    TickLimit,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeathCause {
    /// Retired on touching a pipe.
    Collision,
    Floor,
    Ceiling,
}

/// A single event produced by a tick.
///
/// Population bookkeeping (fitness, genome retirement) is driven from these
/// by the caller; the session itself keeps no per-agent score.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// Agent jumped.
    Flapped { agent: usize },
    /// Agent hit a pipe and now falls without input.
    Crashed { agent: usize },
    /// Agent is out of the session.
    Died { agent: usize, cause: DeathCause },
    /// A pipe was passed. `credited` lists every agent alive at that moment.
    Scored { score: u32, credited: Vec<usize> },
    /// A replacement pipe entered at the right boundary.
    PipeSpawned { x: f64, gap_center: f64 },
    /// A pipe scrolled off the left edge and was dropped.
    PipeRetired,
    /// The decision source failed for this agent; it did not jump.
    DecisionFailed { agent: usize, error: DecisionError },
    /// The score ceiling was hit; `exported` is the agent handed to the
    /// export port, if any.
    ScoreCeilingReached { score: u32, exported: Option<usize> },
    SessionOver { reason: OverReason },
}

/// Everything one call to `Session::tick` did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Frame number after this tick.
    pub frame: u64,
    /// Agents that received a decision and moved this tick.
    pub stepped: Vec<usize>,
    pub events: Vec<TickEvent>,
}

impl TickResult {
    pub fn scored(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, TickEvent::Scored { .. }))
    }

    /// Agents that left the session this tick, with the cause.
    pub fn deaths(&self) -> impl Iterator<Item = (usize, DeathCause)> + '_ {
        self.events.iter().filter_map(|e| match e {
            TickEvent::Died { agent, cause } => Some((*agent, *cause)),
            _ => None,
        })
    }

    pub fn session_over(&self) -> Option<OverReason> {
        self.events.iter().find_map(|e| match e {
            TickEvent::SessionOver { reason } => Some(*reason),
            _ => None,
        })
    }
}
