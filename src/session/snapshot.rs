//! Read-only per-tick view handed to render collaborators.

use super::types::{OverReason, SessionState};
use crate::bird::AgentStatus;
use crate::floor::Floor;
use crate::pipe::GapGeometry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub tilt: f64,
    /// Animation frame to draw.
    pub frame: usize,
    pub status: AgentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeView {
    pub x: f64,
    pub gap_center: f64,
    pub top: f64,
    pub bottom: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub frame: u64,
    pub score: u32,
    pub state: SessionState,
    pub over_reason: Option<OverReason>,
    /// Set by training harnesses.
    pub generation: Option<u32>,
    pub live_count: usize,
    pub agents: Vec<AgentView>,
    pub pipes: Vec<PipeView>,
    pub floor: Floor,
    /// Gap currently fed to decision functions.
    pub lookahead: Option<GapGeometry>,
}

impl SessionSnapshot {
    /// Agents that should still be drawn (alive or falling).
    pub fn visible_agents(&self) -> impl Iterator<Item = &AgentView> {
        self.agents
            .iter()
            .filter(|a| a.status != AgentStatus::Dead)
    }
}
