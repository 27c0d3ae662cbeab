//! Fitness bookkeeping for a population of trained agents, driven by tick
//! results.

use crate::session::{DeathCause, TickEvent, TickResult};

/// Reward for surviving one tick.
pub const SURVIVAL_REWARD: f64 = 0.1;
/// Penalty for touching a pipe.
pub const COLLISION_PENALTY: f64 = 1.0;
/// Reward for every agent alive when a pipe is passed.
pub const SCORE_REWARD: f64 = 5.0;

/// Per-agent fitness accumulated over one session.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessLedger {
    fitness: Vec<f64>,
    pub survival_reward: f64,
    pub collision_penalty: f64,
    pub score_reward: f64,
}

impl FitnessLedger {
    pub fn new(size: usize) -> Self {
        Self {
            fitness: vec![0.0; size],
            survival_reward: SURVIVAL_REWARD,
            collision_penalty: COLLISION_PENALTY,
            score_reward: SCORE_REWARD,
        }
    }

    /// Apply one tick: survival for every agent that stepped, a penalty per
    /// collision, and the score reward for every credited agent.
    pub fn apply(&mut self, result: &TickResult) {
        for &agent in &result.stepped {
            self.add(agent, self.survival_reward);
        }
        for event in &result.events {
            match event {
                TickEvent::Crashed { agent }
                | TickEvent::Died {
                    agent,
                    cause: DeathCause::Collision,
                } => self.add(*agent, -self.collision_penalty),
                TickEvent::Scored { credited, .. } => {
                    for &agent in credited {
                        self.add(agent, self.score_reward);
                    }
                }
                _ => {}
            }
        }
    }

    fn add(&mut self, agent: usize, amount: f64) {
        if let Some(f) = self.fitness.get_mut(agent) {
            *f += amount;
        }
    }

    pub fn fitness(&self, agent: usize) -> Option<f64> {
        self.fitness.get(agent).copied()
    }

    pub fn all(&self) -> &[f64] {
        &self.fitness
    }

    /// Fittest agent; ties go to the lowest index.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.fitness
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, f)| match best {
                Some((_, b)) if b >= f => best,
                _ => Some((i, f)),
            })
    }

    pub fn mean(&self) -> f64 {
        if self.fitness.is_empty() {
            return 0.0;
        }
        self.fitness.iter().sum::<f64>() / self.fitness.len() as f64
    }
}
