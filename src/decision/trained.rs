//! Adapter driving each agent from its own decision function.

use super::{DecisionFunction, DecisionSource, Observation};
use crate::core::constants::JUMP_THRESHOLD;
use crate::core::DecisionError;

/// One decision function per agent, indexed like the session's population.
/// An agent jumps when its function's output exceeds the threshold.
#[derive(Debug, Clone)]
pub struct TrainedDecision<F> {
    functions: Vec<F>,
    threshold: f64,
}

impl<F: DecisionFunction> TrainedDecision<F> {
    pub fn new(functions: Vec<F>) -> Self {
        Self {
            functions,
            threshold: JUMP_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn function(&self, agent: usize) -> Option<&F> {
        self.functions.get(agent)
    }

    pub fn into_functions(self) -> Vec<F> {
        self.functions
    }
}

impl<F: DecisionFunction> DecisionSource for TrainedDecision<F> {
    fn decide(&mut self, observation: &Observation) -> Result<bool, DecisionError> {
        let function = self
            .functions
            .get(observation.agent)
            .ok_or(DecisionError::UnknownAgent(observation.agent))?;

        // Nothing to steer by yet
        let Some(inputs) = observation.inputs() else {
            return Ok(false);
        };

        let output = function.activate(&inputs)?;
        if !output.is_finite() {
            return Err(DecisionError::NonFinite(output));
        }
        Ok(output > self.threshold)
    }

    fn decision_function(&self, agent: usize) -> Option<&dyn DecisionFunction> {
        self.functions
            .get(agent)
            .map(|f| f as &dyn DecisionFunction)
    }
}

/// Closure as a decision function.
pub struct FnDecision<F>(pub F);

impl<F> DecisionFunction for FnDecision<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn activate(&self, inputs: &[f64]) -> Result<f64, DecisionError> {
        Ok((self.0)(inputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::GapGeometry;

    type Boxed = FnDecision<Box<dyn Fn(&[f64]) -> f64>>;

    fn always(value: f64) -> Boxed {
        FnDecision(Box::new(move |_: &[f64]| value))
    }

    fn obs(agent: usize) -> Observation {
        Observation {
            agent,
            y: 300.0,
            gap: Some(GapGeometry {
                upper: 200.0,
                lower: 400.0,
            }),
        }
    }

    #[test]
    fn test_threshold() {
        let mut source = TrainedDecision::new(vec![always(0.9), always(0.5)]);
        assert_eq!(source.decide(&obs(0)), Ok(true));
        // Strictly greater than 0.5
        assert_eq!(source.decide(&obs(1)), Ok(false));
    }

    #[test]
    fn test_receives_observation_inputs() {
        let mut source = TrainedDecision::new(vec![FnDecision(|inputs: &[f64]| {
            if inputs == [300.0, 100.0, 100.0] {
                1.0
            } else {
                -1.0
            }
        })]);
        assert_eq!(source.decide(&obs(0)), Ok(true));
    }

    #[test]
    fn test_unknown_agent() {
        let mut source = TrainedDecision::new(vec![always(1.0)]);
        assert_eq!(source.decide(&obs(3)), Err(DecisionError::UnknownAgent(3)));
    }

    #[test]
    fn test_non_finite_output_is_an_error() {
        let mut source = TrainedDecision::new(vec![always(f64::NAN)]);
        assert!(matches!(
            source.decide(&obs(0)),
            Err(DecisionError::NonFinite(_))
        ));
    }

    #[test]
    fn test_no_gap_means_no_jump() {
        let mut source = TrainedDecision::new(vec![always(1.0)]);
        let mut observation = obs(0);
        observation.gap = None;
        assert_eq!(source.decide(&observation), Ok(false));
    }

    #[test]
    fn test_custom_threshold() {
        let mut source = TrainedDecision::new(vec![always(0.2)]).with_threshold(0.0);
        assert_eq!(source.decide(&obs(0)), Ok(true));
    }

    #[test]
    fn test_exposes_decision_function() {
        let source = TrainedDecision::new(vec![always(0.7)]);
        let function = source.decision_function(0).unwrap();
        assert_eq!(function.activate(&[0.0, 0.0, 0.0]), Ok(0.7));
        assert!(source.decision_function(1).is_none());
    }
}
