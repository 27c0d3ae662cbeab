//! Small fully-connected tanh network usable as a decision function.

use super::DecisionFunction;
use crate::core::DecisionError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One dense layer: `weights[out][in]`, one bias per output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl Layer {
    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn outputs(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                (sum + bias).tanh()
            })
            .collect()
    }
}

/// Feed-forward network with tanh activation on every layer. The first
/// output is the decision value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardNet {
    layers: Vec<Layer>,
}

impl FeedForwardNet {
    /// Build from explicit layers, checking that consecutive shapes line up.
    pub fn new(layers: Vec<Layer>) -> Result<Self, DecisionError> {
        if layers.is_empty() {
            return Err(DecisionError::ShapeMismatch {
                expected: 1,
                actual: 0,
            });
        }
        for layer in &layers {
            if layer.weights.len() != layer.outputs() {
                return Err(DecisionError::ShapeMismatch {
                    expected: layer.outputs(),
                    actual: layer.weights.len(),
                });
            }
            if let Some(row) = layer.weights.iter().find(|r| r.len() != layer.inputs()) {
                return Err(DecisionError::ShapeMismatch {
                    expected: layer.inputs(),
                    actual: row.len(),
                });
            }
        }
        for pair in layers.windows(2) {
            if pair[0].outputs() != pair[1].inputs() {
                return Err(DecisionError::ShapeMismatch {
                    expected: pair[0].outputs(),
                    actual: pair[1].inputs(),
                });
            }
        }
        Ok(Self { layers })
    }

    /// Random weights and biases in [-1, 1) for layer sizes like `[3, 4, 1]`.
    pub fn random<R: Rng>(sizes: &[usize], rng: &mut R) -> Self {
        let layers = sizes
            .windows(2)
            .map(|pair| {
                let (inputs, outputs) = (pair[0], pair[1]);
                Layer {
                    weights: (0..outputs)
                        .map(|_| (0..inputs).map(|_| rng.gen_range(-1.0..1.0)).collect())
                        .collect(),
                    biases: (0..outputs).map(|_| rng.gen_range(-1.0..1.0)).collect(),
                }
            })
            .collect();
        Self { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::inputs)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::outputs)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Run all layers and return every output.
    pub fn forward(&self, inputs: &[f64]) -> Result<Vec<f64>, DecisionError> {
        if inputs.len() != self.input_size() {
            return Err(DecisionError::ShapeMismatch {
                expected: self.input_size(),
                actual: inputs.len(),
            });
        }
        let mut values = inputs.to_vec();
        for layer in &self.layers {
            values = layer.forward(&values);
        }
        Ok(values)
    }
}

impl DecisionFunction for FeedForwardNet {
    fn activate(&self, inputs: &[f64]) -> Result<f64, DecisionError> {
        let outputs = self.forward(inputs)?;
        outputs.first().copied().ok_or(DecisionError::ShapeMismatch {
            expected: 1,
            actual: 0,
        })
    }

    fn to_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}
