//! Feed-forward network policy
//!
//! Pure ndarray implementation: the network is a stack of dense layers with
//! a shared hidden activation and raw logits at the output. Weights are
//! serialized as part of the policy artifact.

use ndarray::{Array1, Array2, ArrayView1};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use autoscale_rl_core::{RLError, Result};
use autoscale_rl_env::CloudObservation;

use crate::InferencePolicy;

/// Hidden-layer activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Hyperbolic tangent
    Tanh,
    /// Rectified linear unit
    Relu,
    /// No activation
    Identity,
}

impl Activation {
    fn apply(self, x: &mut Array1<f32>) {
        match self {
            Self::Tanh => x.mapv_inplace(f32::tanh),
            Self::Relu => x.mapv_inplace(|v| v.max(0.0)),
            Self::Identity => {}
        }
    }
}

/// MLP (Multi-Layer Perceptron) policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpConfig {
    /// Input dimension
    pub input_dim: usize,
    /// Hidden layer sizes
    pub hidden_dims: Vec<usize>,
    /// Output dimension (one logit per action code)
    pub output_dim: usize,
    /// Activation function
    pub activation: Activation,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            input_dim: CloudObservation::DIM,
            hidden_dims: vec![64, 64],
            output_dim: 3,
            activation: Activation::Tanh,
        }
    }
}

/// Dense feed-forward policy network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpPolicy {
    config: MlpConfig,
    /// Weights for each layer, shaped `(in, out)`
    weights: Vec<Array2<f32>>,
    /// Biases for each layer
    biases: Vec<Array1<f32>>,
}

impl MlpPolicy {
    /// Create a new network with Xavier-initialized weights
    pub fn new(config: MlpConfig, rng: &mut dyn RngCore) -> Self {
        let mut weights = Vec::new();
        let mut biases = Vec::new();

        let mut prev_dim = config.input_dim;
        for &dim in config.hidden_dims.iter().chain(std::iter::once(&config.output_dim)) {
            weights.push(Self::xavier_init(prev_dim, dim, rng));
            biases.push(Array1::zeros(dim));
            prev_dim = dim;
        }

        Self {
            config,
            weights,
            biases,
        }
    }

    /// Build from explicit parameters, checking every layer shape
    pub fn from_parameters(config: MlpConfig, weights: Vec<Array2<f32>>, biases: Vec<Array1<f32>>) -> Result<Self> {
        let policy = Self {
            config,
            weights,
            biases,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Network configuration
    #[must_use]
    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// Check that the layer stack matches the configuration
    pub fn validate(&self) -> Result<()> {
        let layers = self.config.hidden_dims.len() + 1;
        if self.weights.len() != layers || self.biases.len() != layers {
            return Err(RLError::Policy(format!(
                "expected {layers} layers, found {} weight and {} bias tensors",
                self.weights.len(),
                self.biases.len()
            )));
        }

        let dims: Vec<usize> = std::iter::once(self.config.input_dim)
            .chain(self.config.hidden_dims.iter().copied())
            .chain(std::iter::once(self.config.output_dim))
            .collect();
        for (layer, pair) in dims.windows(2).enumerate() {
            let expected = (pair[0], pair[1]);
            if self.weights[layer].dim() != expected {
                return Err(RLError::Policy(format!(
                    "layer {layer} weights are {:?}, expected {expected:?}",
                    self.weights[layer].dim()
                )));
            }
            if self.biases[layer].len() != pair[1] {
                return Err(RLError::DimensionMismatch {
                    expected: pair[1],
                    actual: self.biases[layer].len(),
                });
            }
        }

        if self.config.output_dim == 0 {
            return Err(RLError::Policy("network has no outputs".into()));
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn xavier_init(in_dim: usize, out_dim: usize, rng: &mut dyn RngCore) -> Array2<f32> {
        let limit = (6.0 / (in_dim + out_dim) as f32).sqrt();
        Array2::from_shape_fn((in_dim, out_dim), |_| rng.gen_range(-limit..=limit))
    }

    /// Forward pass returning the output logits
    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        if input.len() != self.config.input_dim {
            return Err(RLError::DimensionMismatch {
                expected: self.config.input_dim,
                actual: input.len(),
            });
        }

        let mut hidden = input.to_owned();
        let last = self.weights.len() - 1;
        for (layer, (w, b)) in self.weights.iter().zip(&self.biases).enumerate() {
            hidden = hidden.dot(w) + b;
            // output layer stays linear
            if layer < last {
                self.config.activation.apply(&mut hidden);
            }
        }

        if hidden.iter().any(|v| !v.is_finite()) {
            return Err(RLError::Policy("network produced non-finite logits".into()));
        }
        Ok(hidden)
    }
}

fn argmax(logits: &Array1<f32>) -> usize {
    logits
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max_logit = logits.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp = logits.mapv(|x| (x - max_logit).exp());
    let sum = exp.sum();
    exp / sum
}

impl InferencePolicy for MlpPolicy {
    fn predict(&self, observation: &CloudObservation, rng: Option<&mut dyn RngCore>) -> Result<u32> {
        let features = observation.to_features();
        let logits = self.forward(ArrayView1::from(&features[..]))?;

        let index = match rng {
            None => argmax(&logits),
            Some(rng) => {
                let probs = softmax(&logits);
                let dist = WeightedIndex::new(probs.iter().copied())
                    .map_err(|err| RLError::Policy(format!("cannot sample from logits: {err}")))?;
                dist.sample(rng)
            }
        };

        u32::try_from(index).map_err(|_| RLError::Policy(format!("action index {index} overflows u32")))
    }

    fn describe(&self) -> String {
        format!(
            "mlp {}x{:?}x{} ({:?})",
            self.config.input_dim, self.config.hidden_dims, self.config.output_dim, self.config.activation
        )
    }
}
