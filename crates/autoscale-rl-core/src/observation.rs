//! Observation representations and observation spaces

use std::fmt::Debug;

/// Trait for observations from an environment
pub trait Observation: Clone + Debug + Send + Sync {
    /// Convert observation to a feature vector
    fn to_vec(&self) -> Vec<f64>;

    /// Get the shape of the observation
    fn shape(&self) -> Vec<usize>;
}

/// Trait for defining observation spaces
pub trait ObservationSpace: Send + Sync {
    /// The type of observations in this space
    type Observation: Observation;

    /// Check if an observation is valid within this space
    fn contains(&self, obs: &Self::Observation) -> bool;

    /// Get the shape of observations in this space
    fn shape(&self) -> Vec<usize>;
}

/// Box observation space. Bounds may be infinite.
#[derive(Debug, Clone)]
pub struct BoxObservationSpace<O> {
    /// Lower bounds
    pub low: Vec<f64>,
    /// Upper bounds
    pub high: Vec<f64>,
    _observation: std::marker::PhantomData<fn() -> O>,
}

impl<O> BoxObservationSpace<O> {
    /// Create a new box observation space
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> crate::Result<Self> {
        if low.len() != high.len() {
            return Err(crate::RLError::DimensionMismatch {
                expected: low.len(),
                actual: high.len(),
            });
        }
        Ok(Self {
            low,
            high,
            _observation: std::marker::PhantomData,
        })
    }
}

impl<O: Observation> ObservationSpace for BoxObservationSpace<O> {
    type Observation = O;

    fn contains(&self, obs: &Self::Observation) -> bool {
        let data = obs.to_vec();
        data.len() == self.low.len()
            && data
                .iter()
                .zip(&self.low)
                .zip(&self.high)
                .all(|((x, l), h)| x >= l && x <= h)
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.low.len()]
    }
}
