//! Inference seam between trained policies and their callers

use std::sync::Arc;

use rand::RngCore;

use autoscale_rl_core::{Policy, RLError, Result};
use autoscale_rl_env::{CloudObservation, ScalingAction};

/// A trained decision function over cloud observations.
///
/// Implementations are immutable after construction so a single instance
/// can serve concurrent callers without locking.
pub trait InferencePolicy: Send + Sync {
    /// Raw action code for `observation`.
    ///
    /// `rng` of `None` asks for the deterministic choice; `Some` lets
    /// stochastic policies sample. The code is not guaranteed to be a known
    /// [`ScalingAction`]; callers decide how to treat anything else.
    fn predict(&self, observation: &CloudObservation, rng: Option<&mut dyn RngCore>) -> Result<u32>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

impl<P: InferencePolicy + ?Sized> InferencePolicy for Arc<P> {
    fn predict(&self, observation: &CloudObservation, rng: Option<&mut dyn RngCore>) -> Result<u32> {
        (**self).predict(observation, rng)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Drives environment rollouts with a trained policy.
///
/// Codes outside the action set are reported as [`RLError::InvalidAction`];
/// a rollout cannot step with an action it does not understand.
pub struct ArtifactPolicy {
    inner: Arc<dyn InferencePolicy>,
    deterministic: bool,
}

impl ArtifactPolicy {
    /// Wrap `inner`; `deterministic` selects greedy inference
    pub fn new(inner: Arc<dyn InferencePolicy>, deterministic: bool) -> Self {
        Self { inner, deterministic }
    }
}

impl Policy for ArtifactPolicy {
    type Observation = CloudObservation;
    type Action = ScalingAction;

    fn act(&self, observation: &CloudObservation, rng: &mut dyn RngCore) -> Result<ScalingAction> {
        let sampler = if self.deterministic { None } else { Some(rng) };
        let code = self.inner.predict(observation, sampler)?;
        ScalingAction::from_code(code).ok_or_else(|| {
            RLError::InvalidAction(format!(
                "policy {} returned unknown action code {code}",
                self.inner.describe()
            ))
        })
    }
}
