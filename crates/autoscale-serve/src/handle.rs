//! Resident policy handle

use std::sync::Arc;

use autoscale_rl_agent::{InferencePolicy, PolicyArtifact};
use autoscale_rl_env::CloudObservation;

use crate::decision::DecisionResponse;
use crate::error::Result;
use crate::ServeConfig;

/// Owner of the policy the service answers with.
///
/// Built once at startup and shared read-only by every request; inference
/// takes `&self` so no locking is involved.
pub struct PolicyHandle {
    policy: Arc<dyn InferencePolicy>,
    deterministic: bool,
}

impl PolicyHandle {
    /// Load the configured artifact. Any failure here is fatal to startup.
    pub async fn init(config: &ServeConfig) -> Result<Self> {
        let artifact = PolicyArtifact::load(&config.policy_path).await?;
        let handle = Self::from_policy(Arc::new(artifact), config.deterministic);
        tracing::info!(
            policy = %handle.describe(),
            deterministic = handle.deterministic,
            "policy handle initialized"
        );
        Ok(handle)
    }

    /// Wrap an already constructed policy
    pub fn from_policy(policy: Arc<dyn InferencePolicy>, deterministic: bool) -> Self {
        Self { policy, deterministic }
    }

    /// Whether decisions are greedy
    #[must_use]
    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    /// Description of the resident policy
    #[must_use]
    pub fn describe(&self) -> String {
        self.policy.describe()
    }

    /// Decide on one observation
    pub fn decide(&self, observation: &CloudObservation) -> Result<DecisionResponse> {
        let code = if self.deterministic {
            self.policy.predict(observation, None)?
        } else {
            let mut rng = rand::thread_rng();
            self.policy.predict(observation, Some(&mut rng))?
        };
        tracing::debug!(?observation, code, "decision");
        Ok(DecisionResponse::from_code(code))
    }

    /// Release the policy
    pub fn shutdown(self) {
        tracing::info!(policy = %self.policy.describe(), "policy handle released");
    }
}
