//! Rule-based baseline policy

use rand::RngCore;
use serde::{Deserialize, Serialize};

use autoscale_rl_core::{RLError, Result};
use autoscale_rl_env::{CloudObservation, ScalingAction};

use crate::InferencePolicy;

/// Scale up above one load threshold, down below another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    /// Add a unit when per-unit load exceeds this
    pub scale_up_above: f64,
    /// Remove a unit when per-unit load falls below this
    pub scale_down_below: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            scale_up_above: 0.8,
            scale_down_below: 0.4,
        }
    }
}

impl ThresholdPolicy {
    /// Thresholds must be finite and ordered
    pub fn validate(&self) -> Result<()> {
        if !self.scale_up_above.is_finite() || !self.scale_down_below.is_finite() {
            return Err(RLError::Policy("thresholds must be finite".into()));
        }
        if self.scale_down_below > self.scale_up_above {
            return Err(RLError::Policy(format!(
                "scale_down_below {} exceeds scale_up_above {}",
                self.scale_down_below, self.scale_up_above
            )));
        }
        Ok(())
    }

    /// Rule decision for `observation`
    #[must_use]
    pub fn decide(&self, observation: &CloudObservation) -> ScalingAction {
        if observation.current_load > self.scale_up_above && observation.normalized_units < 1.0 {
            ScalingAction::ScaleUp
        } else if observation.current_load < self.scale_down_below {
            ScalingAction::ScaleDown
        } else {
            ScalingAction::NoOp
        }
    }
}

impl InferencePolicy for ThresholdPolicy {
    fn predict(&self, observation: &CloudObservation, _rng: Option<&mut dyn RngCore>) -> Result<u32> {
        Ok(self.decide(observation).code())
    }

    fn describe(&self) -> String {
        format!("threshold up>{} down<{}", self.scale_up_above, self.scale_down_below)
    }
}
