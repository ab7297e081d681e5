//! Reward shaping for the autoscaling task

use serde::{Deserialize, Serialize};

use autoscale_rl_core::{RLError, Result, Reward, RewardFunction};

use crate::{AllocationState, ScalingAction};

/// Coefficients of the three reward terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Penalty per active unit per step
    pub cost_per_unit: f64,
    /// Weight of the quadratic deviation from `target_load`
    pub load_weight: f64,
    /// Ideal per-unit utilization
    pub target_load: f64,
    /// Load above which the overload penalty applies
    pub overload_threshold: f64,
    /// Flat penalty for an overloaded step
    pub overload_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            cost_per_unit: 1.0,
            load_weight: 10.0,
            target_load: 0.6,
            overload_threshold: 1.0,
            overload_penalty: 200.0,
        }
    }
}

impl RewardConfig {
    /// All coefficients must be finite
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.cost_per_unit,
            self.load_weight,
            self.target_load,
            self.overload_threshold,
            self.overload_penalty,
        ];
        if values.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(RLError::InvalidConfig("reward coefficients must be finite".into()))
        }
    }
}

/// The reward of one step, split into its additive terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    /// Linear capacity cost, `-cost_per_unit * active_units`
    pub cost_penalty: f64,
    /// Quadratic deviation from the target load
    pub load_penalty: f64,
    /// Flat overload penalty, zero unless the threshold is exceeded
    pub overload_penalty: f64,
}

impl RewardBreakdown {
    /// Sum of the three terms
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cost_penalty + self.load_penalty + self.overload_penalty
    }

    /// Whether the step was overloaded
    #[must_use]
    pub fn overloaded(&self) -> bool {
        self.overload_penalty != 0.0
    }
}

impl From<RewardBreakdown> for Reward {
    fn from(breakdown: RewardBreakdown) -> Self {
        Reward(breakdown.total())
    }
}

/// Cost + utilization + overload reward
#[derive(Debug, Clone, Default)]
pub struct ScalingReward {
    config: RewardConfig,
}

impl ScalingReward {
    /// Reward with the given coefficients
    #[must_use]
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    /// Coefficients in use
    #[must_use]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Quadratic utilization term alone; zero exactly at the target load
    #[must_use]
    pub fn load_term(&self, current_load: f64) -> f64 {
        -self.config.load_weight * (current_load - self.config.target_load).powi(2)
    }

    /// Score a post-transition capacity and load
    #[must_use]
    pub fn breakdown(&self, active_units: u32, current_load: f64) -> RewardBreakdown {
        let overload_penalty = if current_load > self.config.overload_threshold {
            -self.config.overload_penalty
        } else {
            0.0
        };
        RewardBreakdown {
            cost_penalty: -self.config.cost_per_unit * f64::from(active_units),
            load_penalty: self.load_term(current_load),
            overload_penalty,
        }
    }
}

impl RewardFunction for ScalingReward {
    type State = AllocationState;
    type Action = ScalingAction;

    fn reward(&self, _state: &AllocationState, _action: &ScalingAction, next_state: &AllocationState) -> Reward {
        self.breakdown(next_state.active_units(), next_state.current_load())
            .into()
    }
}
