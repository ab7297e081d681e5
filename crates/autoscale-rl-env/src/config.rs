//! Environment configuration

use serde::{Deserialize, Serialize};

use autoscale_rl_core::{EnvironmentConfig, RLError, Result};

use crate::{RewardConfig, WorkloadConfig};

/// Parameters of the autoscaling environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudEnvConfig {
    /// Largest number of active capacity units
    pub max_units: u32,
    /// Steps after which an episode is truncated
    pub horizon: u64,
    /// Seed for the workload noise; entropy when unset
    pub seed: Option<u64>,
    /// Workload shape
    pub workload: WorkloadConfig,
    /// Reward coefficients
    pub reward: RewardConfig,
}

impl Default for CloudEnvConfig {
    fn default() -> Self {
        Self {
            max_units: 10,
            horizon: 100,
            seed: None,
            workload: WorkloadConfig::default(),
            reward: RewardConfig::default(),
        }
    }
}

impl CloudEnvConfig {
    /// Build from the generic environment config.
    ///
    /// `seed` and `max_steps` map to the seed and horizon; the flattened
    /// `params` may carry any other field of this struct.
    pub fn from_environment_config(config: &EnvironmentConfig) -> Result<Self> {
        let mut parsed: Self = serde_json::from_value(serde_json::Value::Object(config.params.clone()))?;
        if config.seed.is_some() {
            parsed.seed = config.seed;
        }
        if let Some(max_steps) = config.max_steps {
            parsed.horizon = max_steps as u64;
        }
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check every bound the transition relies on
    pub fn validate(&self) -> Result<()> {
        if self.max_units == 0 {
            return Err(RLError::InvalidConfig("max_units must be at least 1".into()));
        }
        if self.horizon == 0 {
            return Err(RLError::InvalidConfig("horizon must be at least 1 step".into()));
        }
        self.workload.validate()?;
        self.reward.validate()
    }

    /// Whether an episode at `step_index` has hit the horizon
    #[must_use]
    pub fn is_episode_over(&self, step_index: u64) -> bool {
        step_index >= self.horizon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CloudEnvConfig::default();
        assert_eq!(config.max_units, 10);
        assert_eq!(config.horizon, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_horizon_boundary() {
        let config = CloudEnvConfig::default();
        assert!(!config.is_episode_over(99));
        assert!(config.is_episode_over(100));
    }

    #[test]
    fn test_from_environment_config() {
        let mut env_config = EnvironmentConfig::seeded(9);
        env_config.max_steps = Some(50);
        env_config
            .params
            .insert("max_units".to_string(), serde_json::json!(4));
        env_config.params.insert(
            "workload".to_string(),
            serde_json::json!({ "base_rate": 8.0 }),
        );

        let config = CloudEnvConfig::from_environment_config(&env_config).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.horizon, 50);
        assert_eq!(config.max_units, 4);
        assert_eq!(config.workload.base_rate, 8.0);
        assert_eq!(config.workload.period_steps, 24);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let mut env_config = EnvironmentConfig::default();
        env_config
            .params
            .insert("max_units".to_string(), serde_json::json!(0));
        assert!(CloudEnvConfig::from_environment_config(&env_config).is_err());
    }
}
