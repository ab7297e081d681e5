//! Allocation state and its observable projection

use serde::{Deserialize, Serialize};

use autoscale_rl_core::{Observation, RLError, Result, State};

/// Simulation state for one episode.
///
/// Immutable: every transition produces a fresh value. `active_units` stays
/// within `[1, max_units]` and `current_load` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationState {
    active_units: u32,
    current_load: f64,
    step_index: u64,
}

impl AllocationState {
    /// State at the start of every episode: one unit, no load, step zero
    #[must_use]
    pub fn initial() -> Self {
        Self {
            active_units: 1,
            current_load: 0.0,
            step_index: 0,
        }
    }

    /// Build a state, checking its invariants against `max_units`
    pub fn new(active_units: u32, current_load: f64, step_index: u64, max_units: u32) -> Result<Self> {
        if active_units < 1 || active_units > max_units {
            return Err(RLError::InvalidState(format!(
                "active_units {active_units} outside [1, {max_units}]"
            )));
        }
        if !current_load.is_finite() || current_load < 0.0 {
            return Err(RLError::InvalidState(format!(
                "current_load {current_load} must be finite and non-negative"
            )));
        }
        Ok(Self {
            active_units,
            current_load,
            step_index,
        })
    }

    pub(crate) fn advanced(active_units: u32, current_load: f64, step_index: u64) -> Self {
        Self {
            active_units,
            current_load,
            step_index,
        }
    }

    /// Active capacity units
    #[must_use]
    pub fn active_units(&self) -> u32 {
        self.active_units
    }

    /// Incoming requests per active unit at the last step
    #[must_use]
    pub fn current_load(&self) -> f64 {
        self.current_load
    }

    /// Number of steps taken in this episode
    #[must_use]
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Observable projection for an environment with `max_units` capacity
    #[must_use]
    pub fn observation(&self, max_units: u32) -> CloudObservation {
        CloudObservation {
            normalized_units: f64::from(self.active_units) / f64::from(max_units.max(1)),
            current_load: self.current_load,
        }
    }
}

impl Default for AllocationState {
    fn default() -> Self {
        Self::initial()
    }
}

impl State for AllocationState {
    #[allow(clippy::cast_precision_loss)]
    fn features(&self) -> Vec<f64> {
        vec![
            f64::from(self.active_units),
            self.current_load,
            self.step_index as f64,
        ]
    }
}

/// What an agent sees each step: normalized capacity and current load.
///
/// `current_load` is unbounded above; values over 1.0 are legal and only
/// show up as a reward penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudObservation {
    /// `active_units / max_units`, in `[0, 1]`
    #[serde(alias = "normalized_servers")]
    pub normalized_units: f64,
    /// Incoming requests per active unit
    pub current_load: f64,
}

impl CloudObservation {
    /// Number of features in the observation vector
    pub const DIM: usize = 2;

    /// Feature vector in the order policies are trained on
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_features(&self) -> [f32; 2] {
        [self.normalized_units as f32, self.current_load as f32]
    }
}

impl Observation for CloudObservation {
    fn to_vec(&self) -> Vec<f64> {
        vec![self.normalized_units, self.current_load]
    }

    fn shape(&self) -> Vec<usize> {
        vec![Self::DIM]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = AllocationState::initial();
        assert_eq!(state.active_units(), 1);
        assert_eq!(state.current_load(), 0.0);
        assert_eq!(state.step_index(), 0);
        assert_eq!(state.observation(10).normalized_units, 0.1);
    }

    #[test]
    fn test_new_checks_invariants() {
        assert!(AllocationState::new(0, 0.0, 0, 10).is_err());
        assert!(AllocationState::new(11, 0.0, 0, 10).is_err());
        assert!(AllocationState::new(3, -0.1, 0, 10).is_err());
        assert!(AllocationState::new(3, f64::NAN, 0, 10).is_err());
        let state = AllocationState::new(10, 2.5, 7, 10).unwrap();
        assert_eq!(state.features(), vec![10.0, 2.5, 7.0]);
    }

    #[test]
    fn test_observation_keeps_overload() {
        let state = AllocationState::new(2, 1.8, 3, 10).unwrap();
        let obs = state.observation(10);
        assert_eq!(obs.current_load, 1.8);
        assert_eq!(obs.to_vec(), vec![0.2, 1.8]);
    }

    #[test]
    fn test_observation_accepts_legacy_field_name() {
        let obs: CloudObservation =
            serde_json::from_str(r#"{"normalized_servers": 0.3, "current_load": 0.5}"#).unwrap();
        assert_eq!(obs.normalized_units, 0.3);
    }
}
