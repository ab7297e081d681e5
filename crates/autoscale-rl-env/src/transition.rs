//! The transition function: action, workload draw, load, reward, horizon

use crate::{AllocationState, CloudEnvConfig, CloudObservation, RewardBreakdown, ScalingAction, ScalingReward, WorkloadSource};

/// Everything one step produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// State after the step; replaces the previous one
    pub state: AllocationState,
    /// Projection of `state`
    pub observation: CloudObservation,
    /// Reward terms for the step
    pub reward: RewardBreakdown,
    /// Requests drawn for the step
    pub incoming_rate: f64,
    /// Whether the horizon was reached
    pub truncated: bool,
}

impl StepOutcome {
    /// Overload never ends an episode
    #[must_use]
    pub fn terminated(&self) -> bool {
        false
    }
}

/// Advance `state` by one step under `action`.
///
/// The order is fixed: capacity change, workload draw at the current
/// (pre-increment) step index, load, reward, step increment, observation.
/// Out-of-range capacity requests saturate instead of failing.
pub fn transition<W>(
    config: &CloudEnvConfig,
    reward: &ScalingReward,
    state: &AllocationState,
    action: ScalingAction,
    workload: &mut W,
) -> StepOutcome
where
    W: WorkloadSource + ?Sized,
{
    let active_units = action.apply(state.active_units(), config.max_units);

    let incoming_rate = workload.incoming_rate(state.step_index());

    let current_load = if active_units > 0 {
        incoming_rate / f64::from(active_units)
    } else {
        0.0
    };

    let breakdown = reward.breakdown(active_units, current_load);

    let step_index = state.step_index() + 1;
    let truncated = config.is_episode_over(step_index);

    let next = AllocationState::advanced(active_units, current_load, step_index);

    StepOutcome {
        state: next,
        observation: next.observation(config.max_units),
        reward: breakdown,
        incoming_rate,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiurnalWorkload, ScriptedWorkload, WorkloadConfig};
    use approx::assert_relative_eq;

    #[test]
    fn test_scale_up_from_reset() {
        let config = CloudEnvConfig::default();
        let reward = ScalingReward::default();
        let mut workload = ScriptedWorkload::constant(5.0);

        let outcome = transition(&config, &reward, &AllocationState::initial(), ScalingAction::ScaleUp, &mut workload);
        assert_eq!(outcome.state.active_units(), 2);
        assert_eq!(outcome.state.step_index(), 1);
        assert_relative_eq!(outcome.state.current_load(), 2.5);
        assert_relative_eq!(outcome.observation.normalized_units, 0.2);
        // -2 cost, -10 * 1.9^2 load, -200 overload
        assert_relative_eq!(outcome.reward.total(), -2.0 - 36.1 - 200.0, epsilon = 1e-9);
        assert!(!outcome.truncated);
        assert!(!outcome.terminated());
    }

    #[test]
    fn test_workload_drawn_at_pre_increment_index() {
        struct Recorder(Vec<u64>);
        impl WorkloadSource for Recorder {
            fn incoming_rate(&mut self, step_index: u64) -> f64 {
                self.0.push(step_index);
                1.0
            }
        }

        let config = CloudEnvConfig::default();
        let reward = ScalingReward::default();
        let mut recorder = Recorder(Vec::new());
        let mut state = AllocationState::initial();
        for _ in 0..3 {
            state = transition(&config, &reward, &state, ScalingAction::NoOp, &mut recorder).state;
        }
        assert_eq!(recorder.0, vec![0, 1, 2]);
        assert_eq!(state.step_index(), 3);
    }

    #[test]
    fn test_seeded_transition_is_deterministic() {
        let config = CloudEnvConfig::default();
        let reward = ScalingReward::default();
        let start = AllocationState::new(4, 0.7, 10, 10).unwrap();

        let mut a = DiurnalWorkload::seeded(WorkloadConfig::default(), Some(11)).unwrap();
        let mut b = DiurnalWorkload::seeded(WorkloadConfig::default(), Some(11)).unwrap();
        let first = transition(&config, &reward, &start, ScalingAction::ScaleDown, &mut a);
        let second = transition(&config, &reward, &start, ScalingAction::ScaleDown, &mut b);
        assert_eq!(first, second);
        assert_eq!(first.state.active_units(), 3);
    }

    #[test]
    fn test_truncates_exactly_at_horizon() {
        let config = CloudEnvConfig::default();
        let reward = ScalingReward::default();
        let mut workload = ScriptedWorkload::constant(3.0);

        let mut state = AllocationState::initial();
        for step in 1..=100u64 {
            let outcome = transition(&config, &reward, &state, ScalingAction::NoOp, &mut workload);
            assert_eq!(outcome.truncated, step == 100, "step {step}");
            state = outcome.state;
        }
    }
}
