//! Cloud autoscaling environment

use rand::rngs::StdRng;

use autoscale_rl_core::{
    ActionSpace, BoxObservationSpace, DiscreteSpace, Environment, EnvironmentConfig, ObservationSpace,
    RLError, Result, Reward, Step, StepInfo,
};

use crate::transition::{transition, StepOutcome};
use crate::{
    AllocationState, CloudEnvConfig, CloudObservation, DiurnalWorkload, ScalingAction, ScalingReward,
    WorkloadSource,
};

/// Autoscaling environment: pick a capacity change each step, get scored on
/// cost, utilization and overload.
///
/// Episodes always run to the horizon; overload is penalized but never ends
/// an episode.
pub struct CloudEnv<W = DiurnalWorkload<StdRng>> {
    config: CloudEnvConfig,
    reward: ScalingReward,
    workload: W,
    /// `None` until the first reset
    state: Option<AllocationState>,
}

impl CloudEnv<DiurnalWorkload<StdRng>> {
    /// Create a new environment from the generic environment config
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        Self::from_config(CloudEnvConfig::from_environment_config(&config)?)
    }

    /// Create a new environment with the diurnal workload
    pub fn from_config(config: CloudEnvConfig) -> Result<Self> {
        let workload = DiurnalWorkload::seeded(config.workload.clone(), config.seed)?;
        Self::with_workload(config, workload)
    }
}

impl<W: WorkloadSource> CloudEnv<W> {
    /// Create an environment driven by a custom workload source
    pub fn with_workload(config: CloudEnvConfig, workload: W) -> Result<Self> {
        config.validate()?;
        let reward = ScalingReward::new(config.reward.clone());
        Ok(Self {
            config,
            reward,
            workload,
            state: None,
        })
    }

    /// Environment parameters
    #[must_use]
    pub fn config(&self) -> &CloudEnvConfig {
        &self.config
    }

    /// Current state, if an episode has been started
    #[must_use]
    pub fn state(&self) -> Option<&AllocationState> {
        self.state.as_ref()
    }

    fn info(outcome: &StepOutcome) -> StepInfo {
        let mut info = StepInfo::default();
        info.insert_f64("incoming_rate", outcome.incoming_rate);
        info.insert_f64("cost_penalty", outcome.reward.cost_penalty);
        info.insert_f64("load_penalty", outcome.reward.load_penalty);
        info.insert_f64("overload_penalty", outcome.reward.overload_penalty);
        info
    }
}

impl<W: WorkloadSource> Environment for CloudEnv<W> {
    type Observation = CloudObservation;
    type Action = ScalingAction;
    type State = AllocationState;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        // load can exceed 1.0 before the penalty kicks in, so it stays unbounded
        let space = BoxObservationSpace::new(vec![0.0, 0.0], vec![1.0, f64::INFINITY])
            .unwrap_or_else(|err| unreachable!("fixed bounds have equal length: {err}"));
        Box::new(space)
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        Box::new(DiscreteSpace::<ScalingAction>::new())
    }

    fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        let state = AllocationState::initial();
        self.state = Some(state);
        Ok((state.observation(self.config.max_units), StepInfo::default()))
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation, Self::State>> {
        let state = self
            .state
            .ok_or_else(|| RLError::Environment("step called before reset".into()))?;
        if self.config.is_episode_over(state.step_index()) {
            return Err(RLError::Environment(format!(
                "episode already truncated at step {}; call reset",
                state.step_index()
            )));
        }

        let outcome = transition(&self.config, &self.reward, &state, action, &mut self.workload);
        self.state = Some(outcome.state);

        tracing::debug!(
            step = outcome.state.step_index(),
            action = %action,
            active_units = outcome.state.active_units(),
            current_load = outcome.state.current_load(),
            reward = outcome.reward.total(),
            "cloud env step"
        );

        Ok(Step {
            observation: outcome.observation,
            reward: Reward::from(outcome.reward),
            terminated: outcome.terminated(),
            truncated: outcome.truncated,
            info: Self::info(&outcome),
            state: Some(outcome.state),
        })
    }

    fn render(&self) -> Result<()> {
        if let Some(state) = &self.state {
            tracing::info!(
                "Step: {}, Servers: {}, Load: {:.2}",
                state.step_index(),
                state.active_units(),
                state.current_load()
            );
        }
        Ok(())
    }
}
