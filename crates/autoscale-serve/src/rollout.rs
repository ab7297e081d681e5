//! Offline policy evaluation in the simulated environment

use rand::RngCore;

use autoscale_rl_core::{
    run_episode, ActionSpace, Environment, ObservationSpace, Policy, Result, Step, StepInfo, TrackedEnvironment,
    TrajectoryBatch,
};
use autoscale_rl_env::{CloudEnv, CloudEnvConfig, CloudObservation, ScalingAction};

/// Rewards collected over an evaluation run
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    /// Total reward of each episode, in order
    pub episode_rewards: Vec<f64>,
    /// Mean of `episode_rewards`, 0 when no episode ran
    pub mean_reward: f64,
    /// Steps taken across all episodes
    pub total_steps: usize,
}

/// Renders after every step when enabled
struct Rendered<E> {
    env: E,
    enabled: bool,
}

impl<E: Environment> Environment for Rendered<E> {
    type Observation = E::Observation;
    type Action = E::Action;
    type State = E::State;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        self.env.action_space()
    }

    fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        self.env.reset()
    }

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation, Self::State>> {
        let step = self.env.step(action)?;
        if self.enabled {
            self.env.render()?;
        }
        Ok(step)
    }

    fn render(&self) -> Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> Result<()> {
        self.env.close()
    }
}

/// Run `episodes` full episodes of a fresh [`CloudEnv`] under `policy`.
pub fn evaluate<P>(
    config: CloudEnvConfig,
    policy: &P,
    episodes: usize,
    render: bool,
    rng: &mut dyn RngCore,
) -> Result<EvaluationSummary>
where
    P: Policy<Observation = CloudObservation, Action = ScalingAction> + ?Sized,
{
    let env = CloudEnv::from_config(config)?;
    let mut env = TrackedEnvironment::new(Rendered { env, enabled: render });
    let mut batch = TrajectoryBatch::new();

    for episode in 0..episodes {
        let trajectory = run_episode(&mut env, policy, rng)?;
        tracing::info!(
            episode = episode + 1,
            steps = trajectory.len(),
            total_reward = format_args!("{:.2}", trajectory.total_reward),
            "episode finished"
        );
        batch.push(trajectory);
    }
    env.close()?;

    let summary = EvaluationSummary {
        episode_rewards: batch.trajectories.iter().map(|t| t.total_reward).collect(),
        mean_reward: batch.avg_reward(),
        total_steps: batch.total_transitions(),
    };
    tracing::info!(
        episodes,
        mean_reward = format_args!("{:.2}", summary.mean_reward),
        "evaluation complete"
    );
    Ok(summary)
}
