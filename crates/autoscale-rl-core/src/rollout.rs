//! Episode rollouts: drive an environment with a policy until the episode ends

use rand::RngCore;

use crate::{Environment, Policy, Trajectory, Transition};

/// Run one full episode of `env` under `policy`.
///
/// The environment is reset first, so any state left over from a previous
/// episode is discarded. Stepping stops at the first step flagged as
/// terminated or truncated.
pub fn run_episode<E, P>(
    env: &mut E,
    policy: &P,
    rng: &mut dyn RngCore,
) -> crate::Result<Trajectory<E::Observation, E::Action, E::State>>
where
    E: Environment,
    P: Policy<Observation = E::Observation, Action = E::Action> + ?Sized,
{
    let (mut observation, _info) = env.reset()?;
    let episode_id = env
        .episode_info()
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), |episode| episode.id);
    let mut trajectory = Trajectory::new(episode_id);

    loop {
        let action = policy.act(&observation, rng)?;
        let step = env.step(action.clone())?;
        let done = step.is_last();

        trajectory.push(Transition {
            observation,
            action,
            reward: step.reward,
            next_observation: step.observation.clone(),
            done,
            next_state: step.state,
        });

        if done {
            break;
        }
        observation = step.observation;
    }

    tracing::debug!(
        episode_id = %trajectory.episode_id,
        steps = trajectory.len(),
        total_reward = trajectory.total_reward,
        "rollout complete"
    );

    Ok(trajectory)
}
