//! Policy abstractions for action selection

use rand::RngCore;

use crate::{Action, ActionSpace, Observation};

/// Core policy trait for selecting actions.
///
/// Randomness comes from the caller so that rollouts stay reproducible
/// under a seeded generator.
pub trait Policy: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;

    /// Select an action given an observation
    fn act(&self, observation: &Self::Observation, rng: &mut dyn RngCore) -> crate::Result<Self::Action>;
}

/// Random policy that always selects random actions
pub struct RandomPolicy<O, A> {
    /// Action space
    pub action_space: A,
    _observation: std::marker::PhantomData<fn() -> O>,
}

impl<O, A> RandomPolicy<O, A> {
    /// Create a new random policy
    pub fn new(action_space: A) -> Self {
        Self {
            action_space,
            _observation: std::marker::PhantomData,
        }
    }
}

impl<O, A> Policy for RandomPolicy<O, A>
where
    O: Observation,
    A: ActionSpace,
{
    type Observation = O;
    type Action = A::Action;

    fn act(&self, _observation: &Self::Observation, rng: &mut dyn RngCore) -> crate::Result<Self::Action> {
        Ok(self.action_space.sample(rng))
    }
}
