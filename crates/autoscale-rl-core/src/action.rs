//! Action representations and action spaces

use rand::{Rng, RngCore};
use std::fmt::Debug;
use std::marker::PhantomData;

/// Trait for actions in an RL environment
pub trait Action: Clone + Debug + Send + Sync {
    /// Convert action to a vector representation
    fn to_vec(&self) -> Vec<f64>;
}

/// Actions drawn from a closed, finite set with stable indices
pub trait DiscreteAction: Action + Copy {
    /// Number of actions in the set
    const COUNT: usize;

    /// Stable index of this action in `0..COUNT`
    fn index(&self) -> usize;

    /// Action for an index, `None` when out of range
    fn from_index(index: usize) -> Option<Self>;
}

/// Trait for defining action spaces
pub trait ActionSpace: Send + Sync {
    /// The type of actions in this space
    type Action: Action;

    /// Sample a random action from the space
    fn sample(&self, rng: &mut dyn RngCore) -> Self::Action;

    /// Check if an action is valid within this space
    fn contains(&self, action: &Self::Action) -> bool;

    /// Get the dimensionality of the action space
    fn dim(&self) -> Option<usize>;
}

/// Discrete action space over a [`DiscreteAction`] set
#[derive(Debug, Clone, Copy)]
pub struct DiscreteSpace<A> {
    _action: PhantomData<fn() -> A>,
}

impl<A: DiscreteAction> DiscreteSpace<A> {
    /// Create a new discrete action space
    #[must_use]
    pub fn new() -> Self {
        Self {
            _action: PhantomData,
        }
    }

    /// Number of discrete actions
    #[must_use]
    pub fn n(&self) -> usize {
        A::COUNT
    }
}

impl<A: DiscreteAction> Default for DiscreteSpace<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: DiscreteAction> ActionSpace for DiscreteSpace<A> {
    type Action = A;

    fn sample(&self, rng: &mut dyn RngCore) -> Self::Action {
        let index = rng.gen_range(0..A::COUNT);
        // every index below COUNT maps to an action
        A::from_index(index).unwrap_or_else(|| unreachable!("index {index} out of range"))
    }

    fn contains(&self, action: &Self::Action) -> bool {
        action.index() < A::COUNT
    }

    fn dim(&self) -> Option<usize> {
        Some(1)
    }
}
