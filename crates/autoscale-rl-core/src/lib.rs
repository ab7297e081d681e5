//! Core reinforcement learning traits and types for the autoscaling simulator
//!
//! This crate provides the foundational abstractions shared by the
//! environment, the policy implementations and the decision service.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod environment;
pub mod error;
pub mod observation;
pub mod policy;
pub mod reward;
pub mod rollout;
pub mod state;
pub mod trajectory;

// Re-export core traits and types
pub use action::{Action, ActionSpace, DiscreteAction, DiscreteSpace};
pub use environment::{Environment, EnvironmentConfig, Episode, Step, StepInfo, TrackedEnvironment};
pub use error::{RLError, Result};
pub use observation::{BoxObservationSpace, Observation, ObservationSpace};
pub use policy::{Policy, RandomPolicy};
pub use reward::{Reward, RewardFunction};
pub use rollout::run_episode;
pub use state::State;
pub use trajectory::{Trajectory, TrajectoryBatch, Transition};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, ActionSpace, Environment, Observation, ObservationSpace, Policy, Result, Reward,
        State, Step,
    };
}
