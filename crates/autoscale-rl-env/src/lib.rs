//! Cloud autoscaling environment for reinforcement learning
//!
//! An agent controls the number of active capacity units serving a
//! synthetic diurnal workload. Each step it may add a unit, remove one, or
//! do nothing, and is rewarded for keeping per-unit load near a target
//! without paying for idle capacity or letting units overload.
//!
//! - [`workload`]: the request-rate generator
//! - [`state`]: allocation state and observation
//! - [`transition`]: the pure step function
//! - [`reward`]: reward shaping
//! - [`cloud`]: the [`Environment`](autoscale_rl_core::Environment) wrapper

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod cloud;
pub mod config;
pub mod reward;
pub mod state;
pub mod transition;
pub mod workload;

pub use action::ScalingAction;
pub use cloud::CloudEnv;
pub use config::CloudEnvConfig;
pub use reward::{RewardBreakdown, RewardConfig, ScalingReward};
pub use state::{AllocationState, CloudObservation};
pub use transition::{transition, StepOutcome};
pub use workload::{DiurnalWorkload, ScriptedWorkload, WorkloadConfig, WorkloadSource};

// Re-export core types
pub use autoscale_rl_core::{
    Action, ActionSpace, Environment, EnvironmentConfig, Episode, Observation, ObservationSpace,
    Reward, State, Step,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AllocationState, CloudEnv, CloudEnvConfig, CloudObservation, ScalingAction};
    pub use autoscale_rl_core::prelude::*;
}
