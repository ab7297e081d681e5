//! Decision service for trained autoscaling policies
//!
//! Loads one [`PolicyArtifact`](autoscale_rl_agent::PolicyArtifact) at
//! startup and answers `POST /predict` with the action the policy picks for
//! an observation. The same crate carries the operator CLI used to evaluate
//! policies in the simulator and to export the rule-based baseline.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decision;
pub mod error;
pub mod handle;
pub mod rollout;
pub mod routes;
pub mod server;

pub use config::ServeConfig;
pub use decision::{parse_observation, DecisionResponse, UNKNOWN_ACTION};
pub use error::{Result, ServeError};
pub use handle::PolicyHandle;
pub use rollout::{evaluate, EvaluationSummary};
pub use routes::{routes, WELCOME_MESSAGE};
pub use server::{run, shutdown_signal};
