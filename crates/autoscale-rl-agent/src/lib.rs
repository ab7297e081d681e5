//! Trained policies for the autoscaling environment
//!
//! Training happens elsewhere; this crate only runs the result. A policy is
//! shipped as a [`PolicyArtifact`] JSON file holding either a dense network
//! ([`MlpPolicy`]) or the rule-based [`ThresholdPolicy`] baseline, and is
//! queried through the [`InferencePolicy`] trait.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod inference;
pub mod mlp;
pub mod threshold;

pub use artifact::{ArtifactError, PolicyArtifact, PolicyModel, ARTIFACT_FORMAT_VERSION};
pub use inference::{ArtifactPolicy, InferencePolicy};
pub use mlp::{Activation, MlpConfig, MlpPolicy};
pub use threshold::ThresholdPolicy;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ArtifactPolicy, InferencePolicy, PolicyArtifact, PolicyModel};
    pub use autoscale_rl_env::prelude::*;
}
