//! Errors raised by the decision service

use std::path::PathBuf;

use thiserror::Error;

use autoscale_rl_agent::ArtifactError;
use autoscale_rl_core::RLError;

/// Decision service error
#[derive(Error, Debug)]
pub enum ServeError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        /// Config location
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ServeConfig`](crate::ServeConfig)
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Policy artifact failed to load
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Request payload is malformed
    #[error("{0}")]
    InvalidRequest(String),

    /// Policy could not produce a decision
    #[error("inference failed: {0}")]
    Inference(#[from] RLError),

    /// Listener could not be bound
    #[error("failed to bind listener: {0}")]
    Bind(#[from] warp::Error),
}

/// Result alias for the decision service
pub type Result<T> = std::result::Result<T, ServeError>;
