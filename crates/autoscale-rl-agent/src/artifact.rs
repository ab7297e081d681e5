//! On-disk policy artifacts
//!
//! An artifact is a JSON document holding one trained decision function and
//! a little metadata. It is read once at startup and never mutated.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use autoscale_rl_core::RLError;
use autoscale_rl_env::CloudObservation;

use crate::{InferencePolicy, MlpPolicy, ThresholdPolicy};

/// Artifact format understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Errors raised while loading or saving an artifact
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// File could not be read or written
    #[error("I/O error on policy artifact {path}: {source}")]
    Io {
        /// Artifact location
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Contents are not a valid artifact document
    #[error("malformed policy artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Written by an incompatible build
    #[error("unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Version this build reads
        supported: u32,
    },

    /// Model parameters are inconsistent
    #[error("invalid policy model: {0}")]
    Model(#[from] RLError),
}

/// The decision function stored in an artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyModel {
    /// Trained feed-forward network
    Mlp(MlpPolicy),
    /// Rule-based baseline
    Threshold(ThresholdPolicy),
}

impl PolicyModel {
    fn as_inference(&self) -> &dyn InferencePolicy {
        match self {
            Self::Mlp(policy) => policy,
            Self::Threshold(policy) => policy,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Mlp(_) => "mlp",
            Self::Threshold(_) => "threshold",
        }
    }
}

/// A trained policy plus metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyArtifact {
    /// Format version, see [`ARTIFACT_FORMAT_VERSION`]
    pub format_version: u32,
    /// Name given at export time
    pub name: String,
    /// Export timestamp
    pub created_at: DateTime<Utc>,
    /// Length of the observation vector the model expects
    pub observation_dim: usize,
    /// The decision function
    pub model: PolicyModel,
}

impl PolicyArtifact {
    /// Wrap a model in a fresh artifact
    pub fn new(name: impl Into<String>, model: PolicyModel) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            name: name.into(),
            created_at: Utc::now(),
            observation_dim: CloudObservation::DIM,
            model,
        }
    }

    /// Parse and validate an artifact document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read an artifact from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_slice(&bytes)?;
        tracing::info!(
            path = %path.display(),
            name = %artifact.name,
            kind = artifact.model.kind(),
            "policy artifact loaded"
        );
        Ok(artifact)
    }

    /// Write the artifact to disk as pretty-printed JSON
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json).await.map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), name = %self.name, "policy artifact saved");
        Ok(())
    }

    /// Reject artifacts this build cannot serve
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.format_version,
                supported: ARTIFACT_FORMAT_VERSION,
            });
        }
        if self.observation_dim != CloudObservation::DIM {
            return Err(RLError::DimensionMismatch {
                expected: CloudObservation::DIM,
                actual: self.observation_dim,
            }
            .into());
        }
        match &self.model {
            PolicyModel::Mlp(policy) => {
                policy.validate()?;
                if policy.config().input_dim != self.observation_dim {
                    return Err(RLError::DimensionMismatch {
                        expected: self.observation_dim,
                        actual: policy.config().input_dim,
                    }
                    .into());
                }
            }
            PolicyModel::Threshold(policy) => policy.validate()?,
        }
        Ok(())
    }
}

impl InferencePolicy for PolicyArtifact {
    fn predict(&self, observation: &CloudObservation, rng: Option<&mut dyn RngCore>) -> autoscale_rl_core::Result<u32> {
        self.model.as_inference().predict(observation, rng)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.name, self.model.as_inference().describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MlpConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mlp_artifact() -> PolicyArtifact {
        let mut rng = StdRng::seed_from_u64(17);
        PolicyArtifact::new("ppo-tuned", PolicyModel::Mlp(MlpPolicy::new(MlpConfig::default(), &mut rng)))
    }

    #[tokio::test]
    async fn test_save_then_load_predicts_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        let artifact = mlp_artifact();
        artifact.save(&path).await.unwrap();

        let loaded = PolicyArtifact::load(&path).await.unwrap();
        assert_eq!(loaded.name, "ppo-tuned");
        for load in [0.0, 0.3, 0.6, 0.9, 1.5, 4.0] {
            let obs = CloudObservation {
                normalized_units: 0.3,
                current_load: load,
            };
            assert_eq!(loaded.predict(&obs, None).unwrap(), artifact.predict(&obs, None).unwrap());
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PolicyArtifact::load(dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn test_corrupt_document() {
        let err = PolicyArtifact::from_slice(b"PK\x03\x04 not json").unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn test_unsupported_version() {
        let mut artifact = PolicyArtifact::new("old", PolicyModel::Threshold(ThresholdPolicy::default()));
        artifact.format_version = 7;
        let bytes = serde_json::to_vec(&artifact).unwrap();
        let err = PolicyArtifact::from_slice(&bytes).unwrap_err();
        assert!(matches!(err, ArtifactError::UnsupportedVersion { found: 7, supported: 1 }));
    }

    #[test]
    fn test_threshold_document_parses() {
        let doc = serde_json::json!({
            "format_version": 1,
            "name": "baseline",
            "created_at": "2026-01-01T00:00:00Z",
            "observation_dim": 2,
            "model": { "kind": "threshold", "scale_up_above": 0.75, "scale_down_below": 0.35 }
        });
        let artifact = PolicyArtifact::from_slice(doc.to_string().as_bytes()).unwrap();
        let hot = CloudObservation {
            normalized_units: 0.1,
            current_load: 0.9,
        };
        assert_eq!(artifact.predict(&hot, None).unwrap(), 1);
        assert!(artifact.describe().starts_with("baseline"));
    }

    #[test]
    fn test_mismatched_network_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = MlpConfig {
            input_dim: 4,
            ..MlpConfig::default()
        };
        let artifact = PolicyArtifact::new("wide", PolicyModel::Mlp(MlpPolicy::new(config, &mut rng)));
        let bytes = serde_json::to_vec(&artifact).unwrap();
        let err = PolicyArtifact::from_slice(&bytes).unwrap_err();
        assert!(matches!(err, ArtifactError::Model(RLError::DimensionMismatch { .. })));
    }
}
