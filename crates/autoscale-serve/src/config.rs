//! Decision service configuration

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServeError};

/// Settings for `autoscale-serve serve`.
///
/// Every field has a default, so an empty file is a valid config. CLI flags
/// override whatever the file sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Policy artifact loaded at startup
    pub policy_path: PathBuf,
    /// Greedy inference when true, sampled when false
    pub deterministic: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            policy_path: PathBuf::from("policy.json"),
            deterministic: true,
        }
    }
}

impl ServeConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ServeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded serve config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ServeConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServeConfig::default());
        assert_eq!(config.bind.port(), 8000);
        assert!(config.deterministic);
    }

    #[test]
    fn test_partial_document() {
        let config = ServeConfig::from_toml_str(
            r#"
bind = "127.0.0.1:9100"
deterministic = false
"#,
        )
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:9100".parse().unwrap());
        assert!(!config.deterministic);
        assert_eq!(config.policy_path, PathBuf::from("policy.json"));
    }

    #[test]
    fn test_bad_address_rejected() {
        let err = ServeConfig::from_toml_str(r#"bind = "not-an-address""#).unwrap_err();
        assert!(matches!(err, ServeError::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"policy_path = "/srv/policies/ppo.json""#).unwrap();
        let config = ServeConfig::load(file.path()).unwrap();
        assert_eq!(config.policy_path, PathBuf::from("/srv/policies/ppo.json"));

        let err = ServeConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ServeError::ConfigRead { .. }));
    }
}
