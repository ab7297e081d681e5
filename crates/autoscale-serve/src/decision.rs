//! Request validation and response mapping for `/predict`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use autoscale_rl_env::{CloudObservation, ScalingAction};

use crate::error::{Result, ServeError};

/// Name reported for codes outside the action set
pub const UNKNOWN_ACTION: &str = "UNKNOWN_ACTION";

/// Answer to a decision request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// Raw code produced by the policy
    pub action_code: u32,
    /// Symbolic name, or [`UNKNOWN_ACTION`]
    pub action_name: String,
}

impl DecisionResponse {
    /// Map a policy code to its response
    #[must_use]
    pub fn from_code(action_code: u32) -> Self {
        let action_name = ScalingAction::from_code(action_code)
            .map_or(UNKNOWN_ACTION, ScalingAction::name)
            .to_string();
        Self {
            action_code,
            action_name,
        }
    }
}

/// Validate a decision payload into an observation.
///
/// Both fields must be present and numeric. Values are passed through
/// unchanged; a load above 1.0 is a legitimate observation.
pub fn parse_observation(payload: &Value) -> Result<CloudObservation> {
    let object = payload
        .as_object()
        .ok_or_else(|| ServeError::InvalidRequest("request body must be a JSON object".into()))?;

    let field = |names: &[&str]| -> Result<f64> {
        let (name, value) = names
            .iter()
            .find_map(|name| object.get(*name).map(|value| (*name, value)))
            .ok_or_else(|| ServeError::InvalidRequest(format!("missing field `{}`", names[0])))?;
        value
            .as_f64()
            .ok_or_else(|| ServeError::InvalidRequest(format!("field `{name}` must be a number")))
    };

    Ok(CloudObservation {
        normalized_units: field(&["normalized_units", "normalized_servers"])?,
        current_load: field(&["current_load"])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_codes() {
        assert_eq!(DecisionResponse::from_code(0).action_name, "DO_NOTHING");
        assert_eq!(DecisionResponse::from_code(1).action_name, "ADD_SERVER");
        assert_eq!(DecisionResponse::from_code(2).action_name, "REMOVE_SERVER");
    }

    #[test]
    fn test_unknown_code_sentinel() {
        let response = DecisionResponse::from_code(7);
        assert_eq!(response.action_code, 7);
        assert_eq!(response.action_name, UNKNOWN_ACTION);
    }

    #[test]
    fn test_valid_payload() {
        let obs = parse_observation(&json!({"normalized_units": 0.2, "current_load": 1.7})).unwrap();
        assert_eq!(obs.normalized_units, 0.2);
        assert_eq!(obs.current_load, 1.7);
    }

    #[test]
    fn test_integer_values_accepted() {
        let obs = parse_observation(&json!({"normalized_units": 1, "current_load": 0})).unwrap();
        assert_eq!(obs.normalized_units, 1.0);
        assert_eq!(obs.current_load, 0.0);
    }

    #[test]
    fn test_legacy_field_name() {
        let obs = parse_observation(&json!({"normalized_servers": 0.5, "current_load": 0.4})).unwrap();
        assert_eq!(obs.normalized_units, 0.5);
    }

    #[test]
    fn test_missing_field() {
        let err = parse_observation(&json!({"normalized_units": 0.5})).unwrap_err();
        assert_eq!(err.to_string(), "missing field `current_load`");
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse_observation(&json!({"normalized_units": "half", "current_load": 0.4})).unwrap_err();
        assert_eq!(err.to_string(), "field `normalized_units` must be a number");
    }

    #[test]
    fn test_non_object_body() {
        assert!(parse_observation(&json!([0.5, 0.4])).is_err());
    }
}
