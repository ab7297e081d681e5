//! Route tests against stub and artifact-backed policies

use std::sync::Arc;

use rand::RngCore;
use serde_json::{json, Value};
use warp::http::StatusCode;

use autoscale_rl_agent::{InferencePolicy, PolicyArtifact, PolicyModel, ThresholdPolicy};
use autoscale_rl_core::Result;
use autoscale_rl_env::CloudObservation;
use autoscale_serve::{routes, DecisionResponse, PolicyHandle, ServeConfig, UNKNOWN_ACTION, WELCOME_MESSAGE};

/// Always answers with the same code
struct Fixed(u32);

impl InferencePolicy for Fixed {
    fn predict(&self, _observation: &CloudObservation, _rng: Option<&mut dyn RngCore>) -> Result<u32> {
        Ok(self.0)
    }

    fn describe(&self) -> String {
        format!("fixed({})", self.0)
    }
}

/// Echoes the load back as a code so tests can see what reached the policy
struct EchoLoad;

impl InferencePolicy for EchoLoad {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn predict(&self, observation: &CloudObservation, _rng: Option<&mut dyn RngCore>) -> Result<u32> {
        Ok(observation.current_load as u32)
    }

    fn describe(&self) -> String {
        "echo".into()
    }
}

fn handle(policy: impl InferencePolicy + 'static) -> Arc<PolicyHandle> {
    Arc::new(PolicyHandle::from_policy(Arc::new(policy), true))
}

async fn post_predict(handle: Arc<PolicyHandle>, body: &str) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method("POST")
        .path("/predict")
        .header("content-type", "application/json")
        .body(body.to_owned())
        .reply(&routes(handle))
        .await;
    let status = response.status();
    let value = serde_json::from_slice(response.body()).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_welcome_message() {
    let response = warp::test::request().method("GET").path("/").reply(&routes(handle(Fixed(0)))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body, json!({ "message": WELCOME_MESSAGE }));
}

#[tokio::test]
async fn test_scale_up_decision() {
    let (status, body) =
        post_predict(handle(Fixed(1)), r#"{"normalized_units": 0.1, "current_load": 0.9}"#).await;
    assert_eq!(status, StatusCode::OK);
    let decision: DecisionResponse = serde_json::from_value(body).unwrap();
    assert_eq!(
        decision,
        DecisionResponse {
            action_code: 1,
            action_name: "ADD_SERVER".into()
        }
    );
}

#[tokio::test]
async fn test_unknown_code_maps_to_sentinel() {
    let (status, body) = post_predict(handle(Fixed(99)), r#"{"normalized_units": 0.5, "current_load": 0.5}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action_code"], 99);
    assert_eq!(body["action_name"], UNKNOWN_ACTION);
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let (status, body) = post_predict(handle(Fixed(0)), r#"{"normalized_units": 0.5}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("current_load"));
}

#[tokio::test]
async fn test_non_numeric_field_rejected() {
    let (status, body) =
        post_predict(handle(Fixed(0)), r#"{"normalized_units": "lots", "current_load": 0.5}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("normalized_units"));
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let (status, _) = post_predict(handle(Fixed(0)), "normalized_units=0.5").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_overload_passes_through_unclamped() {
    let (status, body) = post_predict(handle(EchoLoad), r#"{"normalized_units": 0.1, "current_load": 4.2}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action_code"], 4);
    assert_eq!(body["action_name"], UNKNOWN_ACTION);
}

#[tokio::test]
async fn test_legacy_field_name_accepted() {
    let (status, body) = post_predict(handle(Fixed(2)), r#"{"normalized_servers": 0.5, "current_load": 0.1}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action_name"], "REMOVE_SERVER");
}

fn error_body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    body["error"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_get_predict_not_routed() {
    let response = warp::test::request().method("GET").path("/predict").reply(&routes(handle(Fixed(0)))).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(!error_body(&response).is_empty());
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let response = warp::test::request().method("GET").path("/metrics").reply(&routes(handle(Fixed(0)))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_body(&response), "not found");
}

#[tokio::test]
async fn test_oversize_body_is_json_413() {
    let padding = " ".repeat(32 * 1024);
    let body = format!(r#"{{"normalized_units": 0.5, "current_load": 0.5{padding}}}"#);
    let response = warp::test::request()
        .method("POST")
        .path("/predict")
        .header("content-type", "application/json")
        .body(body)
        .reply(&routes(handle(Fixed(0))))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!error_body(&response).is_empty());
}

#[tokio::test]
async fn test_body_without_length_is_json_411() {
    let response = warp::test::request().method("POST").path("/predict").reply(&routes(handle(Fixed(0)))).await;
    assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED);
    assert!(!error_body(&response).is_empty());
}

#[tokio::test]
async fn test_baseline_artifact_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    PolicyArtifact::new("baseline", PolicyModel::Threshold(ThresholdPolicy::default()))
        .save(&path)
        .await
        .unwrap();

    let config = ServeConfig {
        policy_path: path,
        ..ServeConfig::default()
    };
    let handle = Arc::new(PolicyHandle::init(&config).await.unwrap());

    let (_, hot) = post_predict(handle.clone(), r#"{"normalized_units": 0.2, "current_load": 0.9}"#).await;
    assert_eq!(hot["action_name"], "ADD_SERVER");
    let (_, idle) = post_predict(handle.clone(), r#"{"normalized_units": 0.6, "current_load": 0.1}"#).await;
    assert_eq!(idle["action_name"], "REMOVE_SERVER");
    let (_, steady) = post_predict(handle, r#"{"normalized_units": 0.6, "current_load": 0.6}"#).await;
    assert_eq!(steady["action_name"], "DO_NOTHING");
}
