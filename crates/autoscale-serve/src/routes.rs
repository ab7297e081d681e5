//! HTTP routes for the decision service

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

use crate::decision::parse_observation;
use crate::error::ServeError;
use crate::PolicyHandle;

/// Body of `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to the RL cloud resource allocator API. POST an observation to /predict.";

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Configure all routes. Every rejection is answered with a JSON error body.
pub fn routes(handle: Arc<PolicyHandle>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "message": WELCOME_MESSAGE })));

    let predict = warp::path("predict")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_handle(handle))
        .and_then(predict);

    index.or(predict).recover(handle_rejection).with(warp::trace::request())
}

fn with_handle(handle: Arc<PolicyHandle>) -> impl Filter<Extract = (Arc<PolicyHandle>,), Error = Infallible> + Clone {
    warp::any().map(move || handle.clone())
}

fn error_reply(message: impl Display, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message.to_string() })), status)
}

async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let reply = if rejection.is_not_found() {
        error_reply("not found", StatusCode::NOT_FOUND)
    } else if let Some(err) = rejection.find::<warp::reject::PayloadTooLarge>() {
        error_reply(err, StatusCode::PAYLOAD_TOO_LARGE)
    } else if let Some(err) = rejection.find::<warp::reject::LengthRequired>() {
        error_reply(err, StatusCode::LENGTH_REQUIRED)
    } else if let Some(err) = rejection.find::<warp::reject::MethodNotAllowed>() {
        error_reply(err, StatusCode::METHOD_NOT_ALLOWED)
    } else {
        tracing::error!(?rejection, "unhandled rejection");
        error_reply("internal server error", StatusCode::INTERNAL_SERVER_ERROR)
    };
    Ok(reply)
}

/// Validate, infer, map
async fn predict(body: Bytes, handle: Arc<PolicyHandle>) -> Result<impl Reply, Infallible> {
    let observation = serde_json::from_slice::<Value>(&body)
        .map_err(|err| ServeError::InvalidRequest(format!("request body is not valid JSON: {err}")))
        .and_then(|payload| parse_observation(&payload));

    let observation = match observation {
        Ok(observation) => observation,
        Err(err) => {
            tracing::debug!(error = %err, "rejected decision request");
            return Ok(error_reply(err, StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    match handle.decide(&observation) {
        Ok(decision) => Ok(warp::reply::with_status(warp::reply::json(&decision), StatusCode::OK)),
        Err(err) => {
            tracing::error!(error = %err, ?observation, "inference failed");
            Ok(error_reply(err, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}
