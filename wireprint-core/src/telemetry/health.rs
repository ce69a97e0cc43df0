use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::Bytes;
use hyper::Response;
use hyper::StatusCode;
use serde_json::json;

use crate::error::{CoreError, Result};

type RespBody = BoxBody<Bytes, hyper::Error>;

fn json_response(status: StatusCode, body: serde_json::Value) -> Result<Response<RespBody>> {
    let body_bytes = serde_json::to_vec(&body)
        .map_err(|e| CoreError::Http(format!("failed to serialize response: {e}")))?;
    let body = Full::new(Bytes::from(body_bytes)).map_err(|never| match never {}).boxed();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body)
        .map_err(|e| CoreError::Http(format!("failed to build response: {e}")))
}

/// Health check - always 200 while the process is running.
pub fn health_check_response() -> Result<Response<RespBody>> {
    json_response(StatusCode::OK, json!({"status": "healthy"}))
}

/// Readiness check - the engine is ready once the fingerprint database has
/// finished its (possibly partial, per spec §4.6) load.
pub fn ready_check_response(database_loaded: bool) -> Result<Response<RespBody>> {
    if database_loaded {
        json_response(StatusCode::OK, json!({"status": "ready"}))
    } else {
        json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"status": "not_ready", "reason": "fingerprint_database_not_loaded"}),
        )
    }
}

/// Liveness check - always 200 while the process is running.
pub fn live_check_response() -> Result<Response<RespBody>> {
    json_response(StatusCode::OK, json!({"status": "alive"}))
}
