//! `GET /api/fingerprint` and `GET /api/analysis` — the only two routes this
//! engine serves (spec §4.8). Response building follows
//! `telemetry::health`'s boxed-body JSON shape exactly.

use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde_json::json;

use crate::analyzer::{analyze, no_fingerprint_found, to_simple};
use crate::db::FingerprintDatabase;
use crate::error::{CoreError, Result};
use crate::store::FingerprintStore;

type RespBody = BoxBody<Bytes, hyper::Error>;

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Result<Response<RespBody>> {
    let bytes = serde_json::to_vec(body)
        .map_err(|e| CoreError::Http(format!("failed to serialize response: {e}")))?;
    let body = Full::new(Bytes::from(bytes)).map_err(|never| match never {}).boxed();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(body)
        .map_err(|e| CoreError::Http(format!("failed to build response: {e}")))
}

fn not_found() -> Result<Response<RespBody>> {
    let body = Full::new(Bytes::from("Not Found")).map_err(|never| match never {}).boxed();
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(body)
        .map_err(|e| CoreError::Http(format!("failed to build response: {e}")))
}

/// `GET /api/fingerprint`: `{ success, client_ip, fingerprint }`, or
/// `{ success: false, client_ip, error }` with HTTP 200 when nothing has
/// been captured yet for this IP.
pub fn handle_fingerprint(store: &FingerprintStore, client_ip: &str, client_port: Option<u16>) -> Result<Response<RespBody>> {
    match store.get(client_ip, client_port) {
        Some(fp) => json_response(
            StatusCode::OK,
            &json!({
                "success": true,
                "client_ip": client_ip,
                "fingerprint": fp.as_ref(),
            }),
        ),
        None => json_response(
            StatusCode::OK,
            &json!({
                "success": false,
                "client_ip": client_ip,
                "error": "No fingerprint found for this client yet",
            }),
        ),
    }
}

/// `GET /api/analysis[?details=true]`: `SimpleAnalysisResult`, with the full
/// `AnalysisResult` attached under `details` when requested. Per spec §6.5,
/// an empty store entry is still HTTP 200 with `risk_level: "unknown"`.
pub fn handle_analysis(
    store: &FingerprintStore,
    db: &FingerprintDatabase,
    client_ip: &str,
    client_port: Option<u16>,
    user_agent: Option<&str>,
    details: bool,
) -> Result<Response<RespBody>> {
    let result = match store.get(client_ip, client_port) {
        Some(fp) => to_simple(analyze(fp.as_ref(), client_ip, user_agent, db), details),
        None => no_fingerprint_found(),
    };
    json_response(StatusCode::OK, &result)
}

/// Dispatches on request path; any route outside the two above is `404`.
pub fn route(
    path: &str,
    store: &FingerprintStore,
    db: &FingerprintDatabase,
    client_ip: &str,
    client_port: Option<u16>,
    user_agent: Option<&str>,
    query: Option<&str>,
) -> Result<Response<RespBody>> {
    match path {
        "/api/fingerprint" => handle_fingerprint(store, client_ip, client_port),
        "/api/analysis" => {
            let details = query.map(|q| q.split('&').any(|kv| kv == "details=true")).unwrap_or(false);
            handle_analysis(store, db, client_ip, client_port, user_agent, details)
        }
        _ => not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::tls::TlsFingerprint;
    use crate::fingerprint::CombinedFingerprint;

    #[test]
    fn fingerprint_route_reports_failure_without_crashing_when_absent() {
        let store = FingerprintStore::new(10);
        let db = FingerprintDatabase::default();
        let resp = route("/api/fingerprint", &store, &db, "10.0.0.9", None, None, None).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn analysis_route_is_200_even_with_no_entry() {
        let store = FingerprintStore::new(10);
        let db = FingerprintDatabase::default();
        let resp = route("/api/analysis", &store, &db, "10.0.0.9", None, None, None).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn unknown_path_is_404() {
        let store = FingerprintStore::new(10);
        let db = FingerprintDatabase::default();
        let resp = route("/nope", &store, &db, "10.0.0.9", None, None, None).unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn analysis_details_flag_attaches_full_result() {
        let store = FingerprintStore::new(10);
        store.insert("10.0.0.9", 443, CombinedFingerprint::new(TlsFingerprint::default()));
        let db = FingerprintDatabase::default();
        let resp = route(
            "/api/analysis",
            &store,
            &db,
            "10.0.0.9",
            Some(443),
            None,
            Some("details=true"),
        )
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
