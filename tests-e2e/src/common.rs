//! E2E test helpers: these tests assume a `wireprint` instance is already
//! running (started by hand, or via `docker compose up` using the compose
//! file at the workspace root) rather than spawning the binary themselves,
//! matching how the engine is actually deployed in front of real client
//! traffic.

use reqwest::Client;

/// Default HTTPS listener for the fingerprinting engine.
pub const SERVER_HTTPS_URL: &str = "https://localhost:7000";

/// Default observability server (metrics/health) URL.
pub const METRICS_URL: &str = "http://localhost:9090";

/// Default timeout for waiting for services to be ready (in seconds)
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u32 = 60;

/// Default timeout for health check endpoints (in seconds)
pub const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u32 = 30;

/// Polls `url` until it responds (any status) or `max_attempts` is exhausted.
pub async fn wait_for_service(
    url: &str,
    max_attempts: u32,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    let client = Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))?;

    for _ in 0..max_attempts {
        if client.get(url).send().await.is_ok() {
            return Ok(true);
        }
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }
    Ok(false)
}

/// Fetches `GET {SERVER_HTTPS_URL}/api/fingerprint` and returns the parsed
/// body. A fresh connection is required per call since the store keys on
/// client address and a reused connection would just return the same entry.
pub async fn fetch_fingerprint(
    client: &Client,
) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
    let url = format!("{SERVER_HTTPS_URL}/api/fingerprint");
    let resp = client.get(&url).send().await.map_err(|e| format!("request failed: {e}"))?;
    let body: serde_json::Value =
        resp.json().await.map_err(|e| format!("failed to parse response as JSON: {e}"))?;
    Ok(body)
}

/// Fetches `GET {SERVER_HTTPS_URL}/api/analysis`, optionally with
/// `?details=true`.
pub async fn fetch_analysis(
    client: &Client,
    details: bool,
) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
    let url = if details {
        format!("{SERVER_HTTPS_URL}/api/analysis?details=true")
    } else {
        format!("{SERVER_HTTPS_URL}/api/analysis")
    };
    let resp = client.get(&url).send().await.map_err(|e| format!("request failed: {e}"))?;
    let body: serde_json::Value =
        resp.json().await.map_err(|e| format!("failed to parse response as JSON: {e}"))?;
    Ok(body)
}
