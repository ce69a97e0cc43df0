use tests_e2e::common::{
    fetch_fingerprint, wait_for_service, DEFAULT_HEALTH_CHECK_TIMEOUT_SECS, DEFAULT_SERVICE_TIMEOUT_SECS,
    METRICS_URL, SERVER_HTTPS_URL,
};

#[tokio::test]
async fn test_metrics_endpoint_serves_prometheus_text_format() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    assert!(wait_for_service(&format!("{METRICS_URL}/metrics"), DEFAULT_HEALTH_CHECK_TIMEOUT_SECS).await?);

    let client = reqwest::Client::new();
    let resp = client.get(format!("{METRICS_URL}/metrics")).send().await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let content_type = resp.headers().get("content-type").and_then(|v| v.to_str().ok()).unwrap_or("");
    assert!(content_type.starts_with("text/plain"), "unexpected content-type: {content_type}");

    let body = resp.text().await?;
    assert!(body.contains("wireprint_connections_total"));
    assert!(body.contains("wireprint_tls_fingerprints_extracted_total"));
    Ok(())
}

#[tokio::test]
async fn test_request_against_engine_bumps_counters() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    assert!(wait_for_service(SERVER_HTTPS_URL, DEFAULT_SERVICE_TIMEOUT_SECS).await?);
    assert!(wait_for_service(&format!("{METRICS_URL}/metrics"), DEFAULT_HEALTH_CHECK_TIMEOUT_SECS).await?);

    let metrics_client = reqwest::Client::new();
    let before = metrics_client.get(format!("{METRICS_URL}/metrics")).send().await?.text().await?;
    let before_count = extract_counter(&before, "wireprint_connections_total");

    let tls_client = reqwest::Client::builder().danger_accept_invalid_certs(true).http1_only().build()?;
    let _ = fetch_fingerprint(&tls_client).await?;

    let after = metrics_client.get(format!("{METRICS_URL}/metrics")).send().await?.text().await?;
    let after_count = extract_counter(&after, "wireprint_connections_total");

    assert!(
        after_count > before_count,
        "wireprint_connections_total should increase after a new connection (before={before_count}, after={after_count})"
    );
    Ok(())
}

/// Pulls the bare (no-label) value for a counter out of Prometheus text
/// exposition format. Good enough for these monotonic-total assertions;
/// not a general parser.
fn extract_counter(body: &str, name: &str) -> f64 {
    for line in body.lines() {
        if line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix(name) {
            if let Some(value) = rest.trim().split_whitespace().next() {
                if let Ok(v) = value.parse::<f64>() {
                    return v;
                }
            }
        }
    }
    0.0
}
