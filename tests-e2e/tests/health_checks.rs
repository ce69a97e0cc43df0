use tests_e2e::common::{wait_for_service, DEFAULT_HEALTH_CHECK_TIMEOUT_SECS, METRICS_URL};

#[tokio::test]
async fn test_health_endpoint_is_always_ok() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    assert!(wait_for_service(&format!("{METRICS_URL}/health"), DEFAULT_HEALTH_CHECK_TIMEOUT_SECS).await?);

    let client = reqwest::Client::new();
    let resp = client.get(format!("{METRICS_URL}/health")).send().await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], serde_json::json!("healthy"));
    Ok(())
}

#[tokio::test]
async fn test_live_endpoint_is_always_ok() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    assert!(wait_for_service(&format!("{METRICS_URL}/live"), DEFAULT_HEALTH_CHECK_TIMEOUT_SECS).await?);

    let client = reqwest::Client::new();
    let resp = client.get(format!("{METRICS_URL}/live")).send().await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], serde_json::json!("alive"));
    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_reports_database_load_state() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    assert!(wait_for_service(&format!("{METRICS_URL}/ready"), DEFAULT_HEALTH_CHECK_TIMEOUT_SECS).await?);

    let client = reqwest::Client::new();
    let resp = client.get(format!("{METRICS_URL}/ready")).send().await?;
    // Either shape is valid depending on whether the fingerprint database
    // finished loading by the time this test ran; both are well-formed.
    assert!(resp.status() == reqwest::StatusCode::OK || resp.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = resp.json().await?;
    assert!(body["status"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_unknown_observability_path_is_404() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    assert!(wait_for_service(&format!("{METRICS_URL}/health"), DEFAULT_HEALTH_CHECK_TIMEOUT_SECS).await?);

    let client = reqwest::Client::new();
    let resp = client.get(format!("{METRICS_URL}/nope")).send().await?;
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}
