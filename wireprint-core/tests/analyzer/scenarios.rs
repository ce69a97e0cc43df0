//! The six end-to-end scenarios from the analyzer's worked examples,
//! driven entirely through `analyzer::analyze` against hand-built
//! fingerprints — no wire bytes, no network, no capture agent.

use wireprint_core::analyzer::{analyze, no_fingerprint_found, RiskLevel};
use wireprint_core::db::FingerprintDatabase;
use wireprint_core::fingerprint::CombinedFingerprint;

use crate::support::{browser_like_tls, chrome_http2, db_with_chrome_ja3, db_with_http2_references, library_like_tls, tcp_macos, tcp_with_timestamp};

#[test]
fn real_chrome_on_macos_is_low_risk_and_unflagged() {
    let tls = browser_like_tls(Some("example.com"));
    let http2 = chrome_http2("m,a,s,p");
    let tcp = tcp_macos(64, 65535);
    let fp = CombinedFingerprint::new(tls).with_http2(http2).with_tcp(tcp);
    let db = db_with_http2_references();
    let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

    let result = analyze(&fp, "198.51.100.10", Some(ua), &db);

    assert_eq!(result.summary.risk_level, RiskLevel::Low);
    assert!(!result.summary.is_bot);
    assert!(!result.summary.is_spoofed);
    assert!(result.tls_analysis.client_type.starts_with("Browser"));
    assert!(result.consistency_check.anomalies.is_empty());
    assert!(!result.http2_analysis.unwrap().is_impersonator);
}

#[test]
fn curl_impersonate_posing_as_chrome_is_flagged_bot_and_spoofed() {
    let tls = browser_like_tls(Some("example.com"));
    let http2 = chrome_http2("m,a,s"); // missing the trailing `p`
    let tcp = tcp_with_timestamp(64, 29200);
    let fp = CombinedFingerprint::new(tls).with_http2(http2).with_tcp(tcp);
    let db = db_with_http2_references();
    let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    let result = analyze(&fp, "198.51.100.11", Some(ua), &db);

    assert!(result.summary.is_bot);
    assert!(result.summary.is_spoofed);
    assert!(result.http2_analysis.as_ref().unwrap().is_impersonator);
    assert!(result
        .consistency_check
        .anomalies
        .iter()
        .any(|a| a.contains("impersonator")));
    assert!(result
        .consistency_check
        .anomalies
        .iter()
        .any(|a| a.contains("UA claims Windows but TCP fingerprint suggests Linux")));
}

#[test]
fn python_requests_is_high_risk_despite_a_clean_consistency_score() {
    let tls = library_like_tls();
    let fp = CombinedFingerprint::new(tls);
    let db = FingerprintDatabase::default();
    let ua = "python-requests/2.32.0";

    let result = analyze(&fp, "198.51.100.12", Some(ua), &db);

    assert_eq!(result.tls_analysis.client_type, "Library");
    assert!(result.tls_analysis.observations.iter().any(|o| o == "No SNI"));
    assert!(result.tls_analysis.observations.iter().any(|o| o == "Few cipher suites"));
    assert!(result.summary.is_bot);
    assert_eq!(
        result.summary.risk_level,
        RiskLevel::High,
        "a bot-flagged client must be High risk even with a perfect consistency score"
    );
}

#[test]
fn windows_edge_is_not_penalized_for_matching_chrome_at_the_tls_layer() {
    let mut tls = browser_like_tls(Some("example.com"));
    tls.ja3_hash = "edge-as-chrome-ja3".to_string();
    let fp = CombinedFingerprint::new(tls);
    let db = db_with_chrome_ja3("edge-as-chrome-ja3");
    let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

    let result = analyze(&fp, "198.51.100.13", Some(ua), &db);

    assert_eq!(result.tls_analysis.client_name, "Chrome");
    assert!(result.consistency_check.anomalies.is_empty());
    assert_eq!(result.summary.risk_level, RiskLevel::Low);
}

#[test]
fn android_chrome_reports_android_with_no_anomalies() {
    let tls = browser_like_tls(Some("example.com"));
    let tcp = tcp_with_timestamp(64, 17520);
    let fp = CombinedFingerprint::new(tls).with_tcp(tcp);
    let db = FingerprintDatabase::default();
    let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";

    let result = analyze(&fp, "198.51.100.14", Some(ua), &db);

    assert!(result.consistency_check.anomalies.is_empty());
    assert!(result.summary.detected_os.contains("Android"));
}

#[test]
fn querying_before_any_traffic_is_unknown_not_an_error_status() {
    let result = no_fingerprint_found();

    assert_eq!(result.risk_score, 0);
    assert_eq!(result.risk_level, RiskLevel::Unknown);
    assert!(!result.is_bot);
    assert!(!result.is_spoofed);
    assert!(result.error.as_deref().unwrap().contains("No fingerprint found"));
}
