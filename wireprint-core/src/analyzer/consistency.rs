use super::types::{ConsistencyCheck, Http2Analysis, ParsedUserAgent, TlsAnalysis};
use crate::fingerprint::tcp::TcpFingerprint;

/// Edge identifies as Chrome at the TLS layer by design; this is the one
/// named exception to the "UA browser must appear in TLS client name" rule.
fn is_edge_chrome_exception(ua_browser: &str, tls_client_name: &str) -> bool {
    ua_browser == "Edge" && tls_client_name.to_lowercase().contains("chrome")
}

fn os_mismatch(ua_os: &str, tcp_os: &str, tcp_window: u16) -> bool {
    let tcp_os_lower = tcp_os.to_lowercase();
    match ua_os {
        "Windows" => {
            tcp_os_lower.contains("linux") || tcp_os_lower.contains("macos") || tcp_os_lower.contains("ios")
        }
        "macOS" => {
            (tcp_os_lower.contains("linux") && tcp_window != 65535) || tcp_os_lower.contains("windows")
        }
        "Linux" => tcp_os_lower.contains("macos") || tcp_os_lower.contains("windows"),
        "iOS" => tcp_os_lower.contains("windows") || tcp_os_lower.contains("linux"),
        "Android" => !(tcp_os_lower.contains("linux") || tcp_os_lower.contains("android")),
        _ => false,
    }
}

/// Starts from score 100 and applies the fixed deduction table below,
/// clamped to `[0,100]`. Each deduction also records an anomaly.
pub fn check_consistency(
    ua: &ParsedUserAgent,
    tls: &TlsAnalysis,
    http2: Option<&Http2Analysis>,
    tcp: Option<&TcpFingerprint>,
) -> ConsistencyCheck {
    let mut score: i32 = 100;
    let mut anomalies = Vec::new();
    let mut details = Vec::new();

    if let Some(ua_browser) = &ua.browser {
        let declares_non_match = !tls.client_name.is_empty()
            && tls.client_name != "Unknown"
            && !tls.client_name.to_lowercase().contains(&ua_browser.to_lowercase())
            && !is_edge_chrome_exception(ua_browser, &tls.client_name);
        if declares_non_match {
            score -= 25;
            anomalies.push(format!(
                "UA claims {ua_browser} but TLS client fingerprint suggests {}",
                tls.client_name
            ));
        }

        if let Some(http2) = http2 {
            if let Some(client_match) = &http2.client_match {
                let h2_mismatch = !client_match.to_lowercase().contains(&ua_browser.to_lowercase())
                    && !ua_browser.to_lowercase().contains(&client_match.to_lowercase());
                if h2_mismatch {
                    score -= 20;
                    anomalies.push(format!(
                        "UA claims {ua_browser} but HTTP/2 fingerprint suggests {client_match}"
                    ));
                }
            }
        }

        if tls.client_type.starts_with("Library") {
            score -= 25;
            anomalies.push(format!("UA claims {ua_browser} but TLS fingerprint is a Library"));
        }
    }

    if let (Some(h2_client), true) = (
        http2.and_then(|h| h.client_match.clone()),
        tls.client_name != "Unknown" && !tls.client_name.is_empty(),
    ) {
        let neither_contains_other = !h2_client.to_lowercase().contains(&tls.client_name.to_lowercase())
            && !tls.client_name.to_lowercase().contains(&h2_client.to_lowercase());
        if neither_contains_other {
            score -= 20;
            anomalies.push(format!(
                "TLS client '{}' and HTTP/2 client '{h2_client}' disagree",
                tls.client_name
            ));
        }
    }

    if let Some(http2) = http2 {
        if http2.is_impersonator {
            score -= 30;
            anomalies.push("HTTP/2 frame layer indicates an impersonator".to_string());
        }
    }

    if let (Some(ua_os), Some(tcp)) = (&ua.os, tcp) {
        if os_mismatch(ua_os, &tcp.inferred_os, tcp.window) {
            score -= 35;
            anomalies.push(format!(
                "UA claims {ua_os} but TCP fingerprint suggests {}",
                tcp.inferred_os
            ));
        }
        for anomaly in &tcp.anomalies {
            score -= 10;
            anomalies.push(format!("TCP capture anomaly: {anomaly}"));
        }
        if ua.is_mobile && tcp.initial_ttl == 128 {
            score -= 20;
            anomalies.push("UA claims mobile but TCP initial TTL is 128 (Windows-like)".to_string());
        }
    }

    details.push(format!("tls_client_type={}", tls.client_type));
    if let Some(http2) = http2 {
        details.push(format!("http2_is_impersonator={}", http2.is_impersonator));
    }

    let score = score.clamp(0, 100) as u8;
    ConsistencyCheck { passed: anomalies.is_empty(), score, anomalies, details }
}
