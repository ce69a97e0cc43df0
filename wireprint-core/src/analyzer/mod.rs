//! Pure cross-layer analyzer: `(CombinedFingerprint, ClientIP, UA, Database)
//! -> AnalysisResult`. No mutable state, no clock reads — calling `analyze`
//! twice with the same inputs and the same loaded database always returns
//! the same result.

pub mod advice;
pub mod consistency;
pub mod http2_analysis;
pub mod risk;
pub mod tcp_analysis;
pub mod tls_analysis;
pub mod types;
pub mod user_agent;

pub use types::{AnalysisResult, ClientSummary, FingerprintSummary, RiskLevel, SimpleAnalysisResult};

use crate::db::FingerprintDatabase;
use crate::fingerprint::CombinedFingerprint;

pub fn analyze(fp: &CombinedFingerprint, _ip: &str, ua: Option<&str>, db: &FingerprintDatabase) -> AnalysisResult {
    let parsed_ua = user_agent::parse_user_agent(ua);

    let tls_analysis = tls_analysis::analyze_tls(&fp.tls, &parsed_ua, &db.ja3, &db.ja4);

    let http2_analysis = fp.http2.as_ref().map(|h| http2_analysis::analyze_http2(h, &db.http2));
    let tcp_analysis = fp.tcp.as_ref().map(tcp_analysis::analyze_tcp);

    let consistency_check = consistency::check_consistency(
        &parsed_ua,
        &tls_analysis,
        http2_analysis.as_ref(),
        fp.tcp.as_ref(),
    );

    let summary = risk::summarize(
        &tls_analysis,
        http2_analysis.as_ref(),
        tcp_analysis.as_ref(),
        &consistency_check,
        &parsed_ua,
        fp.tls.sni.is_some(),
    );

    let security_advice = advice::build_advice(&summary, http2_analysis.as_ref());

    AnalysisResult {
        summary,
        tls_analysis,
        http2_analysis,
        tcp_analysis,
        consistency_check,
        security_advice,
        raw_fingerprint: fp.clone(),
    }
}

/// Projects a full [`AnalysisResult`] into the fixed JSON shape served by
/// `GET /api/analysis`.
pub fn to_simple(result: AnalysisResult, details: bool) -> SimpleAnalysisResult {
    let kind = if result.http2_analysis.as_ref().map(|h| h.is_impersonator).unwrap_or(false) {
        "impersonator"
    } else if result.summary.is_bot {
        "bot"
    } else if result.tls_analysis.client_type.starts_with("Library") {
        "library"
    } else if result.tls_analysis.client_type.starts_with("Browser") {
        "browser"
    } else {
        "unknown"
    };

    let client = ClientSummary {
        kind: kind.to_string(),
        claimed: result.summary.detected_client.clone(),
        detected: result.summary.detected_client.clone(),
        matched: !result.summary.is_spoofed,
    };

    let fingerprints = FingerprintSummary {
        ja3: Some(result.raw_fingerprint.tls.ja3_hash.clone()),
        ja4: Some(result.raw_fingerprint.tls.ja4.clone()),
        http2: result.raw_fingerprint.http2.as_ref().map(|h| h.akamai_hash.clone()),
        tcp: result.raw_fingerprint.tcp.as_ref().map(|t| {
            format!("{}:{}:{}", t.initial_ttl, t.window, t.options_str)
        }),
        tcp_os: result.raw_fingerprint.tcp.as_ref().map(|t| t.inferred_os.clone()),
    };

    let risk_score = result.consistency_check.score;
    let risk_level = result.summary.risk_level;
    let is_bot = result.summary.is_bot;
    let is_spoofed = result.summary.is_spoofed;
    let anomalies = result.consistency_check.anomalies.clone();

    SimpleAnalysisResult {
        risk_score,
        risk_level,
        is_bot,
        is_spoofed,
        client,
        fingerprints,
        anomalies,
        error: None,
        details: details.then_some(result),
    }
}

/// Response for `/api/analysis` when the caller's IP has no stored
/// fingerprint yet: status 200, `risk_level="unknown"`.
pub fn no_fingerprint_found() -> SimpleAnalysisResult {
    SimpleAnalysisResult {
        risk_score: 0,
        risk_level: RiskLevel::Unknown,
        is_bot: false,
        is_spoofed: false,
        client: ClientSummary {
            kind: "unknown".to_string(),
            claimed: "Unknown".to_string(),
            detected: "Unknown".to_string(),
            matched: false,
        },
        fingerprints: FingerprintSummary::default(),
        anomalies: Vec::new(),
        error: Some("No fingerprint found for this client yet".to_string()),
        details: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::tls::TlsFingerprint;

    #[test]
    fn analyze_is_pure_and_deterministic() {
        let fp = CombinedFingerprint::new(TlsFingerprint::default());
        let db = FingerprintDatabase::default();
        let a = analyze(&fp, "10.0.0.1", Some("curl/8.0"), &db);
        let b = analyze(&fp, "10.0.0.1", Some("curl/8.0"), &db);
        assert_eq!(a.consistency_check.score, b.consistency_check.score);
        assert_eq!(a.summary.is_bot, b.summary.is_bot);
    }

    #[test]
    fn no_fingerprint_found_is_still_http_200_shaped() {
        let result = no_fingerprint_found();
        assert_eq!(result.risk_score, 0);
        assert!(result.error.is_some());
    }
}
