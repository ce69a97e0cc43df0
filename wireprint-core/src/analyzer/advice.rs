use super::types::{AdviceItem, Http2Analysis, RiskLevel, SecurityAdvice, Summary};

fn item(category: &str, title: &str, description: &str, priority: &str) -> AdviceItem {
    AdviceItem {
        category: category.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority: priority.to_string(),
    }
}

/// A fixed rule table, no heuristic reasoning: every item here is gated on
/// one of the booleans the rest of the analyzer already computed.
pub fn build_advice(summary: &Summary, http2: Option<&Http2Analysis>) -> SecurityAdvice {
    let mut for_defenders = Vec::new();
    let mut for_pentesters = Vec::new();
    let mut recommendations = Vec::new();

    if summary.is_spoofed {
        for_defenders.push(item(
            "detection",
            "Cross-layer fingerprint mismatch detected",
            "The client's declared identity does not match its TLS/HTTP2/TCP fingerprints.",
            "high",
        ));
        recommendations.push("Apply stricter rate limiting to this client.".to_string());
    }

    if let Some(http2) = http2 {
        if http2.is_impersonator {
            for_defenders.push(item(
                "impersonation",
                "HTTP/2 impersonator signature",
                "SETTINGS/WINDOW_UPDATE match a known browser but the pseudo-header order does not.",
                "high",
            ));
            for_pentesters.push(item(
                "evasion",
                "Impersonation artifact at the HTTP/2 layer",
                "This library leaves a detectable gap between its TLS and HTTP/2 impersonation.",
                "medium",
            ));
        }
    }

    if summary.is_bot {
        for_defenders.push(item(
            "bot-detection",
            "Automated client signals present",
            "Multiple independent signals (TLS client type, missing SNI/UA, consistency score) indicate automation.",
            "medium",
        ));
    }

    match summary.risk_level {
        RiskLevel::High => {
            recommendations.push("Consider challenging this client with a CAPTCHA or step-up verification.".to_string());
        }
        RiskLevel::Medium => {
            recommendations.push("Monitor this client; no immediate action required.".to_string());
        }
        RiskLevel::Low | RiskLevel::Unknown => {}
    }

    if for_pentesters.is_empty() {
        for_pentesters.push(item(
            "baseline",
            "No impersonation artifacts found",
            "This client's fingerprints are internally consistent at every observed layer.",
            "low",
        ));
    }

    SecurityAdvice { overall_risk: summary.risk_level, for_defenders, for_pentesters, recommendations }
}
