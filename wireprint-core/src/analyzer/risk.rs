use super::types::{ConsistencyCheck, Http2Analysis, ParsedUserAgent, RiskLevel, Summary, TcpAnalysis, TlsAnalysis};

fn detected_client(tls: &TlsAnalysis, http2: Option<&Http2Analysis>, ua: &ParsedUserAgent) -> String {
    if let Some(http2) = http2 {
        if let Some(kind) = &http2.impersonator_type {
            return format!("Impersonator ({kind})");
        }
    }
    if tls.client_name != "Unknown" && !tls.client_name.is_empty() {
        return tls.client_name.clone();
    }
    if let Some(browser) = &ua.browser {
        return format!("{browser} (from UA, TLS unknown)");
    }
    "Unknown".to_string()
}

fn detected_os(tcp: Option<&TcpAnalysis>, ua: &ParsedUserAgent) -> String {
    if let Some(tcp) = tcp {
        if let Some(os) = &tcp.inferred_os {
            return if tcp.os_confidence.as_deref() == Some("high") {
                format!("{os} (high confidence)")
            } else {
                os.clone()
            };
        }
    }
    if let Some(os) = &ua.os {
        return format!("{os} (from UA only)");
    }
    "Unknown".to_string()
}

fn count_bot_signals(tls: &TlsAnalysis, consistency: &ConsistencyCheck, ua: &ParsedUserAgent, http2: Option<&Http2Analysis>, sni_present: bool) -> u8 {
    let mut signals = 0u8;
    if tls.client_type.starts_with("Library") || tls.client_type.starts_with("Bot") {
        signals += 1;
    }
    if consistency.score < 70 {
        signals += 1;
    }
    if !sni_present {
        signals += 1;
    }
    if ua.raw.is_none() {
        signals += 1;
    }
    if ua.self_identifies_as_bot || ua.is_library {
        signals += 1;
    }
    if http2.map(|h| h.is_impersonator).unwrap_or(false) {
        signals += 2;
    }
    signals
}

pub fn summarize(
    tls: &TlsAnalysis,
    http2: Option<&Http2Analysis>,
    tcp: Option<&TcpAnalysis>,
    consistency: &ConsistencyCheck,
    ua: &ParsedUserAgent,
    sni_present: bool,
) -> Summary {
    let bot_signals = count_bot_signals(tls, consistency, ua, http2, sni_present);
    let is_bot = bot_signals >= 2;
    let is_impersonator = http2.map(|h| h.is_impersonator).unwrap_or(false);
    let is_spoofed = !consistency.anomalies.is_empty() || is_impersonator;

    let risk_level = if is_impersonator {
        if consistency.score >= 80 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    } else if consistency.score >= 90 && !is_bot {
        RiskLevel::Low
    } else if consistency.score >= 60 && !is_bot {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let uniqueness = if tls.ja3_popularity == "Known" || tls.ja4_popularity == "Known" {
        "Common".to_string()
    } else {
        "Unusual".to_string()
    };

    let mut warnings = Vec::new();
    if is_impersonator {
        warnings.push("HTTP/2 frame layer flags this client as an impersonator".to_string());
    }
    if is_bot {
        warnings.push("Multiple bot signals present".to_string());
    }

    Summary {
        risk_level,
        uniqueness,
        detected_client: detected_client(tls, http2, ua),
        detected_os: detected_os(tcp, ua),
        is_bot,
        is_spoofed,
        warnings,
    }
}
