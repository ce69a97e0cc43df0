use super::types::{ParsedUserAgent, TlsAnalysis};
use crate::db::{Ja3Catalog, Ja4Catalog};
use crate::fingerprint::tls::TlsFingerprint;

const BROWSER_ONLY_EXTENSIONS: &[&str] =
    &["encrypted_client_hello", "application_settings", "compress_certificate"];

fn version_label(version: Option<u16>) -> String {
    match version {
        Some(0x0304) => "TLS 1.3".to_string(),
        Some(0x0303) => "TLS 1.2".to_string(),
        Some(v) if v < 0x0303 => "older".to_string(),
        Some(_) => "unknown".to_string(),
        None => "unknown".to_string(),
    }
}

fn negotiated_version(fp: &TlsFingerprint) -> Option<u16> {
    fp.negotiated_version.or_else(|| fp.supported_versions.iter().copied().find(|v| *v != 0))
}

/// Scores Browser-vs-Library with a pattern-based rubric (not a hash lookup):
/// cipher/extension counts, GREASE presence, ALPN shape, SNI presence,
/// browser-only extensions, supported_versions/sig_algs counts, and an
/// immediate Library verdict for known client-library UA strings.
fn classify_client_type(fp: &TlsFingerprint, ua: &ParsedUserAgent) -> (String, i32, i32) {
    if ua.is_library {
        return ("Library".to_string(), 0, 100);
    }

    let mut browser = 0;
    let mut library = 0;

    let cipher_count = fp.cipher_suites.len();
    if cipher_count >= 20 {
        browser += 2;
    } else if cipher_count >= 15 {
        browser += 1;
    } else if cipher_count < 10 {
        library += 2;
    }

    let ext_count = fp.extensions.len();
    if ext_count >= 12 {
        browser += 2;
    } else if ext_count >= 8 {
        browser += 1;
    } else if ext_count < 6 {
        library += 2;
    }

    let has_grease = fp
        .extensions
        .iter()
        .any(|e| crate::fingerprint::tls::grease::is_grease(e.id))
        || fp.cipher_suites.iter().any(|c| crate::fingerprint::tls::grease::is_grease(c.id));
    if has_grease {
        browser += 3;
    }

    let has_h2 = fp.alpn.iter().any(|p| p == "h2");
    let has_http11 = fp.alpn.iter().any(|p| p == "http/1.1");
    if has_h2 && has_http11 {
        browser += 2;
    } else if has_h2 {
        browser += 1;
    } else if fp.alpn.is_empty() {
        library += 2;
    }

    if fp.sni.is_some() {
        browser += 1;
    } else {
        library += 2;
    }

    if fp.extensions.iter().any(|e| BROWSER_ONLY_EXTENSIONS.contains(&e.name.as_str())) {
        browser += 2;
    }

    if fp.supported_versions.len() >= 4 {
        browser += 1;
    } else if fp.supported_versions.len() <= 2 {
        library += 1;
    }

    if fp.signature_algorithms.len() >= 10 {
        browser += 1;
    } else if fp.signature_algorithms.len() < 5 {
        library += 1;
    }

    let label = if browser >= library + 3 {
        "Browser".to_string()
    } else if library >= browser + 2 {
        "Library".to_string()
    } else if browser > library {
        "Browser (likely)".to_string()
    } else if library > browser {
        "Library (likely)".to_string()
    } else {
        "Unknown".to_string()
    };

    (label, browser, library)
}

fn cipher_strength(fp: &TlsFingerprint) -> String {
    let weak = fp.cipher_suites.iter().any(|c| {
        let n = c.name.to_uppercase();
        n.contains("RC4") || n.contains("DES") || n.contains("EXPORT") || n.contains("NULL")
    });
    if weak {
        return "Weak".to_string();
    }
    let strong = fp.cipher_suites.iter().any(|c| {
        let n = c.name.to_uppercase();
        n.contains("AES_256") || n.contains("CHACHA20") || n.contains("GCM")
    });
    if strong {
        "Strong".to_string()
    } else {
        "Medium".to_string()
    }
}

pub fn analyze_tls(
    fp: &TlsFingerprint,
    ua: &ParsedUserAgent,
    ja3_db: &Ja3Catalog,
    ja4_db: &Ja4Catalog,
) -> TlsAnalysis {
    let mut observations = Vec::new();

    let mut client_name = "Unknown".to_string();
    let mut ja3_popularity = "Unknown".to_string();
    if let Some(entry) = ja3_db.lookup(&fp.ja3_hash) {
        client_name = entry.name.clone();
        ja3_popularity = "Known".to_string();
        if matches!(entry.kind, crate::db::ja3::Ja3Kind::Malware) {
            observations.push(format!("JA3 matches known malware signature: {}", entry.name));
        }
    }

    let mut ja4_popularity = "Unknown".to_string();
    if let Some(known) = ja4_db.lookup_known(&fp.ja4) {
        if client_name == "Unknown" {
            client_name = known.name.clone();
        }
        ja4_popularity = "Known".to_string();
    } else if let Some(prefix) = ja4_db.lookup_prefix(&fp.ja4) {
        ja4_popularity = format!("{} risk", prefix_risk_label(prefix.risk));
        observations.push(prefix.description.clone());
    }

    let (client_type, _browser_score, _library_score) = classify_client_type(fp, ua);

    if fp.sni.is_none() {
        observations.push("No SNI".to_string());
    }
    if fp.cipher_suites.len() < 10 {
        observations.push("Few cipher suites".to_string());
    }

    TlsAnalysis {
        protocol: version_label(negotiated_version(fp)),
        client_type,
        client_name,
        client_version: None,
        ja3_popularity,
        ja4_popularity,
        cipher_strength: cipher_strength(fp),
        observations,
    }
}

fn prefix_risk_label(risk: crate::db::ja4::Risk) -> &'static str {
    match risk {
        crate::db::ja4::Risk::Low => "Low",
        crate::db::ja4::Risk::Medium => "Medium",
        crate::db::ja4::Risk::High => "High",
    }
}
